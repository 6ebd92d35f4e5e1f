use std::collections::HashMap;

use tracing::debug;

use crate::domain::{Claim, ClaimScore, ConflictOutcome, Retraction};
use crate::link::score::rounded_similarity;

/// Claims grouped per file name, both levels kept in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct ClaimBook {
    slots: HashMap<String, usize>,
    entries: Vec<(String, Vec<Claim>)>,
}

impl ClaimBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a claim. A sample claiming the same file twice counts once.
    pub fn add(&mut self, claim: Claim) {
        let slot = match self.slots.get(&claim.file_name) {
            Some(&i) => i,
            None => {
                self.entries.push((claim.file_name.clone(), Vec::new()));
                self.slots
                    .insert(claim.file_name.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let claims = &mut self.entries[slot].1;
        if !claims.iter().any(|c| c.sample_name == claim.sample_name) {
            claims.push(claim);
        }
    }

    pub fn claims_for(&self, file_name: &str) -> &[Claim] {
        self.slots
            .get(file_name)
            .map(|&i| self.entries[i].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Claim])> {
        self.entries
            .iter()
            .map(|(f, c)| (f.as_str(), c.as_slice()))
    }

    pub fn contested(&self) -> impl Iterator<Item = (&str, &[Claim])> {
        self.iter().filter(|(_, c)| c.len() > 1)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    pub conflicts: Vec<ConflictOutcome>,
    pub retractions: Vec<Retraction>,
}

impl Resolution {
    pub fn winner_of(&self, file_name: &str) -> Option<&str> {
        self.conflicts
            .iter()
            .find(|c| c.file_name == file_name)
            .map(|c| c.winner.as_str())
    }

    pub fn is_retracted(&self, sample_name: &str, file_name: &str) -> bool {
        self.retractions
            .iter()
            .any(|r| r.sample_name == sample_name && r.file_name == file_name)
    }
}

/// Pick one owner for a contested file: the strictly highest whole-point score
/// wins, ties go to the earliest claim. Returns the winner's position in `claims`.
pub fn pick_winner(file_name: &str, claims: &[Claim]) -> (usize, Vec<ClaimScore>) {
    let scores: Vec<ClaimScore> = claims
        .iter()
        .map(|c| ClaimScore {
            sample_name: c.sample_name.clone(),
            identifier: c.identifier.clone(),
            score: rounded_similarity(&c.identifier, file_name),
        })
        .collect();

    let mut best = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if s.score > scores[best].score {
            best = i;
        }
    }
    (best, scores)
}

/// Resolve every file with more than one claimant. Uncontested files are untouched.
pub fn resolve_conflicts(book: &ClaimBook) -> Resolution {
    let mut out = Resolution::default();
    for (file_name, claims) in book.contested() {
        let (best, scores) = pick_winner(file_name, claims);
        let winner = claims[best].sample_name.clone();
        debug!(file = file_name, winner = %winner, ?scores, "resolved contested file");

        for (i, c) in claims.iter().enumerate() {
            if i != best {
                out.retractions.push(Retraction {
                    sample_name: c.sample_name.clone(),
                    file_name: file_name.to_string(),
                });
            }
        }
        out.conflicts.push(ConflictOutcome {
            file_name: file_name.to_string(),
            winner,
            scores,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(file: &str, sample: &str, ident: &str, pref: bool) -> Claim {
        Claim {
            file_name: file.into(),
            sample_name: sample.into(),
            matched_key: ident.into(),
            identifier: ident.into(),
            used_preferred_id: pref,
        }
    }

    #[test]
    fn closest_identifier_wins() {
        let mut book = ClaimBook::new();
        book.add(claim("Z1_R1.fastq.gz", "Z10", "Z10", false));
        book.add(claim("Z1_R1.fastq.gz", "Z1", "Z1", false));
        let r = resolve_conflicts(&book);
        assert_eq!(r.winner_of("Z1_R1.fastq.gz"), Some("Z1"));
        assert_eq!(
            r.retractions,
            vec![Retraction {
                sample_name: "Z10".into(),
                file_name: "Z1_R1.fastq.gz".into()
            }]
        );
    }

    #[test]
    fn scores_against_preferred_id_when_used() {
        let mut book = ClaimBook::new();
        book.add(claim("SEQ_7_R1.gz", "A", "SEQ_7", true));
        book.add(claim("SEQ_7_R1.gz", "SEQ_7_R", "SEQ", false));
        let r = resolve_conflicts(&book);
        assert_eq!(r.winner_of("SEQ_7_R1.gz"), Some("A"));
    }

    #[test]
    fn tie_goes_to_first_claim() {
        for _ in 0..3 {
            let mut book = ClaimBook::new();
            book.add(claim("AB_x.gz", "first", "AB", false));
            book.add(claim("AB_x.gz", "second", "AB", false));
            let r = resolve_conflicts(&book);
            assert_eq!(r.winner_of("AB_x.gz"), Some("first"));
            assert!(r.is_retracted("second", "AB_x.gz"));
        }
    }

    #[test]
    fn scores_within_a_point_tie() {
        let file = format!("ABC_AB_{}", "x".repeat(493));
        let mut book = ClaimBook::new();
        book.add(claim(&file, "AB", "AB", false));
        book.add(claim(&file, "ABC", "ABC", false));
        let r = resolve_conflicts(&book);
        assert_eq!(r.winner_of(&file), Some("AB"));
        assert!(r.is_retracted("ABC", &file));
        let scores: Vec<f64> = r.conflicts[0].scores.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![1.0, 1.0]);
    }

    #[test]
    fn uncontested_files_need_no_resolution() {
        let mut book = ClaimBook::new();
        book.add(claim("A_1.gz", "A", "A", false));
        book.add(claim("A_1.gz", "A", "A", false));
        assert_eq!(book.claims_for("A_1.gz").len(), 1);
        assert_eq!(resolve_conflicts(&book), Resolution::default());
    }

    #[test]
    fn book_keeps_first_seen_order() {
        let mut book = ClaimBook::new();
        book.add(claim("b.gz", "S", "S", false));
        book.add(claim("a.gz", "S", "S", false));
        let files: Vec<&str> = book.iter().map(|(f, _)| f).collect();
        assert_eq!(files, vec!["b.gz", "a.gz"]);
        assert!(book.claims_for("c.gz").is_empty());
    }
}

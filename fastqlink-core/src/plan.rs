use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{FileRecord, ReconciliationResult, SampleRecord};

/// Write batch for one sample, the unit the storage adapter persists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleUpdate {
    pub sample_name: String,
    pub add_files: Vec<String>,
    pub remove_files: Vec<String>,
    /// Total size of the sample's file set after this update.
    pub filesize_sum: u64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub received: Option<OffsetDateTime>,
}

impl SampleUpdate {
    pub fn is_empty(&self) -> bool {
        self.add_files.is_empty() && self.remove_files.is_empty()
    }
}

/// Diff a reconciliation result against the samples' current file lists.
///
/// Only files the sample does not hold yet are added, and only retracted files
/// it actually holds are removed, so planning over already-updated samples
/// yields nothing.
pub fn plan_updates(
    result: &ReconciliationResult,
    files: &[FileRecord],
    samples: &[SampleRecord],
) -> Vec<SampleUpdate> {
    let mut by_name: HashMap<&str, &FileRecord> = HashMap::with_capacity(files.len());
    for f in files {
        by_name.entry(f.name.as_str()).or_insert(f);
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for sample in samples {
        let name = sample.sample_name.as_str();
        if !seen.insert(name) {
            continue;
        }
        let mut current = sample.clone();
        current.clean_assigned();

        let assigned = result.assignments.get(name).map(Vec::as_slice).unwrap_or(&[]);
        let mut add_files: Vec<String> = Vec::new();
        for f in assigned {
            if !current.has_file(f) && !add_files.contains(f) {
                add_files.push(f.clone());
            }
        }
        let remove_files: Vec<String> = result
            .retractions
            .iter()
            .filter(|r| r.sample_name == name && current.has_file(&r.file_name))
            .map(|r| r.file_name.clone())
            .collect();

        if add_files.is_empty() && remove_files.is_empty() {
            continue;
        }

        let filesize_sum: u64 = current
            .assigned_files
            .iter()
            .filter(|f| !remove_files.contains(f))
            .chain(add_files.iter())
            .filter_map(|f| by_name.get(f.as_str()))
            .map(|f| f.size)
            .sum();
        let received = assigned
            .iter()
            .find_map(|f| by_name.get(f.as_str()))
            .map(|f| f.modified_at)
            .or(sample.received);

        out.push(SampleUpdate {
            sample_name: name.to_string(),
            add_files,
            remove_files,
            filesize_sum,
            received,
        });
    }
    out
}

/// Apply planned updates in memory to every record carrying the sample name.
pub fn apply_updates(samples: &mut [SampleRecord], updates: &[SampleUpdate]) {
    for u in updates {
        for s in samples.iter_mut().filter(|s| s.sample_name == u.sample_name) {
            s.clean_assigned();
            s.assigned_files.retain(|f| !u.remove_files.contains(f));
            for f in &u.add_files {
                if !s.has_file(f) {
                    s.assigned_files.push(f.clone());
                }
            }
            s.filesize_sum = Some(u.filesize_sum);
            if u.received.is_some() {
                s.received = u.received;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Retraction;
    use time::macros::datetime;

    fn file(name: &str, size: u64, day: u8) -> FileRecord {
        FileRecord {
            name: name.into(),
            size,
            modified_at: datetime!(2024-06-01 0:00 UTC).replace_day(day).unwrap(),
        }
    }

    fn result(assign: &[(&str, &[&str])], retract: &[(&str, &str)]) -> ReconciliationResult {
        let mut r = ReconciliationResult::default();
        for (s, fs) in assign {
            r.assignments
                .insert(s.to_string(), fs.iter().map(|f| f.to_string()).collect());
        }
        for (s, f) in retract {
            r.retractions.push(Retraction {
                sample_name: s.to_string(),
                file_name: f.to_string(),
            });
        }
        r
    }

    #[test]
    fn adds_only_new_files_and_sums_final_set() {
        let inv = vec![file("A_R1.gz", 10, 2), file("A_R2.gz", 20, 3), file("A_old.gz", 5, 1)];
        let mut a = SampleRecord::new("A");
        a.assigned_files = vec!["A_old.gz".into(), "A_R1.gz".into(), "nan".into()];
        let r = result(&[("A", &["A_R1.gz", "A_R2.gz"])], &[]);

        let ups = plan_updates(&r, &inv, &[a]);
        assert_eq!(ups.len(), 1);
        assert_eq!(ups[0].add_files, vec!["A_R2.gz"]);
        assert!(ups[0].remove_files.is_empty());
        assert_eq!(ups[0].filesize_sum, 35);
        assert_eq!(ups[0].received, Some(datetime!(2024-06-02 0:00 UTC)));
    }

    #[test]
    fn removes_only_held_retracted_files() {
        let inv = vec![file("Z1_R1.gz", 7, 1)];
        let mut held = SampleRecord::new("Z10");
        held.assigned_files = vec!["Z1_R1.gz".into()];
        let r = result(&[("Z1", &["Z1_R1.gz"])], &[("Z10", "Z1_R1.gz")]);

        let ups = plan_updates(&r, &inv, &[held.clone(), SampleRecord::new("Z1")]);
        assert_eq!(ups.len(), 2);
        assert_eq!(ups[0].sample_name, "Z10");
        assert_eq!(ups[0].remove_files, vec!["Z1_R1.gz"]);
        assert_eq!(ups[0].filesize_sum, 0);

        // a loser that never held the file needs no write
        let ups = plan_updates(&r, &inv, &[SampleRecord::new("Z10")]);
        assert!(ups.is_empty());
    }

    #[test]
    fn second_plan_after_apply_is_empty() {
        let inv = vec![file("A_R1.gz", 10, 2), file("Z1_R1.gz", 7, 1)];
        let mut samples = vec![SampleRecord::new("A"), SampleRecord::new("Z10")];
        samples[1].assigned_files = vec!["Z1_R1.gz".into()];
        let r = result(&[("A", &["A_R1.gz"])], &[("Z10", "Z1_R1.gz")]);

        let ups = plan_updates(&r, &inv, &samples);
        apply_updates(&mut samples, &ups);
        assert_eq!(samples[0].assigned_files, vec!["A_R1.gz"]);
        assert_eq!(samples[0].filesize_sum, Some(10));
        assert!(samples[1].assigned_files.is_empty());

        assert!(plan_updates(&r, &inv, &samples).is_empty());
    }

    #[test]
    fn unknown_files_do_not_count_toward_size() {
        let r = result(&[("A", &["A_R1.gz"])], &[]);
        let ups = plan_updates(&r, &[], &[SampleRecord::new("A")]);
        assert_eq!(ups[0].filesize_sum, 0);
        assert_eq!(ups[0].received, None);
    }
}

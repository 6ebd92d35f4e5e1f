use std::collections::BTreeMap;

use crate::domain::FileRecord;

/// Characters that may follow a key inside a file name for the key to count as a hit.
pub const KEY_DELIMITERS: [char; 3] = ['_', '-', '.'];

/// In-memory view over one storage inventory.
#[derive(Clone, Debug, Default)]
pub struct CandidateIndex {
    files: Vec<FileRecord>,
    by_name: BTreeMap<String, Vec<usize>>,
}

impl CandidateIndex {
    pub fn new(files: Vec<FileRecord>) -> Self {
        let mut by_name: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, f) in files.iter().enumerate() {
            by_name.entry(f.name.clone()).or_default().push(i);
        }
        Self { files, by_name }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Exact-name lookup; first record wins when the inventory repeats a key.
    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.by_name
            .get(name)
            .and_then(|ix| ix.first())
            .map(|&i| &self.files[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Every record whose name contains `query` immediately followed by `_`, `-` or `.`,
    /// in inventory order. An empty query matches nothing.
    pub fn lookup(&self, query: &str) -> Vec<&FileRecord> {
        if query.is_empty() {
            return Vec::new();
        }
        self.files
            .iter()
            .filter(|f| anchored_contains(&f.name, query))
            .collect()
    }
}

/// True when `needle` occurs in `hay` with a delimiter right after it.
pub fn anchored_contains(hay: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    // overlapping scan: "ZZ" must still hit "ZZZ_" at offset 1
    let mut from = 0;
    while let Some(pos) = hay[from..].find(needle) {
        let at = from + pos;
        let after = hay[at + needle.len()..].chars().next();
        if after.is_some_and(|c| KEY_DELIMITERS.contains(&c)) {
            return true;
        }
        from = at + hay[at..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn rec(name: &str) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            size: 100,
            modified_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    fn names(v: Vec<&FileRecord>) -> Vec<&str> {
        v.into_iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn short_key_does_not_hit_longer_name() {
        let idx = CandidateIndex::new(vec![rec("CC10_S1_L001.fastq.gz")]);
        assert!(idx.lookup("CC1").is_empty());
        assert_eq!(names(idx.lookup("CC10")), vec!["CC10_S1_L001.fastq.gz"]);
    }

    #[test]
    fn each_delimiter_anchors() {
        let idx = CandidateIndex::new(vec![
            rec("A1_R1.fastq.gz"),
            rec("A1-R2.fastq.gz"),
            rec("A1.bam"),
            rec("A1"),
            rec("A1x_R1.fastq.gz"),
        ]);
        assert_eq!(
            names(idx.lookup("A1")),
            vec!["A1_R1.fastq.gz", "A1-R2.fastq.gz", "A1.bam"]
        );
    }

    #[test]
    fn later_occurrence_can_anchor() {
        // first "Z1" is followed by "0", the second by "_"
        assert!(anchored_contains("Z10/Z1_R1.fastq.gz", "Z1"));
        assert!(!anchored_contains("Z10/Z12.fastq.gz", "Z1"));
        assert!(anchored_contains("ZZZ_R1.gz", "ZZ"));
    }

    #[test]
    fn empty_query_and_empty_index() {
        let idx = CandidateIndex::new(vec![rec("A_1.gz")]);
        assert!(idx.lookup("").is_empty());
        assert!(CandidateIndex::default().lookup("A").is_empty());
    }

    #[test]
    fn duplicate_names_stay_distinct() {
        let idx = CandidateIndex::new(vec![rec("D_1.gz"), rec("D_1.gz")]);
        assert_eq!(idx.lookup("D").len(), 2);
        assert_eq!(idx.len(), 2);
        assert!(idx.contains("D_1.gz"));
        assert!(idx.get("D_2.gz").is_none());
    }
}

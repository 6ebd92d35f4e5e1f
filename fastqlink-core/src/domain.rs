// fastqlink_core/src/domain.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// One object in the storage inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(alias = "file_name", alias = "key")]
    pub name: String,
    #[serde(alias = "filesize")]
    pub size: u64,
    #[serde(with = "time::serde::rfc3339", alias = "mdate", alias = "last_modified")]
    pub modified_at: OffsetDateTime,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    #[serde(alias = "*sample_name")]
    pub sample_name: String,
    #[serde(default, alias = "Preferred Sequence ID")]
    pub preferred_sequence_id: Option<String>,
    #[serde(default, alias = "files")]
    pub assigned_files: Vec<String>,
    #[serde(default)]
    pub lane_name: Option<String>,
    #[serde(
        default,
        alias = "minicore_sequenced",
        deserialize_with = "de_sequenced"
    )]
    pub sequenced: Option<bool>,
    #[serde(default)]
    pub filesize_sum: Option<u64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub received: Option<OffsetDateTime>,
    #[serde(default, alias = "ccgp-project-id")]
    pub project_id: Option<String>,
}

impl SampleRecord {
    pub fn new(sample_name: impl Into<String>) -> Self {
        Self {
            sample_name: sample_name.into(),
            ..Default::default()
        }
    }

    pub fn with_preferred_id(mut self, id: impl Into<String>) -> Self {
        self.preferred_sequence_id = Some(id.into());
        self
    }

    /// Drop placeholder entries ("" / "nan") left behind by spreadsheet imports.
    pub fn clean_assigned(&mut self) {
        self.assigned_files
            .retain(|f| !f.trim().is_empty() && !f.trim().eq_ignore_ascii_case("nan"));
    }

    pub fn has_file(&self, file_name: &str) -> bool {
        self.assigned_files.iter().any(|f| f == file_name)
    }
}

/// Accepts `true`/`false`, `"YES"`/`"NO"` or null.
fn de_sequenced<'de, D>(d: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(d)? {
        Some(Flag::Bool(b)) => Some(b),
        Some(Flag::Text(s)) => match s.trim().to_ascii_uppercase().as_str() {
            "YES" | "Y" | "TRUE" => Some(true),
            "NO" | "N" | "FALSE" => Some(false),
            _ => None,
        },
        None => None,
    })
}

/// Tentative file-to-sample association produced by the matcher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub file_name: String,
    pub sample_name: String,
    /// Key that actually hit the file name, after any delimiter substitution.
    pub matched_key: String,
    /// Raw identifier the key was derived from; conflicts are scored against it.
    pub identifier: String,
    pub used_preferred_id: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Retraction {
    pub sample_name: String,
    pub file_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimScore {
    pub sample_name: String,
    pub identifier: String,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConflictOutcome {
    pub file_name: String,
    pub winner: String,
    pub scores: Vec<ClaimScore>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub sample_name: String,
    pub matched_files: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub assignments: BTreeMap<String, Vec<String>>,
    pub retractions: Vec<Retraction>,
    pub unmatched_samples: Vec<String>,
    pub skipped_samples: Vec<String>,
    pub conflicts: Vec<ConflictOutcome>,
    pub anomalies: Vec<Anomaly>,
}

impl ReconciliationResult {
    pub fn owner_of(&self, file_name: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(_, files)| files.iter().any(|f| f == file_name))
            .map(|(s, _)| s.as_str())
    }

    pub fn assigned_file_count(&self) -> usize {
        self.assignments.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_accepts_document_field_names() {
        let raw = r#"{
            "*sample_name": "CC10",
            "Preferred Sequence ID": "nan",
            "files": ["", "CC10_S1_R1.fastq.gz", "NaN"],
            "minicore_sequenced": "YES",
            "ccgp-project-id": "12-Lynx"
        }"#;
        let mut s: SampleRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(s.sample_name, "CC10");
        assert_eq!(s.preferred_sequence_id.as_deref(), Some("nan"));
        assert_eq!(s.sequenced, Some(true));
        assert_eq!(s.project_id.as_deref(), Some("12-Lynx"));
        s.clean_assigned();
        assert_eq!(s.assigned_files, vec!["CC10_S1_R1.fastq.gz".to_string()]);
    }

    #[test]
    fn sample_minimal_json_defaults() {
        let s: SampleRecord = serde_json::from_str(r#"{"sample_name":"Q9"}"#).unwrap();
        assert_eq!(s, SampleRecord::new("Q9"));
    }

    #[test]
    fn file_record_parses_rfc3339() {
        let raw = r#"{"file_name":"a_R1.fastq.gz","filesize":12,"mdate":"2024-03-01T12:00:00Z"}"#;
        let f: FileRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(f.name, "a_R1.fastq.gz");
        assert_eq!(f.size, 12);
        assert_eq!(f.modified_at, time::macros::datetime!(2024-03-01 12:00 UTC));
    }
}

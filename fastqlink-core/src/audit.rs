//! Consistency checks between sample records and the storage inventory.
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::{FileRecord, Retraction, SampleRecord};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspiciousSample {
    pub sample_name: String,
    pub project_id: Option<String>,
    pub files: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesizeDrift {
    pub sample_name: String,
    pub stored: Option<u64>,
    pub computed: u64,
}

fn placeholder(f: &str) -> bool {
    let f = f.trim();
    f.is_empty() || f.eq_ignore_ascii_case("nan")
}

/// Links whose file no longer exists in storage. Passing these as retractions
/// cleans them off the samples.
pub fn stale_links(samples: &[SampleRecord], files: &[FileRecord]) -> Vec<Retraction> {
    let known: HashSet<&str> = files.iter().map(|f| f.name.as_str()).collect();
    let mut out = Vec::new();
    for s in samples {
        for f in &s.assigned_files {
            if !placeholder(f) && !known.contains(f.as_str()) {
                out.push(Retraction {
                    sample_name: s.sample_name.clone(),
                    file_name: f.clone(),
                });
            }
        }
    }
    out
}

/// Inventory files no sample holds, in inventory order.
pub fn orphan_files<'a>(
    samples: &[SampleRecord],
    files: &'a [FileRecord],
) -> Vec<&'a FileRecord> {
    let held: HashSet<&str> = samples
        .iter()
        .flat_map(|s| s.assigned_files.iter().map(String::as_str))
        .collect();
    files
        .iter()
        .filter(|f| !held.contains(f.name.as_str()))
        .collect()
}

pub fn suspicious_samples(
    samples: &[SampleRecord],
    min_files: usize,
    exclude_projects: &[String],
) -> Vec<SuspiciousSample> {
    samples
        .iter()
        .filter(|s| {
            !s.project_id
                .as_ref()
                .is_some_and(|p| exclude_projects.contains(p))
        })
        .filter_map(|s| {
            let files: Vec<String> = s
                .assigned_files
                .iter()
                .filter(|f| !placeholder(f))
                .cloned()
                .collect();
            (files.len() >= min_files).then(|| SuspiciousSample {
                sample_name: s.sample_name.clone(),
                project_id: s.project_id.clone(),
                files,
            })
        })
        .collect()
}

/// Samples holding no files, optionally limited to one project.
pub fn empty_samples<'a>(samples: &'a [SampleRecord], project: Option<&str>) -> Vec<&'a str> {
    samples
        .iter()
        .filter(|s| project.is_none_or(|p| s.project_id.as_deref() == Some(p)))
        .filter(|s| s.assigned_files.iter().all(|f| placeholder(f)))
        .map(|s| s.sample_name.as_str())
        .collect()
}

/// Samples whose stored size total disagrees with the inventory.
pub fn recompute_filesize_sums(
    samples: &[SampleRecord],
    files: &[FileRecord],
) -> Vec<FilesizeDrift> {
    let mut sizes: HashMap<&str, u64> = HashMap::with_capacity(files.len());
    for f in files {
        sizes.entry(f.name.as_str()).or_insert(f.size);
    }
    samples
        .iter()
        .filter_map(|s| {
            let computed: u64 = s
                .assigned_files
                .iter()
                .filter_map(|f| sizes.get(f.as_str()))
                .sum();
            (s.filesize_sum != Some(computed)).then(|| FilesizeDrift {
                sample_name: s.sample_name.clone(),
                stored: s.filesize_sum,
                computed,
            })
        })
        .collect()
}

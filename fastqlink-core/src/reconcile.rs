use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::domain::{Anomaly, Claim, FileRecord, ReconciliationResult, SampleRecord};
use crate::index::candidates::CandidateIndex;
use crate::link::matcher::match_sample;
use crate::link::resolve::{ClaimBook, resolve_conflicts};
use crate::policy::LinkPolicy;

/// One reconciliation pass with default options.
pub fn reconcile(files: &[FileRecord], samples: &[SampleRecord]) -> ReconciliationResult {
    reconcile_with(files, samples, &LinkPolicy::default())
}

/// Index the inventory, match every sample, then settle contested files.
///
/// Pure: the result depends only on the two inputs and `policy`, so running it
/// again over the updated samples yields the same assignments.
pub fn reconcile_with(
    files: &[FileRecord],
    samples: &[SampleRecord],
    policy: &LinkPolicy,
) -> ReconciliationResult {
    let index = CandidateIndex::new(files.to_vec());
    let mut out = ReconciliationResult::default();
    let mut book = ClaimBook::new();
    // (sample, claimed files) in sample order
    let mut claimed: Vec<(String, Vec<String>)> = Vec::new();

    for sample in samples {
        if !policy.in_lane(sample.lane_name.as_deref()) {
            continue;
        }
        if policy.skip_unsequenced && sample.sequenced != Some(true) {
            debug!(sample = %sample.sample_name, "not sequenced, skipping");
            out.skipped_samples.push(sample.sample_name.clone());
            continue;
        }

        let Some(m) = match_sample(&index, sample, policy) else {
            debug!(sample = %sample.sample_name, "no files found");
            out.unmatched_samples.push(sample.sample_name.clone());
            continue;
        };

        if m.files.len() >= policy.anomaly_threshold {
            warn!(
                sample = %sample.sample_name,
                count = m.files.len(),
                "abnormal number of matched files"
            );
            out.anomalies.push(Anomaly {
                sample_name: sample.sample_name.clone(),
                matched_files: m.files.len(),
            });
        }

        let mut names: Vec<String> = Vec::with_capacity(m.files.len());
        for f in &m.files {
            if !names.contains(&f.name) {
                names.push(f.name.clone());
            }
            book.add(Claim {
                file_name: f.name.clone(),
                sample_name: sample.sample_name.clone(),
                matched_key: m.matched_key.clone(),
                identifier: m.identifier.clone(),
                used_preferred_id: m.used_preferred_id,
            });
        }
        claimed.push((sample.sample_name.clone(), names));
    }

    let resolution = resolve_conflicts(&book);
    for c in &resolution.conflicts {
        let losers: Vec<&str> = c
            .scores
            .iter()
            .map(|s| s.sample_name.as_str())
            .filter(|s| *s != c.winner)
            .collect();
        warn!(
            file = %c.file_name,
            winner = %c.winner,
            ?losers,
            "file claimed by multiple samples"
        );
    }

    let retracted: HashSet<(&str, &str)> = resolution
        .retractions
        .iter()
        .map(|r| (r.sample_name.as_str(), r.file_name.as_str()))
        .collect();
    let mut assignments: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (sample_name, names) in claimed {
        let slot = assignments.entry(sample_name.clone()).or_default();
        for name in names {
            let key = (sample_name.as_str(), name.as_str());
            if retracted.contains(&key) || slot.contains(&name) {
                continue;
            }
            slot.push(name);
        }
    }
    assignments.retain(|_, files| !files.is_empty());

    out.assignments = assignments;
    out.retractions = resolution.retractions;
    out.conflicts = resolution.conflicts;
    out
}

use crate::domain::{FileRecord, SampleRecord};
use crate::index::candidates::CandidateIndex;
use crate::link::keys::{is_usable_identifier, key_variants};
use crate::policy::LinkPolicy;

/// Files found for one sample and how they were found.
#[derive(Clone, Debug)]
pub struct SampleMatch<'a> {
    pub used_preferred_id: bool,
    /// Raw identifier the hit came from.
    pub identifier: String,
    /// Key as it appeared in the file names.
    pub matched_key: String,
    pub files: Vec<&'a FileRecord>,
}

/// Resolve files for `sample`: preferred sequence id first, then sample name.
/// Returns `None` when neither identifier finds anything.
pub fn match_sample<'a>(
    index: &'a CandidateIndex,
    sample: &SampleRecord,
    policy: &LinkPolicy,
) -> Option<SampleMatch<'a>> {
    let preferred = sample.preferred_sequence_id.as_deref();
    if is_usable_identifier(preferred) {
        if let Some(m) = preferred.and_then(|id| search(index, id, true, policy)) {
            return Some(m);
        }
    }
    if is_usable_identifier(Some(sample.sample_name.as_str())) {
        return search(index, &sample.sample_name, false, policy);
    }
    None
}

/// Try the raw key, then its one delimiter-substituted variant.
pub fn search<'a>(
    index: &'a CandidateIndex,
    identifier: &str,
    used_preferred_id: bool,
    policy: &LinkPolicy,
) -> Option<SampleMatch<'a>> {
    for key in key_variants(identifier) {
        let files: Vec<&FileRecord> = index
            .lookup(&key)
            .into_iter()
            .filter(|f| policy.accepts_file(&f.name))
            .collect();
        if !files.is_empty() {
            return Some(SampleMatch {
                used_preferred_id,
                identifier: identifier.trim().to_string(),
                matched_key: key,
                files,
            });
        }
    }
    None
}

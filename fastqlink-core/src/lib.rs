#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod policy;

pub mod index {
    pub mod candidates;
}

pub mod link {
    pub mod keys;
    pub mod matcher;
    pub mod resolve;
    pub mod score;
}

pub mod audit;
pub mod plan;
pub mod reconcile;

pub mod repo;
pub mod repo_factory;
pub mod repo_fs;

// Re-exports: stable API surface
pub use domain::{Claim, FileRecord, ReconciliationResult, Retraction, SampleRecord};
pub use index::candidates::CandidateIndex;
pub use link::matcher::{SampleMatch, match_sample};
pub use link::resolve::{ClaimBook, resolve_conflicts};
pub use plan::{SampleUpdate, apply_updates, plan_updates};
pub use policy::LinkPolicy;
pub use reconcile::{reconcile, reconcile_with};

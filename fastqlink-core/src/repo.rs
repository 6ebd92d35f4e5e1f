// fastqlink_core/src/repo.rs
use crate::domain::{FileRecord, SampleRecord};
use crate::error::Result;
use crate::plan::SampleUpdate;

#[derive(Clone, Debug)]
pub struct OpenParams {
    pub files_path: std::path::PathBuf,
    pub samples_path: std::path::PathBuf,
}

/// Where inventories come from and where a planned batch goes.
pub trait LinkRepo: Send + Sync {
    fn load_files(&self) -> Result<Vec<FileRecord>>;

    fn load_samples(&self) -> Result<Vec<SampleRecord>>;

    /// Apply the whole batch or nothing.
    fn persist(&self, updates: &[SampleUpdate]) -> Result<()>;
}

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::info;

use crate::domain::{FileRecord, SampleRecord};
use crate::error::{LinkError, Result};
use crate::plan::{SampleUpdate, apply_updates};
use crate::repo::{LinkRepo, OpenParams};

/// JSON-file backend: one array of file records, one array of sample records.
pub struct FsLinkRepo {
    files_path: PathBuf,
    samples_path: PathBuf,
}

impl FsLinkRepo {
    pub fn new(params: OpenParams) -> Result<Self> {
        for p in [&params.files_path, &params.samples_path] {
            if !p.is_file() {
                return Err(LinkError::Format(format!(
                    "inventory not found: {}",
                    p.display()
                )));
            }
        }
        Ok(Self {
            files_path: params.files_path,
            samples_path: params.samples_path,
        })
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let f = File::open(path)?;
    serde_json::from_reader(BufReader::new(f)).map_err(|e| {
        LinkError::Format(format!("{}: {e}", path.display()))
    })
}

/// Write next to the target, then rename over it.
pub fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut w, value)?;
        w.write_all(b"\n")?;
        w.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl LinkRepo for FsLinkRepo {
    fn load_files(&self) -> Result<Vec<FileRecord>> {
        read_json(&self.files_path)
    }

    fn load_samples(&self) -> Result<Vec<SampleRecord>> {
        read_json(&self.samples_path)
    }

    fn persist(&self, updates: &[SampleUpdate]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }
        // re-read so the batch lands on the latest copy
        let mut samples = self.load_samples()?;
        apply_updates(&mut samples, updates);
        write_json_atomic(&self.samples_path, &samples)?;
        info!(
            updates = updates.len(),
            path = %self.samples_path.display(),
            "persisted sample updates"
        );
        Ok(())
    }
}

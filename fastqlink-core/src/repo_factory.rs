use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{LinkError, Result};
use crate::repo::{LinkRepo, OpenParams};
use crate::repo_fs::FsLinkRepo;

/// Where the file and sample inventories live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// Two JSON arrays on the local filesystem.
    #[default]
    Json,
}

impl FromStr for Backend {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "fs" => Ok(Backend::Json),
            other => Err(LinkError::Format(format!(
                "unknown backend {other:?} (expected \"json\")"
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Json => f.write_str("json"),
        }
    }
}

pub fn open_repo(backend: Backend, p: OpenParams) -> Result<Box<dyn LinkRepo>> {
    debug!(
        %backend,
        files = %p.files_path.display(),
        samples = %p.samples_path.display(),
        "opening inventories"
    );
    match backend {
        Backend::Json => Ok(Box::new(FsLinkRepo::new(p)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn backend_names() {
        assert_eq!("json".parse::<Backend>().unwrap(), Backend::Json);
        assert_eq!(" FS ".parse::<Backend>().unwrap(), Backend::Json);
        assert_eq!(Backend::default().to_string(), "json");
        assert!(matches!(
            "mongo".parse::<Backend>(),
            Err(LinkError::Format(_))
        ));
    }

    #[test]
    fn opens_json_inventories() {
        let dir = TempDir::new().unwrap();
        let files = dir.path().join("files.json");
        let samples = dir.path().join("samples.json");
        std::fs::write(&files, "[]").unwrap();
        std::fs::write(&samples, r#"[{"sample_name": "A"}]"#).unwrap();

        let repo = open_repo(
            Backend::Json,
            OpenParams {
                files_path: files,
                samples_path: samples,
            },
        )
        .unwrap();
        assert!(repo.load_files().unwrap().is_empty());
        assert_eq!(repo.load_samples().unwrap()[0].sample_name, "A");
    }

    #[test]
    fn missing_inventory_fails_to_open() {
        let dir = TempDir::new().unwrap();
        let res = open_repo(
            Backend::Json,
            OpenParams {
                files_path: dir.path().join("files.json"),
                samples_path: dir.path().join("samples.json"),
            },
        );
        assert!(res.is_err());
    }
}

use std::path::PathBuf;

use fastqlink_core::audit::{
    empty_samples, orphan_files, recompute_filesize_sums, stale_links, suspicious_samples,
};
use fastqlink_core::domain::{FileRecord, ReconciliationResult};
use fastqlink_core::error::Result;
use fastqlink_core::index::candidates::CandidateIndex;
use fastqlink_core::link::matcher::search;
use fastqlink_core::plan::{SampleUpdate, plan_updates};
use fastqlink_core::policy::LinkPolicy;
use fastqlink_core::reconcile::reconcile_with;
use fastqlink_core::repo::{LinkRepo, OpenParams};
use fastqlink_core::repo_factory::{Backend, open_repo};
use fastqlink_core::repo_fs::{read_json, write_json_atomic};
use tracing::{info, warn};

/// Inventory locations shared by every command.
#[derive(Clone, Debug)]
pub struct Inventories {
    pub backend: Backend,
    pub files: PathBuf,
    pub samples: PathBuf,
}

fn repo_from_args(inv: Inventories) -> Result<Box<dyn LinkRepo>> {
    let params = OpenParams {
        files_path: inv.files,
        samples_path: inv.samples,
    };
    open_repo(inv.backend, params)
}

pub fn handle_reconcile(
    inv: Inventories,
    policy: LinkPolicy,
    write: bool,
    report: Option<PathBuf>,
) -> Result<()> {
    let repo = repo_from_args(inv)?;
    let inventory = repo.load_files()?;
    let records = repo.load_samples()?;
    info!(
        files = inventory.len(),
        samples = records.len(),
        "loaded inventories"
    );

    let result = reconcile_with(&inventory, &records, &policy);
    for name in &result.unmatched_samples {
        warn!(sample = %name, "no files found");
    }
    let updates = plan_updates(&result, &inventory, &records);

    println!(
        "matched {} files to {} samples; {} unmatched, {} skipped, {} contested, {} anomalies",
        result.assigned_file_count(),
        result.assignments.len(),
        result.unmatched_samples.len(),
        result.skipped_samples.len(),
        result.conflicts.len(),
        result.anomalies.len(),
    );
    for u in &updates {
        for f in &u.add_files {
            println!("+ {}  {}", u.sample_name, f);
        }
        for f in &u.remove_files {
            println!("- {}  {}", u.sample_name, f);
        }
    }

    if let Some(path) = report {
        write_json_atomic(&path, &result)?;
        eprintln!("reconcile: report written to {}", path.display());
    }
    if write {
        repo.persist(&updates)?;
        eprintln!("reconcile: {} sample updates written", updates.len());
    } else if !updates.is_empty() {
        eprintln!(
            "reconcile: dry run, {} sample updates not written (pass --write)",
            updates.len()
        );
    }
    Ok(())
}

pub fn handle_lookup(files: PathBuf, query: String, suffix: Option<String>) -> Result<()> {
    let inventory: Vec<FileRecord> = read_json(&files)?;
    let index = CandidateIndex::new(inventory);
    let policy = LinkPolicy {
        required_suffix: suffix,
        ..Default::default()
    };
    match search(&index, &query, false, &policy) {
        Some(m) => {
            println!("key {:?} hit {} files", m.matched_key, m.files.len());
            for f in m.files {
                println!("{}  {} bytes", f.name, f.size);
            }
        }
        None => println!("no files for {query:?}"),
    }
    Ok(())
}

pub fn handle_audit_stale(inv: Inventories, write: bool) -> Result<()> {
    let repo = repo_from_args(inv)?;
    let inventory = repo.load_files()?;
    let records = repo.load_samples()?;
    let stale = stale_links(&records, &inventory);
    for r in &stale {
        println!("{}  {}", r.sample_name, r.file_name);
    }
    if stale.is_empty() {
        eprintln!("audit: all linked files exist in the inventory");
        return Ok(());
    }
    if write {
        let pull = ReconciliationResult {
            retractions: stale,
            ..Default::default()
        };
        let updates = plan_updates(&pull, &inventory, &records);
        repo.persist(&updates)?;
        eprintln!("audit: pulled stale links from {} samples", updates.len());
    }
    Ok(())
}

pub fn handle_audit_orphans(inv: Inventories) -> Result<()> {
    let repo = repo_from_args(inv)?;
    let inventory = repo.load_files()?;
    let records = repo.load_samples()?;
    for f in orphan_files(&records, &inventory) {
        println!("{}  {} bytes", f.name, f.size);
    }
    Ok(())
}

pub fn handle_audit_suspicious(
    inv: Inventories,
    min: usize,
    exclude: Vec<String>,
) -> Result<()> {
    let repo = repo_from_args(inv)?;
    let records = repo.load_samples()?;
    for s in suspicious_samples(&records, min, &exclude) {
        println!(
            "{}  project={}  files={}",
            s.sample_name,
            s.project_id.as_deref().unwrap_or("N/A"),
            s.files.len()
        );
        for f in &s.files {
            println!("  {f}");
        }
    }
    Ok(())
}

pub fn handle_audit_empty(inv: Inventories, project: Option<String>) -> Result<()> {
    let repo = repo_from_args(inv)?;
    let records = repo.load_samples()?;
    for name in empty_samples(&records, project.as_deref()) {
        println!("{name}");
    }
    Ok(())
}

pub fn handle_audit_filesize(inv: Inventories, write: bool) -> Result<()> {
    let repo = repo_from_args(inv)?;
    let inventory = repo.load_files()?;
    let records = repo.load_samples()?;
    let drift = recompute_filesize_sums(&records, &inventory);
    for d in &drift {
        match d.stored {
            Some(old) => println!("{}  {} -> {}", d.sample_name, old, d.computed),
            None => println!("{}  unset -> {}", d.sample_name, d.computed),
        }
    }
    if write && !drift.is_empty() {
        let updates: Vec<SampleUpdate> = drift
            .into_iter()
            .map(|d| SampleUpdate {
                sample_name: d.sample_name,
                add_files: Vec::new(),
                remove_files: Vec::new(),
                filesize_sum: d.computed,
                received: None,
            })
            .collect();
        repo.persist(&updates)?;
        eprintln!("audit: updated filesize_sum on {} samples", updates.len());
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use fastqlink_core::policy::DEFAULT_ANOMALY_THRESHOLD;
use fastqlink_core::repo_factory::Backend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "fastqlinkdev CLI (alpha)", long_about = None)]
pub struct Cli {
    /// Log filter when RUST_LOG is unset (e.g. "info", "fastqlink_core=debug")
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Inventory backend
    #[arg(long, global = true, env = "FASTQLINK_BACKEND", default_value = "json")]
    pub backend: Backend,

    /// JSON array of storage inventory records
    #[arg(long, global = true, env = "FASTQLINK_FILES", default_value = "files.json")]
    pub files: PathBuf,

    /// JSON array of sample records
    #[arg(long, global = true, env = "FASTQLINK_SAMPLES", default_value = "samples.json")]
    pub samples: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum AuditCommands {
    /// Sample links pointing at files missing from the inventory
    Stale {
        /// pull the stale links from the sample records
        #[arg(long)]
        write: bool,
    },
    /// Inventory files held by no sample
    Orphans,
    /// Samples holding an unusually large number of files
    Suspicious {
        #[arg(long, default_value_t = 11)]
        min: usize,
        /// project id to leave out (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },
    /// Samples with no files
    Empty {
        #[arg(long)]
        project: Option<String>,
    },
    /// Samples whose stored filesize_sum disagrees with the inventory
    Filesize {
        /// store the recomputed sums
        #[arg(long)]
        write: bool,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Link inventory files to samples and settle contested files
    Reconcile {
        /// only samples whose lane name contains this string
        #[arg(long)]
        lane: Option<String>,
        /// keep only matched files with this suffix (e.g. ".gz")
        #[arg(long)]
        suffix: Option<String>,
        #[arg(long, default_value_t = DEFAULT_ANOMALY_THRESHOLD)]
        anomaly_threshold: usize,
        /// skip samples not flagged as sequenced
        #[arg(long)]
        skip_unsequenced: bool,
        /// persist the planned updates to the samples file
        #[arg(long)]
        write: bool,
        /// write the full result as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show which files a key would hit
    Lookup {
        query: String,
        #[arg(long)]
        suffix: Option<String>,
    },

    #[command(subcommand)]
    /// Inventory consistency checks
    Audit(AuditCommands),
}

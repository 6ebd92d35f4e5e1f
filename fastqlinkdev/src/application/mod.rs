pub mod handlers;

use crate::presentation::cli::{AuditCommands, Cli, Commands};
use clap::Parser;
use fastqlink_core::error::Result;
use fastqlink_core::policy::LinkPolicy;
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let inv = handlers::Inventories {
        backend: cli.backend,
        files: cli.files,
        samples: cli.samples,
    };
    match cli.command {
        Commands::Reconcile {
            lane,
            suffix,
            anomaly_threshold,
            skip_unsequenced,
            write,
            report,
        } => {
            let policy = LinkPolicy {
                required_suffix: suffix,
                anomaly_threshold,
                lane,
                skip_unsequenced,
            };
            handlers::handle_reconcile(inv, policy, write, report)
        }
        Commands::Lookup { query, suffix } => handlers::handle_lookup(inv.files, query, suffix),
        Commands::Audit(cmd) => match cmd {
            AuditCommands::Stale { write } => handlers::handle_audit_stale(inv, write),
            AuditCommands::Orphans => handlers::handle_audit_orphans(inv),
            AuditCommands::Suspicious { min, exclude } => {
                handlers::handle_audit_suspicious(inv, min, exclude)
            }
            AuditCommands::Empty { project } => handlers::handle_audit_empty(inv, project),
            AuditCommands::Filesize { write } => {
                handlers::handle_audit_filesize(inv, write)
            }
        },
    }
}

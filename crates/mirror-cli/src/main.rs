//! Release Mirror
//!
//! Mirrors a fixed set of release assets from a hosted repository into a
//! local directory, downloading only what changed upstream.
//!
//! # Usage
//!
//! ```bash
//! GITHUB_OWNER=acme GITHUB_REPOSITORY=widgets \
//! GITHUB_ARTEFACTS=widget.tar.gz,widget.tar.gz.sig \
//! DOWNLOAD_PATH=/srv/mirror CHECK_INTERVAL=1h release-mirror
//! ```
//!
//! # Environment Variables
//!
//! - `GITHUB_OWNER`, `GITHUB_REPOSITORY`: source repository (required)
//! - `GITHUB_ARTEFACTS`: comma-separated asset names (required)
//! - `DOWNLOAD_PATH`: local mirror directory (required)
//! - `CHECK_INTERVAL`: time between checks; empty or `0` runs once
//! - `GITHUB_BASE_URL`: release host (default `https://github.com`)
//! - `RUST_LOG`: log filter (default `info`)

mod cli;
mod error;
mod signal;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use mirror_core::{MirrorConfig, MirrorPass, Schedule, Scheduler, SyncEngine};

use cli::Cli;
use error::{CliError, Result};
use signal::ShutdownSignal;

const VERBOSE_FILTER: &str = "release_mirror=debug,mirror_core=debug,mirror_fs=debug,info";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("Verbose mode enabled");
}

async fn run(cli: Cli) -> Result<()> {
    let config = MirrorConfig::from_settings(cli.settings())?;
    tracing::info!(
        owner = config.source.owner(),
        repository = config.source.repository(),
        artifacts = %config.artifacts,
        target_dir = %config.target_dir.display(),
        schedule = ?config.schedule,
        "Configuration loaded"
    );

    let engine = SyncEngine::new()?;
    let pass = MirrorPass::new(engine, &config);
    let scheduler = Scheduler::new(config.schedule);

    let summary = match config.schedule {
        Schedule::RunOnce => scheduler.run(&pass, std::future::pending()).await,
        Schedule::Every(_) => {
            let shutdown = ShutdownSignal::install().map_err(CliError::Signal)?;
            scheduler.run(&pass, shutdown.recv()).await
        }
    };

    tracing::debug!(passes = summary.passes, stop = ?summary.stop, "Scheduler stopped");
    Ok(())
}

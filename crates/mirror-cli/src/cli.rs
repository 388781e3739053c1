//! CLI argument parsing using clap derive
//!
//! Every setting can also come from the environment, which is how the
//! mirror is normally configured when it runs as a sidecar container.

use clap::Parser;

use mirror_core::Settings;

/// Release Mirror - keep a directory in sync with a repository's latest release assets
#[derive(Parser, Debug)]
#[command(name = "release-mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Owner of the source repository
    #[arg(long, env = "GITHUB_OWNER")]
    pub owner: Option<String>,

    /// Name of the source repository
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Comma-separated release asset names to mirror
    #[arg(long, env = "GITHUB_ARTEFACTS")]
    pub artefacts: Option<String>,

    /// Local directory to mirror into
    #[arg(long, env = "DOWNLOAD_PATH")]
    pub download_path: Option<String>,

    /// Time between checks, e.g. 30m or 1h30m; empty or 0 runs once
    #[arg(long, env = "CHECK_INTERVAL")]
    pub check_interval: Option<String>,

    /// Release host, for GitHub Enterprise or a caching proxy
    #[arg(long, env = "GITHUB_BASE_URL")]
    pub base_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Raw settings for validation by mirror-core.
    pub fn settings(&self) -> Settings {
        Settings {
            owner: self.owner.clone(),
            repository: self.repository.clone(),
            artifacts: self.artefacts.clone(),
            target_dir: self.download_path.clone(),
            check_interval: self.check_interval.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

//! Startup configuration
//!
//! The binary collects raw [`Settings`] from flags and environment variables;
//! [`MirrorConfig::from_settings`] validates them before any network activity.

use std::path::PathBuf;
use std::time::Duration;

use crate::{Error, ReleaseSource, Result, interval::parse_interval, source::DEFAULT_BASE_URL};

/// Environment variable holding the repository owner.
pub const OWNER_VAR: &str = "GITHUB_OWNER";
/// Environment variable holding the repository name.
pub const REPOSITORY_VAR: &str = "GITHUB_REPOSITORY";
/// Environment variable holding the comma-separated artifact list.
pub const ARTIFACTS_VAR: &str = "GITHUB_ARTEFACTS";
/// Environment variable holding the local mirror directory.
pub const TARGET_DIR_VAR: &str = "DOWNLOAD_PATH";
/// Environment variable holding the check interval.
pub const INTERVAL_VAR: &str = "CHECK_INTERVAL";
/// Environment variable overriding the release host.
pub const BASE_URL_VAR: &str = "GITHUB_BASE_URL";

/// Raw, unvalidated settings.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub owner: Option<String>,
    pub repository: Option<String>,
    pub artifacts: Option<String>,
    pub target_dir: Option<String>,
    pub check_interval: Option<String>,
    pub base_url: Option<String>,
}

/// How often passes run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// One pass, then exit.
    RunOnce,
    /// A pass immediately and then every interval until shutdown.
    Every(Duration),
}

impl Schedule {
    /// Empty input and any zero duration select [`Schedule::RunOnce`].
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Ok(Self::RunOnce);
        }
        let interval = parse_interval(raw)?;
        if interval.is_zero() {
            Ok(Self::RunOnce)
        } else {
            Ok(Self::Every(interval))
        }
    }
}

/// Validated configuration, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub source: ReleaseSource,
    /// Comma-separated artifact names as configured.
    pub artifacts: String,
    pub target_dir: PathBuf,
    pub schedule: Schedule,
}

impl MirrorConfig {
    /// Validate raw settings. Every missing required setting is reported at once.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let Settings {
            owner,
            repository,
            artifacts,
            target_dir,
            check_interval,
            base_url,
        } = settings;

        let owner = present(owner);
        let repository = present(repository);
        let artifacts = present(artifacts);
        let target_dir = present(target_dir);

        let missing: Vec<&'static str> = [
            (OWNER_VAR, owner.is_none()),
            (REPOSITORY_VAR, repository.is_none()),
            (ARTIFACTS_VAR, artifacts.is_none()),
            (TARGET_DIR_VAR, target_dir.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        let (Some(owner), Some(repository), Some(artifacts), Some(target_dir)) =
            (owner, repository, artifacts, target_dir)
        else {
            return Err(Error::MissingSettings { names: missing });
        };

        let schedule = Schedule::parse(check_interval.as_deref())?;
        let base_url = present(base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            source: ReleaseSource::with_base_url(base_url, owner, repository),
            artifacts,
            target_dir: PathBuf::from(target_dir),
            schedule,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! SyncEngine implementation
//!
//! The SyncEngine brings one local directory up to date with a release
//! source. For each artifact it asks the source for `Last-Modified` with a
//! HEAD request, downloads only when the remote copy is newer (or when that
//! cannot be established), stages the body next to the target, renames it
//! into place, and stamps the result with the remote modification time so
//! the next pass compares against the source's clock rather than ours.

use std::path::Path;
use std::time::SystemTime;

use reqwest::header::{HeaderMap, LAST_MODIFIED};
use tracing::{debug, error, info, warn};

use mirror_fs::StagingFile;

use crate::freshness::{Freshness, parse_http_date};
use crate::{Error, ReleaseSource, Result, parse_artifact_list};

/// Default capacity of the write buffer in front of each staging file.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Idle connections kept per host between requests and passes.
const MAX_IDLE_PER_HOST: usize = 4;

const USER_AGENT: &str = concat!("release-mirror/", env!("CARGO_PKG_VERSION"));

/// Result of syncing a single artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The local copy is at least as new as the remote one
    UpToDate,
    /// A new copy was downloaded and placed
    Downloaded {
        bytes: u64,
        /// Remote modification time applied to the file, if the source sent one
        remote_modified: Option<SystemTime>,
    },
}

/// Summary of one pass over the artifact list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Artifacts that were downloaded
    pub downloaded: Vec<String>,
    /// Artifacts that were already current
    pub up_to_date: Vec<String>,
    /// Artifacts that failed, with the reason
    pub failed: Vec<(String, String)>,
    /// Set when the pass was abandoned before any artifact was attempted
    pub aborted: Option<String>,
}

impl PassReport {
    /// Number of artifacts the pass attempted
    pub fn attempted(&self) -> usize {
        self.downloaded.len() + self.up_to_date.len() + self.failed.len()
    }

    /// True when nothing failed and the pass was not abandoned
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.aborted.is_none()
    }
}

/// Engine for mirroring release artifacts
///
/// Owns the HTTP client so connections are pooled across artifacts and
/// passes. Construct once at startup and share by reference.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    client: reqwest::Client,
    buffer_capacity: usize,
}

impl SyncEngine {
    /// Create an engine with its own pooled HTTP client.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
            .build()
            .map_err(Error::Client)?;
        Ok(Self::with_client(client))
    }

    /// Create an engine around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Change the staging write buffer capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }

    /// Bring `target_dir/artifact` up to date with `url`.
    ///
    /// When a local copy exists, a HEAD request decides whether the download
    /// can be skipped. Failure of that check only means the download happens.
    pub async fn sync_one(
        &self,
        url: &str,
        artifact: &str,
        target_dir: &Path,
    ) -> Result<SyncOutcome> {
        let local_path = target_dir.join(artifact);
        info!(artifact, "Processing artifact");

        match mirror_fs::modified_time(&local_path) {
            Ok(Some(local)) => {
                if let Freshness::Current { remote, local } =
                    self.check_freshness(url, artifact, local).await
                {
                    info!(
                        artifact,
                        remote_modified = ?remote,
                        local_modified = ?local,
                        "No new version available"
                    );
                    return Ok(SyncOutcome::UpToDate);
                }
            }
            Ok(None) => debug!(artifact, "No local copy"),
            Err(e) => warn!(artifact, error = %e, "Cannot read local copy; downloading"),
        }

        self.download(url, artifact, target_dir, &local_path).await
    }

    /// Sync every artifact in the comma-separated `artifacts` list, in order.
    ///
    /// Failures are logged per artifact and never stop the pass. If the
    /// target directory cannot be created, no artifact is attempted.
    pub async fn sync_all(
        &self,
        source: &ReleaseSource,
        artifacts: &str,
        target_dir: &Path,
    ) -> PassReport {
        let mut report = PassReport::default();

        if let Err(e) = mirror_fs::ensure_dir(target_dir) {
            error!(path = %target_dir.display(), error = %e, "Failed to create download directory");
            report.aborted = Some(e.to_string());
            return report;
        }

        for name in parse_artifact_list(artifacts) {
            let url = source.asset_url(&name);
            match self.sync_one(&url, name.as_str(), target_dir).await {
                Ok(SyncOutcome::UpToDate) => report.up_to_date.push(name.to_string()),
                Ok(SyncOutcome::Downloaded { .. }) => report.downloaded.push(name.to_string()),
                Err(e) => {
                    error!(artifact = %name, error = %e, "Failed to sync artifact");
                    report.failed.push((name.to_string(), e.to_string()));
                }
            }
        }

        report
    }

    async fn check_freshness(&self, url: &str, artifact: &str, local: SystemTime) -> Freshness {
        let response = match self.client.head(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(artifact, url, error = %e, "HEAD request failed; proceeding to download");
                return Freshness::Unknown {
                    reason: e.to_string(),
                };
            }
        };

        let freshness = Freshness::compare(last_modified(response.headers()).as_deref(), local);
        match &freshness {
            Freshness::Unknown { reason } => {
                info!(artifact, url, reason = %reason, "Freshness unknown; proceeding to download")
            }
            Freshness::Stale { remote, .. } => {
                debug!(artifact, remote_modified = ?remote, "Remote copy is newer")
            }
            Freshness::Current { .. } => {}
        }
        freshness
    }

    async fn download(
        &self,
        url: &str,
        artifact: &str,
        target_dir: &Path,
        local_path: &Path,
    ) -> Result<SyncOutcome> {
        info!(artifact, url, "Downloading");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Request {
                artifact: artifact.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                artifact: artifact.to_string(),
                status,
            });
        }
        let last_modified = last_modified(response.headers());

        let mut staging = StagingFile::create(target_dir, artifact, self.buffer_capacity)
            .await
            .map_err(Error::store(artifact))?;

        while let Some(chunk) = response.chunk().await.map_err(|source| Error::Body {
            artifact: artifact.to_string(),
            source,
        })? {
            staging.write(&chunk).await.map_err(Error::store(artifact))?;
        }

        let bytes = staging
            .commit(local_path)
            .await
            .map_err(Error::store(artifact))?;
        info!(artifact, bytes, path = %local_path.display(), "Stored artifact");

        let remote_modified = match last_modified {
            None => None,
            Some(raw) => {
                let Some(remote) = parse_http_date(&raw) else {
                    return Err(Error::InvalidLastModified {
                        artifact: artifact.to_string(),
                        value: raw,
                    });
                };
                mirror_fs::set_file_times(local_path, remote).map_err(Error::store(artifact))?;
                Some(remote)
            }
        };

        Ok(SyncOutcome::Downloaded {
            bytes,
            remote_modified,
        })
    }
}

/// Raw `Last-Modified` value, if the response carried one.
fn last_modified(headers: &HeaderMap) -> Option<String> {
    headers
        .get(LAST_MODIFIED)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn report_counts_attempts() {
        let report = PassReport {
            downloaded: vec!["a".into()],
            up_to_date: vec!["b".into()],
            failed: vec![("c".into(), "boom".into())],
            aborted: None,
        };
        assert_eq!(report.attempted(), 3);
        assert!(!report.is_clean());
        assert!(PassReport::default().is_clean());
    }

    #[test]
    fn last_modified_reads_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(last_modified(&headers), None);

        headers.insert(
            LAST_MODIFIED,
            HeaderValue::from_static("Sun, 06 Nov 1994 08:49:37 GMT"),
        );
        assert_eq!(
            last_modified(&headers).as_deref(),
            Some("Sun, 06 Nov 1994 08:49:37 GMT")
        );
    }

    #[test]
    fn buffer_capacity_never_zero() {
        let engine = SyncEngine::with_client(reqwest::Client::new()).with_buffer_capacity(0);
        assert_eq!(engine.buffer_capacity, 1);
    }
}

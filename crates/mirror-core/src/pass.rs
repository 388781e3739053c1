//! A single pass over the configured artifacts

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{MirrorConfig, PassReport, ReleaseSource, SyncEngine};

/// One unit of scheduled work.
#[async_trait]
pub trait SyncPass: Send + Sync {
    /// Run the pass to completion. Failures are reported, never raised.
    async fn run_pass(&self) -> PassReport;
}

/// The production pass: every configured artifact from one release source.
#[derive(Debug, Clone)]
pub struct MirrorPass {
    engine: SyncEngine,
    source: ReleaseSource,
    artifacts: String,
    target_dir: PathBuf,
}

impl MirrorPass {
    pub fn new(engine: SyncEngine, config: &MirrorConfig) -> Self {
        Self {
            engine,
            source: config.source.clone(),
            artifacts: config.artifacts.clone(),
            target_dir: config.target_dir.clone(),
        }
    }
}

#[async_trait]
impl SyncPass for MirrorPass {
    async fn run_pass(&self) -> PassReport {
        tracing::info!(
            owner = self.source.owner(),
            repository = self.source.repository(),
            target_dir = %self.target_dir.display(),
            "Checking for new release assets"
        );

        let report = self
            .engine
            .sync_all(&self.source, &self.artifacts, &self.target_dir)
            .await;

        if report.aborted.is_none() {
            tracing::info!(
                downloaded = report.downloaded.len(),
                up_to_date = report.up_to_date.len(),
                failed = report.failed.len(),
                "Pass complete"
            );
        }
        report
    }
}

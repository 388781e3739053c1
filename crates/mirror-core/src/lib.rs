//! Core of Release Mirror
//!
//! Keeps a local directory in step with the latest release assets of a
//! hosted repository:
//!
//! - **SyncEngine**: per-artifact freshness check, staged download, and
//!   atomic replacement, plus the sequential batch over a list of artifacts
//! - **Scheduler**: runs a pass immediately, then on a fixed interval until
//!   a shutdown request arrives between passes
//! - **Configuration**: validation of the raw settings the binary collects
//!
//! # Architecture
//!
//! ```text
//!        release-mirror (CLI)
//!                |
//!          mirror-core
//!      Scheduler -> SyncPass -> SyncEngine
//!                |
//!            mirror-fs
//! ```

pub mod artifact;
pub mod config;
pub mod engine;
pub mod error;
pub mod freshness;
pub mod interval;
pub mod pass;
pub mod scheduler;
pub mod source;

pub use artifact::{ArtifactName, parse_artifact_list};
pub use config::{MirrorConfig, Schedule, Settings};
pub use engine::{PassReport, SyncEngine, SyncOutcome};
pub use error::{Error, Result};
pub use freshness::{Freshness, parse_http_date};
pub use interval::parse_interval;
pub use pass::{MirrorPass, SyncPass};
pub use scheduler::{RunSummary, Scheduler, StopReason};
pub use source::{DEFAULT_BASE_URL, ReleaseSource};

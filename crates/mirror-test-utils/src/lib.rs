//! Shared test utilities for the release-mirror workspace.
//!
//! - [`server`]: a local stand-in for a release host, with per-asset control
//!   over status, `Last-Modified`, and broken bodies, and request counters
//! - [`files`]: helpers for files with a chosen modification time

pub mod files;
pub mod server;

pub use files::{http_date, unix_time, write_with_mtime};
pub use server::{FixtureAsset, ReleaseServer};

//! Filesystem primitives for Release Mirror
//!
//! Provides the local half of an artifact sync: staging downloads next to
//! their target, atomically replacing the target, and carrying the remote
//! modification time onto the replaced file.

pub mod error;
pub mod io;
pub mod staging;

pub use error::{Error, Result};
pub use io::{ensure_dir, modified_time, set_file_times};
pub use staging::{STAGING_PREFIX, StagingFile, staging_path};

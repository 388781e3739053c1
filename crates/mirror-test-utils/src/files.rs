//! File and timestamp fixtures.

use std::fs::{self, FileTimes, OpenOptions};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// `secs` seconds after the Unix epoch.
pub fn unix_time(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Format `time` as an HTTP date (`Sun, 06 Nov 1994 08:49:37 GMT`).
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Write `content` to `path` and set its modification time to `modified`.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn write_with_mtime(path: &Path, content: &[u8], modified: SystemTime) {
    fs::write(path, content)
        .unwrap_or_else(|e| panic!("write_with_mtime: failed to write {}: {e}", path.display()));
    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .unwrap_or_else(|e| panic!("write_with_mtime: failed to open {}: {e}", path.display()));
    file.set_times(FileTimes::new().set_modified(modified))
        .unwrap_or_else(|e| panic!("write_with_mtime: failed to set times: {e}"));
}

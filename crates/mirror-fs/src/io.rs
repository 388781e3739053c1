//! Directory and file-time helpers

use std::fs::{self, FileTimes, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use crate::{Error, Result};

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Modification time of `path`, or `None` if nothing exists there.
pub fn modified_time(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(meta) => meta
            .modified()
            .map(Some)
            .map_err(|e| Error::io(path, e)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Set the modification time of `path` to `modified` and its access time to now.
pub fn set_file_times(path: &Path, modified: SystemTime) -> Result<()> {
    let times_err = |source| Error::Times {
        path: path.to_path_buf(),
        source,
    };

    let file = OpenOptions::new().write(true).open(path).map_err(times_err)?;
    let times = FileTimes::new()
        .set_accessed(SystemTime::now())
        .set_modified(modified);
    file.set_times(times).map_err(times_err)?;

    tracing::debug!(path = %path.display(), ?modified, "Updated file times");
    Ok(())
}

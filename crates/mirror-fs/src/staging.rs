//! Staging files for in-progress downloads
//!
//! A download is written to `.tmp-<artifact>` in the target directory and
//! only renamed onto `<artifact>` once the whole body has been written. The
//! rename stays within one directory, so readers of the target directory see
//! either the previous file or the new one, never a partial write.

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::{Error, Result};

/// File name prefix marking a download that has not completed.
pub const STAGING_PREFIX: &str = ".tmp-";

/// Staging location for `artifact` inside `dir`.
pub fn staging_path(dir: &Path, artifact: &str) -> PathBuf {
    dir.join(format!("{STAGING_PREFIX}{artifact}"))
}

/// An open staging file.
///
/// Dropping a `StagingFile` that was never committed removes it from disk.
#[derive(Debug)]
pub struct StagingFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    bytes_written: u64,
    committed: bool,
}

impl StagingFile {
    /// Create (or truncate) the staging file for `artifact` in `dir`.
    ///
    /// `buffer_capacity` sizes the write buffer in front of the file.
    pub async fn create(dir: &Path, artifact: &str, buffer_capacity: usize) -> Result<Self> {
        let path = staging_path(dir, artifact);
        let file = File::create(&path)
            .await
            .map_err(|e| Error::io(&path, e))?;

        Ok(Self {
            path,
            writer: Some(BufWriter::with_capacity(buffer_capacity, file)),
            bytes_written: 0,
            committed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a chunk of the download body.
    pub async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(self.closed_error());
        };
        writer
            .write_all(chunk)
            .await
            .map_err(|e| Error::io(&self.path, e))?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// Flush the staged content to disk and rename it onto `target`,
    /// replacing whatever was there.
    pub async fn commit(mut self, target: &Path) -> Result<u64> {
        let mut writer = self.writer.take().ok_or_else(|| self.closed_error())?;
        writer
            .flush()
            .await
            .map_err(|e| Error::io(&self.path, e))?;
        let file = writer.into_inner();
        file.sync_all()
            .await
            .map_err(|e| Error::io(&self.path, e))?;
        drop(file);

        fs::rename(&self.path, target)
            .await
            .map_err(|source| Error::Rename {
                from: self.path.clone(),
                to: target.to_path_buf(),
                source,
            })?;

        self.committed = true;
        Ok(self.bytes_written)
    }

    fn closed_error(&self) -> Error {
        Error::io(
            &self.path,
            std::io::Error::other("staging file already closed"),
        )
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        drop(self.writer.take());
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), error = %e, "Could not remove staging file");
        }
    }
}

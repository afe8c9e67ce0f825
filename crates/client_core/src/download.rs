//! Saving the anonymized blob into a download directory.
//!
//! The blob is staged in a temporary file next to its destination and then
//! renamed into place. The staging file is removed on drop, so it never
//! outlives a `save` call whether or not the rename succeeds.

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use tempfile::NamedTempFile;
use tracing::info;

use crate::DownloadSink;

#[derive(Debug, Clone)]
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for FileDownloadSink {
    fn save(&self, file_name: &str, blob: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(blob)?;
        staged.flush()?;

        let target = self.dir.join(file_name);
        staged.persist(&target).map_err(|err| err.error)?;

        info!(path = %target.display(), bytes = blob.len(), "download saved");
        Ok(target)
    }
}

#[cfg(test)]
#[path = "tests/download_tests.rs"]
mod tests;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CSV_MIME_TYPE: &str = "text/csv";

/// Handle to the file the user picked. Only the location is held; the bytes
/// are read fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// k^m-anonymity and t-closeness knobs forwarded to the server untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnonymizationParams {
    pub k_value: u32,
    pub m_value: u32,
    pub t_value: f64,
}

impl Default for AnonymizationParams {
    fn default() -> Self {
        Self {
            k_value: 5,
            m_value: 2,
            t_value: 0.2,
        }
    }
}

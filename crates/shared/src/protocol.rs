use serde::{Deserialize, Serialize};

pub const DEFAULT_UPLOAD_PATH: &str = "/upload";
pub const DEFAULT_PREVIEW_PATH: &str = "/preview_headers";
pub const DOWNLOAD_FILE_NAME: &str = "anonymized_file.csv";

pub const FILE_FIELD: &str = "file";
pub const SENSITIVE_COLUMNS_FIELD: &str = "sensitive_columns";
pub const K_VALUE_FIELD: &str = "k_value";
pub const M_VALUE_FIELD: &str = "m_value";
pub const T_VALUE_FIELD: &str = "t_value";

/// Body of `POST /preview_headers`, and of failed `/upload` responses.
///
/// The server sends one of the two fields; `error` wins when both appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewHeadersResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Columns(Vec<String>),
    Rejected(String),
}

impl PreviewHeadersResponse {
    /// `None` when the body carries neither field. An empty `error` string
    /// counts as absent.
    pub fn into_outcome(self) -> Option<PreviewOutcome> {
        let error = self.error.filter(|message| !message.is_empty());
        match (error, self.columns) {
            (Some(error), _) => Some(PreviewOutcome::Rejected(error)),
            (None, Some(columns)) => Some(PreviewOutcome::Columns(columns)),
            (None, None) => None,
        }
    }
}

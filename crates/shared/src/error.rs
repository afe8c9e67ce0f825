use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NO_FILE_SELECTED_MESSAGE: &str = "Please select a CSV file first.";
pub const PROCESSING_FAILED_MESSAGE: &str = "Processing failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UserInputMissing,
    TransportFailure,
    ServerRejected,
    SemanticError,
    MalformedResponse,
    FileRead,
    InvalidRequest,
    DownloadFailed,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserInputMissing => "user_input_missing",
            Self::TransportFailure => "transport_failure",
            Self::ServerRejected => "server_rejected",
            Self::SemanticError => "semantic_error",
            Self::MalformedResponse => "malformed_response",
            Self::FileRead => "file_read",
            Self::InvalidRequest => "invalid_request",
            Self::DownloadFailed => "download_failed",
        }
    }
}

/// Every way a submit or preview interaction can fail.
///
/// `Display` is meant for logs and keeps diagnostic detail; the text shown to
/// the user comes from [`ClientError::user_message`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no file selected")]
    UserInputMissing,
    #[error("transport failure: {message}")]
    TransportFailure { message: String },
    #[error("server rejected request with status {status}")]
    ServerRejected { status: u16, detail: Option<String> },
    #[error("server reported error: {message}")]
    SemanticError { message: String },
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },
    #[error("failed to read {path}: {message}")]
    FileRead { path: String, message: String },
    #[error("could not build request: {message}")]
    InvalidRequest { message: String },
    #[error("failed to save download: {message}")]
    DownloadFailed { message: String },
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserInputMissing => ErrorKind::UserInputMissing,
            Self::TransportFailure { .. } => ErrorKind::TransportFailure,
            Self::ServerRejected { .. } => ErrorKind::ServerRejected,
            Self::SemanticError { .. } => ErrorKind::SemanticError,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::FileRead { .. } => ErrorKind::FileRead,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::DownloadFailed { .. } => ErrorKind::DownloadFailed,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::UserInputMissing => NO_FILE_SELECTED_MESSAGE.to_string(),
            Self::TransportFailure { message }
            | Self::MalformedResponse { message }
            | Self::SemanticError { message }
            | Self::InvalidRequest { message } => message.clone(),
            Self::ServerRejected { .. } => PROCESSING_FAILED_MESSAGE.to_string(),
            Self::FileRead { path, message } => format!("Could not read {path}: {message}"),
            Self::DownloadFailed { message } => format!("Could not save download: {message}"),
        }
    }
}

use std::{io, path::PathBuf};

use async_trait::async_trait;
use shared::{domain::SelectedFile, error::ClientError};

pub mod controller;
pub mod download;
pub mod form;
pub mod http;
pub mod menu;

pub use controller::UploadController;
pub use download::FileDownloadSink;
pub use form::{SubmitPayload, UploadForm};
pub use http::{AnonymizerClient, EndpointError, Endpoints};
pub use menu::{ColumnMenu, ColumnMenuEntry, MenuOptions};

/// The modal/alert surface. Each call replaces whatever is currently shown.
pub trait Notifier: Send + Sync {
    /// Blocking indicator; the user cannot interact until it is replaced.
    fn show_loading(&self, title: &str, text: &str);
    fn show_success(&self, title: &str, text: &str);
    fn show_error(&self, title: &str, message: &str);
    fn show_column_menu(&self, menu: &ColumnMenu);
    fn dismiss(&self);
}

/// Host capability for handing a finished blob to the user as a named file.
pub trait DownloadSink: Send + Sync {
    fn save(&self, file_name: &str, blob: &[u8]) -> io::Result<PathBuf>;
}

/// The two server interactions. Each is a single request that either yields
/// its payload or fails; nothing is retried.
#[async_trait]
pub trait AnonymizerApi: Send + Sync {
    /// Posts the multipart form and returns the anonymized CSV bytes.
    async fn submit(&self, payload: SubmitPayload) -> Result<Vec<u8>, ClientError>;
    /// Posts only the file and returns its header row.
    async fn preview_headers(&self, file: &SelectedFile) -> Result<Vec<String>, ClientError>;
}

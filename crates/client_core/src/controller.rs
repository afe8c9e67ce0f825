//! Submit, header preview and sensitive-column selection over one shared
//! upload form.

use std::{path::PathBuf, sync::Arc};

use shared::{
    domain::{AnonymizationParams, SelectedFile},
    error::ClientError,
    protocol::DOWNLOAD_FILE_NAME,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    form::UploadForm,
    menu::{ColumnMenu, ColumnMenuEntry},
    AnonymizerApi, DownloadSink, Notifier,
};

pub const PROCESSING_TITLE: &str = "Processing...";
pub const PROCESSING_TEXT: &str = "Please wait while your file is being anonymized.";
pub const SUCCESS_TITLE: &str = "Success!";
pub const SUCCESS_TEXT: &str = "Your anonymized file is ready for download.";
pub const ERROR_TITLE: &str = "Error";

/// Owns the upload form and drives the three user interactions against it.
///
/// The form lock is only taken for short synchronous sections and never held
/// across a network call, so overlapping previews and submits proceed
/// independently. Whichever preview finishes last wins the menu.
pub struct UploadController {
    api: Arc<dyn AnonymizerApi>,
    notifier: Arc<dyn Notifier>,
    downloads: Arc<dyn DownloadSink>,
    form: Mutex<UploadForm>,
}

impl UploadController {
    pub fn new(
        api: Arc<dyn AnonymizerApi>,
        notifier: Arc<dyn Notifier>,
        downloads: Arc<dyn DownloadSink>,
        form: UploadForm,
    ) -> Arc<Self> {
        Arc::new(Self {
            api,
            notifier,
            downloads,
            form: Mutex::new(form),
        })
    }

    pub async fn select_file(&self, file: SelectedFile) {
        self.form.lock().await.select_file(file);
    }

    pub async fn clear_file(&self) {
        self.form.lock().await.clear_file();
    }

    pub async fn set_params(&self, params: AnonymizationParams) {
        self.form.lock().await.set_params(params);
    }

    pub async fn form_snapshot(&self) -> UploadForm {
        self.form.lock().await.clone()
    }

    pub async fn sensitive_columns_text(&self) -> String {
        self.form.lock().await.sensitive_columns_text().to_string()
    }

    /// Models the user typing directly into the sensitive-columns input.
    pub async fn set_sensitive_columns_text(&self, raw: &str) {
        self.form.lock().await.set_sensitive_columns_text(raw);
    }

    /// Adds `name` to the sensitive columns unless it is already there.
    /// Returns whether the field changed.
    pub async fn add_sensitive_column(&self, name: &str) -> bool {
        self.form.lock().await.add_sensitive_column(name)
    }

    pub async fn select_menu_entry(&self, entry: &ColumnMenuEntry) -> bool {
        self.add_sensitive_column(entry.name()).await
    }

    /// Closes the column menu, the way clicking outside the modal would.
    pub fn dismiss_menu(&self) {
        self.notifier.dismiss();
    }

    /// Fetches the selected file's header row and shows it as a column menu.
    pub async fn preview_headers(&self) -> Result<ColumnMenu, ClientError> {
        match self.fetch_columns().await {
            Ok(columns) => {
                let menu = ColumnMenu::from_columns(columns);
                self.notifier.show_column_menu(&menu);
                Ok(menu)
            }
            Err(err) => {
                warn!(kind = err.kind().as_str(), error = %err, "header preview failed");
                self.notifier.show_error(ERROR_TITLE, &err.user_message());
                Err(err)
            }
        }
    }

    async fn fetch_columns(&self) -> Result<Vec<String>, ClientError> {
        let file = self
            .form
            .lock()
            .await
            .selected_file()
            .cloned()
            .ok_or(ClientError::UserInputMissing)?;
        self.api.preview_headers(&file).await
    }

    /// Submits the form and saves the anonymized result as
    /// `anonymized_file.csv`.
    ///
    /// The loading indicator goes up before anything else. On success the form
    /// is reset; on failure it is left as is so the user can retry.
    pub async fn handle_form_submit(&self) -> Result<PathBuf, ClientError> {
        self.notifier.show_loading(PROCESSING_TITLE, PROCESSING_TEXT);

        match self.submit_and_download().await {
            Ok(path) => {
                self.notifier.show_success(SUCCESS_TITLE, SUCCESS_TEXT);
                self.form.lock().await.reset();
                info!(path = %path.display(), "anonymized file downloaded");
                Ok(path)
            }
            Err(err) => {
                warn!(kind = err.kind().as_str(), error = %err, "form submission failed");
                self.notifier.show_error(ERROR_TITLE, &err.user_message());
                Err(err)
            }
        }
    }

    async fn submit_and_download(&self) -> Result<PathBuf, ClientError> {
        let payload = self.form.lock().await.submit_payload()?;
        let blob = self.api.submit(payload).await?;

        let downloads = Arc::clone(&self.downloads);
        tokio::task::spawn_blocking(move || downloads.save(DOWNLOAD_FILE_NAME, &blob))
            .await
            .map_err(|err| ClientError::DownloadFailed {
                message: err.to_string(),
            })?
            .map_err(|err| ClientError::DownloadFailed {
                message: err.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

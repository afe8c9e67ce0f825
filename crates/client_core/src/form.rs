//! Shared form state: file selection, the sensitive-columns field and the
//! anonymization parameters.

use shared::{
    columns::SensitiveColumns,
    domain::{AnonymizationParams, SelectedFile},
    error::ClientError,
};
use url::Url;

/// Everything the submit endpoint receives, captured at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitPayload {
    pub action: Url,
    pub file: SelectedFile,
    pub sensitive_columns: String,
    pub params: AnonymizationParams,
}

#[derive(Debug, Clone)]
pub struct UploadForm {
    action: Url,
    file: Option<SelectedFile>,
    sensitive_columns: SensitiveColumns,
    // What the text input currently displays. Normally the serialized set; a
    // manual edit is kept verbatim until the next selection re-serializes it.
    sensitive_columns_text: String,
    params: AnonymizationParams,
    default_params: AnonymizationParams,
}

impl UploadForm {
    pub fn new(action: Url, default_params: AnonymizationParams) -> Self {
        Self {
            action,
            file: None,
            sensitive_columns: SensitiveColumns::new(),
            sensitive_columns_text: String::new(),
            params: default_params,
            default_params,
        }
    }

    pub fn action(&self) -> &Url {
        &self.action
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.file = Some(file);
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn params(&self) -> AnonymizationParams {
        self.params
    }

    pub fn set_params(&mut self, params: AnonymizationParams) {
        self.params = params;
    }

    pub fn sensitive_columns(&self) -> &SensitiveColumns {
        &self.sensitive_columns
    }

    pub fn sensitive_columns_text(&self) -> &str {
        &self.sensitive_columns_text
    }

    /// Replaces the field text as if the user typed it.
    pub fn set_sensitive_columns_text(&mut self, raw: &str) {
        self.sensitive_columns = SensitiveColumns::deserialize(raw);
        self.sensitive_columns_text = raw.to_string();
    }

    /// Returns `true` when `name` was not selected yet. Any insertion
    /// re-serializes the field, normalizing earlier manual edits.
    pub fn add_sensitive_column(&mut self, name: &str) -> bool {
        let inserted = self.sensitive_columns.add(name);
        if inserted {
            self.sensitive_columns_text = self.sensitive_columns.serialize();
        }
        inserted
    }

    pub fn submit_payload(&self) -> Result<SubmitPayload, ClientError> {
        let file = self.file.clone().ok_or(ClientError::UserInputMissing)?;
        Ok(SubmitPayload {
            action: self.action.clone(),
            file,
            sensitive_columns: self.sensitive_columns_text.clone(),
            params: self.params,
        })
    }

    /// Back to defaults. The action URL is not a field and survives.
    pub fn reset(&mut self) {
        self.file = None;
        self.sensitive_columns.clear();
        self.sensitive_columns_text.clear();
        self.params = self.default_params;
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;

//! reqwest-backed implementation of [`AnonymizerApi`].

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response, StatusCode,
};
use shared::{
    domain::{SelectedFile, CSV_MIME_TYPE},
    error::ClientError,
    protocol::{
        PreviewHeadersResponse, PreviewOutcome, FILE_FIELD, K_VALUE_FIELD, M_VALUE_FIELD,
        SENSITIVE_COLUMNS_FIELD, T_VALUE_FIELD,
    },
};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::{form::SubmitPayload, AnonymizerApi};

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("invalid endpoint path '{path}': {source}")]
    InvalidPath {
        path: String,
        source: url::ParseError,
    },
}

/// Absolute URLs of the submit (form action) and preview endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub upload: Url,
    pub preview: Url,
}

impl Endpoints {
    pub fn new(
        server_url: &str,
        upload_path: &str,
        preview_path: &str,
    ) -> Result<Self, EndpointError> {
        let base = Url::parse(server_url).map_err(|source| EndpointError::InvalidServerUrl {
            url: server_url.to_string(),
            source,
        })?;
        let join = |path: &str| {
            base.join(path).map_err(|source| EndpointError::InvalidPath {
                path: path.to_string(),
                source,
            })
        };
        Ok(Self {
            upload: join(upload_path)?,
            preview: join(preview_path)?,
        })
    }
}

pub struct AnonymizerClient {
    http: Client,
    preview_url: Url,
}

impl AnonymizerClient {
    pub fn new(preview_url: Url) -> Self {
        Self {
            http: Client::new(),
            preview_url,
        }
    }
}

fn transport(err: reqwest::Error) -> ClientError {
    ClientError::TransportFailure {
        message: err.to_string(),
    }
}

async fn file_part(file: &SelectedFile) -> Result<Part, ClientError> {
    let bytes = tokio::fs::read(file.path())
        .await
        .map_err(|err| ClientError::FileRead {
            path: file.path().display().to_string(),
            message: err.to_string(),
        })?;
    upload_part(bytes, &file.file_name, CSV_MIME_TYPE)
}

fn upload_part(bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<Part, ClientError> {
    Part::bytes(bytes)
        .file_name(file_name.to_string())
        .mime_str(mime)
        .map_err(|err| ClientError::InvalidRequest {
            message: err.to_string(),
        })
}

/// Pulls the `error` field out of a failed response body, falling back to
/// the raw text.
async fn rejection(status: StatusCode, response: Response) -> ClientError {
    let detail = match response.text().await {
        Ok(body) => match serde_json::from_str::<PreviewHeadersResponse>(&body) {
            Ok(PreviewHeadersResponse {
                error: Some(error), ..
            }) => Some(error),
            _ if body.trim().is_empty() => None,
            _ => Some(body),
        },
        Err(_) => None,
    };
    ClientError::ServerRejected {
        status: status.as_u16(),
        detail,
    }
}

#[async_trait]
impl AnonymizerApi for AnonymizerClient {
    async fn submit(&self, payload: SubmitPayload) -> Result<Vec<u8>, ClientError> {
        let form = Form::new()
            .part(FILE_FIELD, file_part(&payload.file).await?)
            .text(SENSITIVE_COLUMNS_FIELD, payload.sensitive_columns.clone())
            .text(K_VALUE_FIELD, payload.params.k_value.to_string())
            .text(M_VALUE_FIELD, payload.params.m_value.to_string())
            .text(T_VALUE_FIELD, payload.params.t_value.to_string());

        debug!(
            action = %payload.action,
            file = %payload.file.file_name,
            sensitive_columns = %payload.sensitive_columns,
            "submitting upload form"
        );
        let response = self
            .http
            .post(payload.action.clone())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejection(status, response).await);
        }

        let blob = response.bytes().await.map_err(transport)?;
        info!(bytes = blob.len(), "received anonymized file");
        Ok(blob.to_vec())
    }

    async fn preview_headers(&self, file: &SelectedFile) -> Result<Vec<String>, ClientError> {
        let form = Form::new().part(FILE_FIELD, file_part(file).await?);

        debug!(url = %self.preview_url, file = %file.file_name, "requesting header preview");
        let response = self
            .http
            .post(self.preview_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        // The server reports semantic failures in the body, sometimes with a
        // 4xx/5xx status, so the body is inspected before the status.
        let parsed = serde_json::from_slice::<PreviewHeadersResponse>(&body);
        match parsed.map(PreviewHeadersResponse::into_outcome) {
            Ok(Some(PreviewOutcome::Columns(columns))) => {
                info!(columns = columns.len(), "header preview received");
                Ok(columns)
            }
            Ok(Some(PreviewOutcome::Rejected(message))) => {
                Err(ClientError::SemanticError { message })
            }
            _ if !status.is_success() => Err(ClientError::ServerRejected {
                status: status.as_u16(),
                detail: Some(String::from_utf8_lossy(&body).into_owned())
                    .filter(|text| !text.trim().is_empty()),
            }),
            Ok(None) => Err(ClientError::MalformedResponse {
                message: "preview response has neither columns nor error".to_string(),
            }),
            Err(err) => Err(ClientError::MalformedResponse {
                message: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;

use std::{path::PathBuf, sync::Arc};

use super::*;
use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode as HttpStatus},
    response::IntoResponse,
    routing::post,
    Router,
};
use shared::domain::AnonymizationParams;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<Vec<ReceivedField>>>>,
    status: HttpStatus,
    body: Vec<u8>,
}

impl StubState {
    fn replying(status: HttpStatus, body: impl Into<Vec<u8>>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            status,
            body: body.into(),
        }
    }
}

async fn collect_fields(mut multipart: Multipart) -> Vec<ReceivedField> {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.expect("field bytes").to_vec();
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            data,
        });
    }
    fields
}

async fn handle_any(State(state): State<StubState>, multipart: Multipart) -> impl IntoResponse {
    let fields = collect_fields(multipart).await;
    state.requests.lock().await.push(fields);
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

async fn spawn_stub(state: StubState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/upload", post(handle_any))
        .route("/preview_headers", post(handle_any))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn unreachable_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

fn write_csv(dir: &tempfile::TempDir, contents: &str) -> SelectedFile {
    let path: PathBuf = dir.path().join("people.csv");
    std::fs::write(&path, contents).expect("write csv");
    SelectedFile::from_path(path)
}

fn endpoints(base: &str) -> Endpoints {
    Endpoints::new(base, "/upload", "/preview_headers").expect("endpoints")
}

fn payload(base: &str, file: SelectedFile, sensitive_columns: &str) -> SubmitPayload {
    SubmitPayload {
        action: endpoints(base).upload,
        file,
        sensitive_columns: sensitive_columns.to_string(),
        params: AnonymizationParams::default(),
    }
}

fn field<'a>(fields: &'a [ReceivedField], name: &str) -> &'a ReceivedField {
    fields
        .iter()
        .find(|field| field.name == name)
        .unwrap_or_else(|| panic!("missing field {name}"))
}

#[test]
fn endpoints_join_paths_onto_server_url() {
    let endpoints = Endpoints::new("http://localhost:5000/app/", "/upload", "preview_headers")
        .expect("endpoints");
    assert_eq!(endpoints.upload.as_str(), "http://localhost:5000/upload");
    assert_eq!(
        endpoints.preview.as_str(),
        "http://localhost:5000/app/preview_headers"
    );
}

#[test]
fn endpoints_reject_unparsable_server_url() {
    let err = Endpoints::new("not a url", "/upload", "/preview_headers").expect_err("invalid");
    assert!(matches!(err, EndpointError::InvalidServerUrl { .. }));
    assert!(err.to_string().contains("not a url"));
}

#[test]
fn bad_part_mime_type_is_a_request_error_not_transport() {
    let err = upload_part(b"id\n".to_vec(), "people.csv", "not a mime")
        .map(|_| ())
        .expect_err("invalid mime");
    assert_eq!(err.kind(), shared::error::ErrorKind::InvalidRequest);
    assert!(upload_part(Vec::new(), "people.csv", CSV_MIME_TYPE).is_ok());
}

#[tokio::test]
async fn submit_sends_file_and_form_fields() {
    let state = StubState::replying(HttpStatus::OK, b"id,email\n1,***\n".to_vec());
    let base = spawn_stub(state.clone()).await;
    let dir = tempfile::tempdir().expect("dir");
    let file = write_csv(&dir, "id,email\n1,a@b.c\n");
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let blob = client
        .submit(payload(&base, file, "id, email"))
        .await
        .expect("submit");

    assert_eq!(blob, b"id,email\n1,***\n");
    let requests = state.requests.lock().await;
    assert_eq!(requests.len(), 1);
    let fields = &requests[0];

    let file_field = field(fields, "file");
    assert_eq!(file_field.file_name.as_deref(), Some("people.csv"));
    assert_eq!(file_field.content_type.as_deref(), Some("text/csv"));
    assert_eq!(file_field.data, b"id,email\n1,a@b.c\n");

    assert_eq!(field(fields, "sensitive_columns").data, b"id, email");
    assert_eq!(field(fields, "k_value").data, b"5");
    assert_eq!(field(fields, "m_value").data, b"2");
    assert_eq!(field(fields, "t_value").data, b"0.2");
}

#[tokio::test]
async fn submit_failure_status_is_server_rejection_with_detail() {
    let state = StubState::replying(
        HttpStatus::BAD_REQUEST,
        r#"{"error": "The following sensitive columns were not found in the uploaded file: ['zip']"}"#,
    );
    let base = spawn_stub(state).await;
    let dir = tempfile::tempdir().expect("dir");
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let err = client
        .submit(payload(&base, write_csv(&dir, "id\n1\n"), "zip"))
        .await
        .expect_err("should be rejected");

    match err {
        ClientError::ServerRejected { status, detail } => {
            assert_eq!(status, 400);
            assert!(detail.expect("detail").contains("['zip']"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn submit_failure_with_empty_body_has_no_detail() {
    let state = StubState::replying(HttpStatus::INTERNAL_SERVER_ERROR, Vec::new());
    let base = spawn_stub(state).await;
    let dir = tempfile::tempdir().expect("dir");
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let err = client
        .submit(payload(&base, write_csv(&dir, "id\n1\n"), ""))
        .await
        .expect_err("should be rejected");

    assert!(matches!(
        err,
        ClientError::ServerRejected {
            status: 500,
            detail: None
        }
    ));
}

#[tokio::test]
async fn submit_to_unreachable_server_is_transport_failure() {
    let base = unreachable_base().await;
    let dir = tempfile::tempdir().expect("dir");
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let err = client
        .submit(payload(&base, write_csv(&dir, "id\n1\n"), ""))
        .await
        .expect_err("should fail");

    assert!(matches!(err, ClientError::TransportFailure { .. }));
}

#[tokio::test]
async fn unreadable_file_fails_before_any_request() {
    let state = StubState::replying(HttpStatus::OK, r#"{"columns": []}"#);
    let base = spawn_stub(state.clone()).await;
    let dir = tempfile::tempdir().expect("dir");
    let missing = SelectedFile::from_path(dir.path().join("gone.csv"));
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let err = client
        .preview_headers(&missing)
        .await
        .expect_err("should fail");

    assert!(matches!(err, ClientError::FileRead { .. }));
    assert!(state.requests.lock().await.is_empty());
}

#[tokio::test]
async fn preview_sends_only_the_file() {
    let state = StubState::replying(HttpStatus::OK, r#"{"columns": ["id", "name", "email"]}"#);
    let base = spawn_stub(state.clone()).await;
    let dir = tempfile::tempdir().expect("dir");
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let columns = client
        .preview_headers(&write_csv(&dir, "id,name,email\n"))
        .await
        .expect("preview");

    assert_eq!(columns, vec!["id", "name", "email"]);
    let requests = state.requests.lock().await;
    let names: Vec<_> = requests[0].iter().map(|field| field.name.as_str()).collect();
    assert_eq!(names, vec!["file"]);
}

#[tokio::test]
async fn preview_error_field_is_semantic_error() {
    let state = StubState::replying(HttpStatus::OK, r#"{"error": "bad file"}"#);
    let base = spawn_stub(state).await;
    let dir = tempfile::tempdir().expect("dir");
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let err = client
        .preview_headers(&write_csv(&dir, "garbage"))
        .await
        .expect_err("should fail");

    match err {
        ClientError::SemanticError { message } => assert_eq!(message, "bad file"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn preview_error_field_wins_over_failure_status() {
    let state = StubState::replying(HttpStatus::BAD_REQUEST, r#"{"error": "Empty filename"}"#);
    let base = spawn_stub(state).await;
    let dir = tempfile::tempdir().expect("dir");
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let err = client
        .preview_headers(&write_csv(&dir, "id\n"))
        .await
        .expect_err("should fail");

    assert_eq!(err.kind(), shared::error::ErrorKind::SemanticError);
    assert_eq!(err.user_message(), "Empty filename");
}

#[tokio::test]
async fn preview_non_json_body_is_malformed() {
    let state = StubState::replying(HttpStatus::OK, "<html>oops</html>");
    let base = spawn_stub(state).await;
    let dir = tempfile::tempdir().expect("dir");
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let err = client
        .preview_headers(&write_csv(&dir, "id\n"))
        .await
        .expect_err("should fail");

    assert!(matches!(err, ClientError::MalformedResponse { .. }));
}

#[tokio::test]
async fn preview_body_without_either_field_is_malformed() {
    let state = StubState::replying(HttpStatus::OK, "{}");
    let base = spawn_stub(state).await;
    let dir = tempfile::tempdir().expect("dir");
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let err = client
        .preview_headers(&write_csv(&dir, "id\n"))
        .await
        .expect_err("should fail");

    assert!(matches!(err, ClientError::MalformedResponse { .. }));
}

#[tokio::test]
async fn preview_failure_status_without_error_body_is_server_rejection() {
    let state = StubState::replying(HttpStatus::BAD_GATEWAY, "upstream down");
    let base = spawn_stub(state).await;
    let dir = tempfile::tempdir().expect("dir");
    let client = AnonymizerClient::new(endpoints(&base).preview);

    let err = client
        .preview_headers(&write_csv(&dir, "id\n"))
        .await
        .expect_err("should fail");

    match err {
        ClientError::ServerRejected { status, detail } => {
            assert_eq!(status, 502);
            assert_eq!(detail.as_deref(), Some("upstream down"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use pipeline::{
    ArchiveArtifact, PreviewHost, RepositoryName, RepositoryOwner, Secret, TriggerContext,
    TriggerNumber, UploadError,
};
use pushpreview::PushPreviewClient;

#[derive(Debug, Default)]
struct ReceivedUpload {
    authorization: Option<String>,
    fields: HashMap<String, String>,
    file_name: Option<String>,
    file_content_type: Option<String>,
    file_bytes: Vec<u8>,
}

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: serde_json::Value,
    received: Arc<Mutex<Option<ReceivedUpload>>>,
}

async fn receive(
    State(state): State<ServerState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut upload = ReceivedUpload {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ..Default::default()
    };
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            upload.file_name = field.file_name().map(str::to_string);
            upload.file_content_type = field.content_type().map(str::to_string);
            upload.file_bytes = field.bytes().await.unwrap().to_vec();
        } else {
            upload.fields.insert(name, field.text().await.unwrap());
        }
    }
    *state.received.lock().unwrap() = Some(upload);
    (state.status, Json(state.body))
}

async fn start_server(
    status: StatusCode,
    body: serde_json::Value,
) -> (String, Arc<Mutex<Option<ReceivedUpload>>>) {
    let received = Arc::new(Mutex::new(None));
    let state = ServerState {
        status,
        body,
        received: received.clone(),
    };
    let app = Router::new()
        .route("/api/previews/", post(receive))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api/previews/"), received)
}

fn context() -> TriggerContext {
    TriggerContext::new(
        RepositoryOwner::new("acme").unwrap(),
        RepositoryName::new("docs").unwrap(),
        TriggerNumber::new(42).unwrap(),
    )
}

fn artifact(dir: &tempfile::TempDir) -> ArchiveArtifact {
    let path = dir.path().join("file.zip");
    std::fs::write(&path, b"PK\x03\x04fake").unwrap();
    ArchiveArtifact::new(path, 1, 8)
}

#[tokio::test]
async fn upload_sends_identifiers_and_archive() {
    let (endpoint, received) = start_server(
        StatusCode::CREATED,
        serde_json::json!({ "previewUrl": "https://x.example/p/1" }),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let client = PushPreviewClient::with_endpoint(Secret::new("key-123").unwrap(), endpoint);

    let url = client.upload(&artifact(&dir), &context()).await.unwrap();

    assert_eq!(url.as_str(), "https://x.example/p/1");
    let upload = received.lock().unwrap().take().unwrap();
    assert_eq!(upload.authorization.as_deref(), Some("Api-Key key-123"));
    assert_eq!(upload.fields["pr_identifier"], "42");
    assert_eq!(upload.fields["organization"], "acme");
    assert_eq!(upload.fields["repository_name"], "docs");
    assert_eq!(upload.fields["origin_source"], "GitHub");
    assert_eq!(upload.file_name.as_deref(), Some("file.zip"));
    assert_eq!(upload.file_content_type.as_deref(), Some("application/zip"));
    assert_eq!(upload.file_bytes, b"PK\x03\x04fake");
}

#[tokio::test]
async fn non_success_status_is_a_rejection() {
    let (endpoint, _) = start_server(
        StatusCode::PAYLOAD_TOO_LARGE,
        serde_json::json!({ "detail": "too big" }),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let client = PushPreviewClient::with_endpoint(Secret::new("key").unwrap(), endpoint);

    let err = client.upload(&artifact(&dir), &context()).await.unwrap_err();

    assert_eq!(err.status(), Some(413));
    match err {
        UploadError::Rejected { body, .. } => assert!(body.contains("too big")),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn success_without_preview_url_is_an_error() {
    let (endpoint, _) = start_server(StatusCode::OK, serde_json::json!({ "id": 7 })).await;
    let dir = tempfile::tempdir().unwrap();
    let client = PushPreviewClient::with_endpoint(Secret::new("key").unwrap(), endpoint);

    let err = client.upload(&artifact(&dir), &context()).await.unwrap_err();

    assert!(matches!(err, UploadError::MissingPreviewUrl), "{err:?}");
}

#[tokio::test]
async fn empty_preview_url_is_an_error() {
    let (endpoint, _) =
        start_server(StatusCode::OK, serde_json::json!({ "previewUrl": "" })).await;
    let dir = tempfile::tempdir().unwrap();
    let client = PushPreviewClient::with_endpoint(Secret::new("key").unwrap(), endpoint);

    let err = client.upload(&artifact(&dir), &context()).await.unwrap_err();

    assert!(matches!(err, UploadError::MissingPreviewUrl), "{err:?}");
}

#[tokio::test]
async fn missing_archive_is_reported_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let client =
        PushPreviewClient::with_endpoint(Secret::new("key").unwrap(), "http://127.0.0.1:9/");
    let missing = ArchiveArtifact::new(dir.path().join("absent.zip"), 0, 0);

    let err = client.upload(&missing, &context()).await.unwrap_err();

    assert!(matches!(err, UploadError::ArchiveUnreadable { .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let dir = tempfile::tempdir().unwrap();
    let client = PushPreviewClient::with_endpoint(
        Secret::new("key").unwrap(),
        format!("http://{addr}/api/previews/"),
    );

    let err = client.upload(&artifact(&dir), &context()).await.unwrap_err();

    match &err {
        UploadError::Transport { message } => assert!(message.contains("): "), "{message}"),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(err.status(), None);
}

#[test]
fn default_client_targets_production() {
    let client = PushPreviewClient::new(Secret::new("key").unwrap());
    assert_eq!(client.endpoint(), "https://app.pushpreview.com/api/previews/");
}

//! HTTP-level tests for the highlight client against mock endpoints.

use std::time::Duration;

use hlgen_client::{ClientConfig, ClientError, HighlightClient, ProcessCredentials, ResolveError};
use hlgen_models::{DownloadOutcome, ProcessResult, VideoFile, BLOB_URL_PREFIX};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HighlightClient {
    let config = ClientConfig::default()
        .with_endpoints(
            format!("{}/process", server.uri()),
            format!("{}/generate", server.uri()),
        )
        .with_timeout(Duration::from_secs(5));
    HighlightClient::new(config).expect("client")
}

fn sample_video() -> VideoFile {
    VideoFile::new("talk.mp4", "video/mp4", b"fake mp4 payload".to_vec())
}

fn sample_result() -> ProcessResult {
    ProcessResult::new("sheet-1", "https://docs.example.com/sheet-1")
}

#[tokio::test]
async fn test_process_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process"))
        .and(body_string_contains("name=\"video\""))
        .and(body_string_contains("filename=\"talk.mp4\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Workflow was started",
            "spreadsheetId": "sheet-1",
            "spreadsheetUrl": "https://docs.example.com/sheet-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = assert_ok!(client_for(&server).process(&sample_video()).await);
    assert_eq!(result, sample_result());
}

#[tokio::test]
async fn test_process_forwards_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process"))
        .and(body_string_contains("name=\"heygenApiKey\""))
        .and(body_string_contains("key-123"))
        .and(body_string_contains("name=\"avatarId\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": "sheet-1",
            "spreadsheetUrl": "https://docs.example.com/sheet-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = client_for(&server).config().clone().with_credentials(ProcessCredentials {
        api_key: Some("key-123".into()),
        avatar_id: Some("avatar-9".into()),
    });
    let client = HighlightClient::new(config).unwrap();

    assert!(client.process(&sample_video()).await.is_ok());
}

#[tokio::test]
async fn test_process_failure_uses_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process"))
        .respond_with(ResponseTemplate::new(500).set_body_string("workflow crashed"))
        .mount(&server)
        .await;

    let err = client_for(&server).process(&sample_video()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Failed to process video: workflow crashed");
}

#[tokio::test]
async fn test_process_failure_falls_back_to_status_phrase() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).process(&sample_video()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to process video: Not Found");
}

#[tokio::test]
async fn test_process_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/process"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).process(&sample_video()).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_generate_sends_spreadsheet_reference() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "spreadsheetId": "sheet-1",
            "spreadsheetUrl": "https://docs.example.com/sheet-1"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"downloadUrl": "https://bucket.s3.amazonaws.com/out.mp4"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = assert_ok!(client_for(&server).generate(&sample_result()).await);
    assert_eq!(
        outcome,
        DownloadOutcome::remote("https://bucket.s3.amazonaws.com/out.mp4")
    );
}

#[tokio::test]
async fn test_generate_binary_video() {
    let server = MockServer::start().await;
    let payload = vec![0u8, 0, 0, 0x20, b'f', b't', b'y', b'p', b'i', b's', b'o', b'm'];
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(payload.clone(), "video/mp4"))
        .mount(&server)
        .await;

    let outcome = assert_ok!(client_for(&server).generate(&sample_result()).await);
    assert!(outcome.url().starts_with(BLOB_URL_PREFIX));
    match outcome {
        DownloadOutcome::LocalBlob(blob) => {
            assert_eq!(blob.data().as_ref(), payload.as_slice());
            assert_eq!(blob.media_type(), "video/mp4");
        }
        other => panic!("expected local blob, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_json_without_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let err = client_for(&server).generate(&sample_result()).await.unwrap_err();
    assert!(matches!(err, ClientError::Resolve(ResolveError::MissingUrlField)));
    assert_eq!(err.to_string(), "No video URL found in response");
}

#[tokio::test]
async fn test_generate_empty_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client_for(&server).generate(&sample_result()).await.unwrap_err();
    assert!(matches!(err, ClientError::Resolve(ResolveError::EmptyBody)));
}

#[tokio::test]
async fn test_generate_server_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("render farm offline"))
        .mount(&server)
        .await;

    let err = client_for(&server).generate(&sample_result()).await.unwrap_err();
    assert_eq!(err.to_string(), "Server error: 502 - render farm offline");
    assert!(err.is_retryable());
}

/// Base URL of a local port with nothing listening on it.
fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_network_failure() {
    let base = closed_port_uri();
    let config = ClientConfig::default()
        .with_endpoints(format!("{}/process", base), format!("{}/generate", base))
        .with_timeout(Duration::from_secs(5));
    let client = HighlightClient::new(config).expect("client");

    let err = client.generate(&sample_result()).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "got {:?}", err);
    assert!(err.is_retryable());

    let err = client.process(&sample_video()).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "got {:?}", err);
}

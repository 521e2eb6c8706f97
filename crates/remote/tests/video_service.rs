//! Integration tests for [`VideoServiceClient`] against a mocked HTTP API.
//!
//! Verifies request shape, poll status interpretation, error
//! classification, and authorized artifact download.

use std::sync::Arc;

use assert_matches::assert_matches;
use promo_core::error::{RemoteError, RetrievalError};
use promo_core::service::GenerationService;
use promo_core::types::{ArtifactLocator, GenerationRequest, JobHandle, JobStatus, MediaConfig};
use promo_remote::{RemoteConfig, StaticKey, VideoServiceClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "veo-test";
const OPERATION: &str = "models/veo-test/operations/op-1";

fn client_for(server: &MockServer, key: &str) -> VideoServiceClient {
    let config = RemoteConfig {
        api_url: server.uri(),
        model: MODEL.to_string(),
        request_timeout_secs: 5,
    };
    VideoServiceClient::new(&config, Arc::new(StaticKey(key.to_string())))
        .expect("client should build")
}

fn request() -> GenerationRequest {
    GenerationRequest::new("Velvet Evening Top", MediaConfig::default())
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_sends_prompt_and_returns_operation_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/models/{MODEL}:predictLongRunning")))
        .and(header("x-goog-api-key", "secret"))
        .and(body_partial_json(serde_json::json!({
            "parameters": {"aspectRatio": "9:16", "resolution": "720p", "numberOfVideos": 1}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": OPERATION
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "secret");
    let handle = client.submit(&request()).await.expect("submit should succeed");

    assert_eq!(handle, JobHandle::new(OPERATION));
}

#[tokio::test]
async fn submit_rejection_is_classified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, "bad");
    let err = client.submit(&request()).await.unwrap_err();

    assert_matches!(err, RemoteError::CredentialInvalid(m) if m == "API key not valid.");
}

#[tokio::test]
async fn submit_without_key_never_calls_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let err = client.submit(&request()).await.unwrap_err();

    assert_matches!(err, RemoteError::CredentialInvalid(_));
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_reports_pending_then_done() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{OPERATION}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": OPERATION,
            "done": false
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/{OPERATION}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": OPERATION,
            "done": true,
            "response": {"generateVideoResponse": {"generatedSamples": [
                {"video": {"uri": "https://example/video.mp4"}}
            ]}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, "secret");
    let handle = JobHandle::new(OPERATION);

    assert_eq!(client.status(&handle).await.unwrap(), JobStatus::Pending);
    assert_matches!(client.status(&handle).await.unwrap(), JobStatus::Done(d) => {
        assert_eq!(d.first(), Some(&ArtifactLocator::new("https://example/video.mp4")));
    });
}

#[tokio::test]
async fn unknown_operation_is_credential_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, "stale");
    let err = client.status(&JobHandle::new(OPERATION)).await.unwrap_err();

    assert_matches!(err, RemoteError::CredentialInvalid(_));
}

#[tokio::test]
async fn server_errors_are_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server, "secret");
    let err = client.status(&JobHandle::new(OPERATION)).await.unwrap_err();

    assert_matches!(err, RemoteError::Transient(_));
}

#[tokio::test]
async fn malformed_status_body_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&server)
        .await;

    let client = client_for(&server, "secret");
    let err = client.status(&JobHandle::new(OPERATION)).await.unwrap_err();

    assert_matches!(err, RemoteError::Fatal(_));
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn download_sends_key_and_returns_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/video.mp4"))
        .and(header("x-goog-api-key", "secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/mp4")
                .set_body_bytes(vec![0u8, 1, 2, 3]),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, "secret");
    let locator = ArtifactLocator::new(format!("{}/files/video.mp4", server.uri()));
    let fetched = client.fetch_artifact(&locator).await.expect("download should succeed");

    assert_eq!(fetched.data, vec![0u8, 1, 2, 3]);
    assert_eq!(fetched.content_type.as_deref(), Some("video/mp4"));
}

#[tokio::test]
async fn download_failure_keeps_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(410).set_body_string("gone"))
        .mount(&server)
        .await;

    let client = client_for(&server, "secret");
    let locator = ArtifactLocator::new(format!("{}/files/video.mp4", server.uri()));
    let err = client.fetch_artifact(&locator).await.unwrap_err();

    assert_matches!(err, RetrievalError::Status { status: 410, body } if body == "gone");
}

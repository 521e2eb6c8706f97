//! Wire types for the long-running video generation API.
//!
//! Submission returns an operation resource `{"name": "..."}`. Polling
//! that name returns the same resource with `done`, and either `error`
//! or `response` once finished. This module deserializes those payloads
//! and turns them into [`JobStatus`] / [`RemoteError`] values, deciding
//! the error class from the structured status fields only.

use promo_core::error::RemoteError;
use promo_core::types::{ArtifactLocator, GenerationRequest, JobStatus, ResultDescriptor};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Body of `POST /models/{model}:predictLongRunning`.
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub instances: Vec<PromptInstance>,
    pub parameters: PredictParameters<'a>,
}

#[derive(Debug, Serialize)]
pub struct PromptInstance {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters<'a> {
    pub aspect_ratio: &'a str,
    pub resolution: &'a str,
    pub number_of_videos: u32,
}

impl<'a> PredictRequest<'a> {
    pub fn from_request(request: &'a GenerationRequest) -> Self {
        let media = request.media();
        Self {
            instances: vec![PromptInstance {
                prompt: request.prompt(),
            }],
            parameters: PredictParameters {
                aspect_ratio: media.aspect_ratio.as_str(),
                resolution: media.resolution.as_str(),
                number_of_videos: media.count,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Operation resource
// ---------------------------------------------------------------------------

/// A long-running operation as returned by submission and polling.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    /// Server-assigned operation name, used as the job handle.
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<Status>,
    #[serde(default)]
    pub response: Option<OperationResponse>,
}

/// Structured error status, shared by failed operations and HTTP error bodies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    /// Canonical status name, e.g. `NOT_FOUND`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Envelope of an HTTP error body: `{"error": {...}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Status,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSample {
    #[serde(default)]
    pub video: Option<VideoRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoRef {
    #[serde(default)]
    pub uri: Option<String>,
}

impl Operation {
    /// Locators of every generated sample that carries a URI.
    pub fn locators(&self) -> Vec<ArtifactLocator> {
        self.response
            .as_ref()
            .and_then(|r| r.generate_video_response.as_ref())
            .map(|r| {
                r.generated_samples
                    .iter()
                    .filter_map(|s| s.video.as_ref()?.uri.as_deref())
                    .filter(|uri| !uri.is_empty())
                    .map(ArtifactLocator::new)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Interpret the operation as a poll result.
    pub fn into_status(self) -> JobStatus {
        if !self.done {
            return JobStatus::Pending;
        }
        if let Some(ref status) = self.error {
            return JobStatus::Failed(classify_operation_error(status));
        }
        JobStatus::Done(ResultDescriptor::new(self.locators()))
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Canonical status names that mean the job or credential is not recognised.
const CREDENTIAL_STATUSES: &[&str] = &["NOT_FOUND", "UNAUTHENTICATED", "PERMISSION_DENIED"];

/// Canonical status names worth retrying later.
const TRANSIENT_STATUSES: &[&str] = &[
    "UNAVAILABLE",
    "DEADLINE_EXCEEDED",
    "RESOURCE_EXHAUSTED",
    "INTERNAL",
    "ABORTED",
];

/// Classify the `error` of a finished operation.
///
/// Uses the canonical status name when present, otherwise the numeric
/// canonical code (5 = NOT_FOUND, 16 = UNAUTHENTICATED, 7 =
/// PERMISSION_DENIED, 14 = UNAVAILABLE, 4 = DEADLINE_EXCEEDED,
/// 8 = RESOURCE_EXHAUSTED, 13 = INTERNAL, 10 = ABORTED).
pub fn classify_operation_error(status: &Status) -> RemoteError {
    let message = status.message.clone();
    match status.status.as_deref() {
        Some(name) if CREDENTIAL_STATUSES.contains(&name) => RemoteError::CredentialInvalid(message),
        Some(name) if TRANSIENT_STATUSES.contains(&name) => RemoteError::Transient(message),
        Some(_) => RemoteError::Fatal(message),
        None => match status.code {
            5 | 7 | 16 => RemoteError::CredentialInvalid(message),
            4 | 8 | 10 | 13 | 14 => RemoteError::Transient(message),
            _ => RemoteError::Fatal(message),
        },
    }
}

/// Classify a non-2xx HTTP response from the submission or status endpoint.
///
/// The body is only used for its human-readable message.
pub fn classify_http_error(status: u16, body: &str) -> RemoteError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}: {body}"));

    match status {
        401 | 403 | 404 => RemoteError::CredentialInvalid(message),
        408 | 429 => RemoteError::Transient(message),
        s if s >= 500 => RemoteError::Transient(message),
        _ => RemoteError::Fatal(message),
    }
}

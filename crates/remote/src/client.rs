//! [`GenerationService`] implementation over the REST API.

use std::sync::Arc;

use async_trait::async_trait;
use promo_core::error::{RemoteError, RetrievalError};
use promo_core::service::{FetchedArtifact, GenerationService};
use promo_core::types::{ArtifactLocator, GenerationRequest, JobHandle, JobStatus};

use crate::api::{ApiError, VideoApi};
use crate::config::RemoteConfig;
use crate::key::ApiKeySource;
use crate::messages::{classify_http_error, PredictRequest};

const MSG_NO_KEY: &str = "No API key selected";

/// Remote generation service backed by [`VideoApi`].
///
/// The API key is read from the [`ApiKeySource`] on every call.
pub struct VideoServiceClient {
    api: VideoApi,
    keys: Arc<dyn ApiKeySource>,
}

impl VideoServiceClient {
    pub fn new(config: &RemoteConfig, keys: Arc<dyn ApiKeySource>) -> Result<Self, ApiError> {
        Ok(Self {
            api: VideoApi::new(config)?,
            keys,
        })
    }

    pub fn with_api(api: VideoApi, keys: Arc<dyn ApiKeySource>) -> Self {
        Self { api, keys }
    }

    fn key(&self) -> Option<String> {
        self.keys.api_key().filter(|k| !k.trim().is_empty())
    }
}

/// Map a REST error from the submission or status endpoint.
fn remote_error(err: ApiError) -> RemoteError {
    match err {
        ApiError::Status { status, body } => classify_http_error(status, &body),
        ApiError::Request(e) if e.is_decode() => {
            RemoteError::Fatal(format!("Malformed response from service: {e}"))
        }
        ApiError::Request(e) => RemoteError::Transient(e.to_string()),
    }
}

fn retrieval_error(err: ApiError) -> RetrievalError {
    match err {
        ApiError::Status { status, body } => RetrievalError::Status { status, body },
        ApiError::Request(e) => RetrievalError::Request(e.to_string()),
    }
}

#[async_trait]
impl GenerationService for VideoServiceClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, RemoteError> {
        let key = self
            .key()
            .ok_or_else(|| RemoteError::CredentialInvalid(MSG_NO_KEY.to_string()))?;

        let body = PredictRequest::from_request(request);
        let operation = self.api.submit(&key, &body).await.map_err(remote_error)?;

        tracing::info!(
            model = %self.api.model(),
            operation = %operation.name,
            "Generation job submitted",
        );

        Ok(JobHandle::new(operation.name))
    }

    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, RemoteError> {
        let key = self
            .key()
            .ok_or_else(|| RemoteError::CredentialInvalid(MSG_NO_KEY.to_string()))?;

        let operation = self
            .api
            .get_operation(&key, handle.as_str())
            .await
            .map_err(remote_error)?;

        tracing::debug!(operation = %operation.name, done = operation.done, "Operation polled");

        Ok(operation.into_status())
    }

    async fn fetch_artifact(
        &self,
        locator: &ArtifactLocator,
    ) -> Result<FetchedArtifact, RetrievalError> {
        let key = self
            .key()
            .ok_or_else(|| RetrievalError::Request(MSG_NO_KEY.to_string()))?;

        let (content_type, data) = self
            .api
            .download(&key, locator.as_str())
            .await
            .map_err(retrieval_error)?;

        tracing::info!(
            locator = %locator,
            bytes = data.len(),
            content_type = content_type.as_deref().unwrap_or("unknown"),
            "Artifact downloaded",
        );

        Ok(FetchedArtifact { content_type, data })
    }
}

//! REST wrapper for the video generation HTTP endpoints.
//!
//! Wraps job submission, operation polling, and authorized artifact
//! download using [`reqwest`]. Errors are returned raw as [`ApiError`];
//! classification happens one layer up in [`crate::client`].

use crate::config::RemoteConfig;
use crate::messages::{Operation, PredictRequest};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for the generation API.
pub struct VideoApi {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

/// Errors from the REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging and classification.
        body: String,
    },
}

impl VideoApi {
    /// Create a client from configuration, building a [`reqwest::Client`]
    /// with the configured request timeout.
    pub fn new(config: &RemoteConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &RemoteConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Queue a generation job.
    ///
    /// Sends `POST /models/{model}:predictLongRunning` and returns the
    /// freshly created operation resource.
    pub async fn submit(
        &self,
        api_key: &str,
        body: &PredictRequest<'_>,
    ) -> Result<Operation, ApiError> {
        let response = self
            .client
            .post(format!("{}/models/{}:predictLongRunning", self.api_url, self.model))
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current state of an operation.
    ///
    /// Sends `GET /{operation_name}`.
    pub async fn get_operation(
        &self,
        api_key: &str,
        operation_name: &str,
    ) -> Result<Operation, ApiError> {
        let response = self
            .client
            .get(format!(
                "{}/{}",
                self.api_url,
                operation_name.trim_start_matches('/')
            ))
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Download an artifact from its authorized URI.
    ///
    /// Returns the `Content-Type` header (if any) and the full body.
    pub async fn download(
        &self,
        api_key: &str,
        uri: &str,
    ) -> Result<(Option<String>, Vec<u8>), ApiError> {
        let response = self
            .client
            .get(uri)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        Ok((content_type, bytes.to_vec()))
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

//! Job submission.
//!
//! Validates the request locally, then sends it once. There is no retry at
//! this layer: a rejection is surfaced immediately.

use std::sync::Arc;

use promo_core::error::SubmissionError;
use promo_core::service::GenerationService;
use promo_core::types::{GenerationRequest, JobHandle};

pub struct SubmissionClient {
    service: Arc<dyn GenerationService>,
}

impl SubmissionClient {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Submit a generation request and return the job handle.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, SubmissionError> {
        request.validate()?;

        let media = request.media();
        tracing::info!(
            subject = %request.subject(),
            resolution = %media.resolution,
            aspect_ratio = %media.aspect_ratio,
            count = media.count,
            "Submitting generation request",
        );

        let handle = self
            .service
            .submit(request)
            .await
            .map_err(SubmissionError::Rejected)?;

        tracing::info!(handle = %handle, "Generation request accepted");
        Ok(handle)
    }
}

//! Artifact download after a successful job.
//!
//! Fetches the first locator of the result with the current authorization
//! and keeps the bytes in memory as a [`LocalArtifact`]. Not retried: a
//! failure here ends the run.

use std::sync::Arc;

use promo_core::error::RetrievalError;
use promo_core::service::GenerationService;
use promo_core::types::{LocalArtifact, ResultDescriptor};

pub struct ArtifactRetriever {
    service: Arc<dyn GenerationService>,
}

impl ArtifactRetriever {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    pub async fn retrieve(
        &self,
        descriptor: &ResultDescriptor,
    ) -> Result<LocalArtifact, RetrievalError> {
        let locator = descriptor.first().ok_or(RetrievalError::NoLocator)?;
        if descriptor.locators.len() > 1 {
            tracing::debug!(
                available = descriptor.locators.len(),
                "Multiple artifacts produced, retrieving the first",
            );
        }

        let fetched = self.service.fetch_artifact(locator).await?;
        if fetched.data.is_empty() {
            return Err(RetrievalError::EmptyPayload);
        }

        Ok(LocalArtifact::new(
            locator.clone(),
            fetched.content_type,
            fetched.data,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedService;
    use assert_matches::assert_matches;
    use promo_core::service::FetchedArtifact;
    use promo_core::types::ArtifactLocator;

    fn descriptor() -> ResultDescriptor {
        ResultDescriptor::new(vec![
            ArtifactLocator::new("https://example/video.mp4"),
            ArtifactLocator::new("https://example/other.mp4"),
        ])
    }

    #[tokio::test]
    async fn retrieves_first_locator() {
        let service = Arc::new(ScriptedService::new().with_fetch(Ok(FetchedArtifact {
            content_type: Some("video/mp4".into()),
            data: vec![7, 7, 7],
        })));
        let retriever = ArtifactRetriever::new(service.clone());

        let artifact = retriever.retrieve(&descriptor()).await.unwrap();
        assert_eq!(artifact.locator.as_str(), "https://example/video.mp4");
        assert_eq!(artifact.bytes(), &[7, 7, 7]);
        assert_eq!(artifact.content_type.as_deref(), Some("video/mp4"));
        assert_eq!(service.fetch_count(), 1);
    }

    #[tokio::test]
    async fn empty_payload_is_an_error() {
        let service = Arc::new(ScriptedService::new().with_fetch(Ok(FetchedArtifact {
            content_type: None,
            data: Vec::new(),
        })));
        let retriever = ArtifactRetriever::new(service);

        assert_matches!(
            retriever.retrieve(&descriptor()).await,
            Err(RetrievalError::EmptyPayload)
        );
    }

    #[tokio::test]
    async fn fetch_failure_is_not_retried() {
        let service = Arc::new(ScriptedService::new().with_fetch(Err(RetrievalError::Status {
            status: 500,
            body: "oops".into(),
        })));
        let retriever = ArtifactRetriever::new(service.clone());

        assert_matches!(
            retriever.retrieve(&descriptor()).await,
            Err(RetrievalError::Status { status: 500, .. })
        );
        assert_eq!(service.fetch_count(), 1);
    }

    #[tokio::test]
    async fn empty_descriptor_has_nothing_to_fetch() {
        let service = Arc::new(ScriptedService::new());
        let retriever = ArtifactRetriever::new(service.clone());

        assert_matches!(
            retriever.retrieve(&ResultDescriptor::default()).await,
            Err(RetrievalError::NoLocator)
        );
        assert_eq!(service.fetch_count(), 0);
    }
}

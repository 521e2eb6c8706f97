//! Traits for the collaborators the orchestrator drives but does not own.
//!
//! Both traits are object safe so the orchestrator can hold them as
//! `Arc<dyn ...>` and tests can substitute scripted implementations.

use async_trait::async_trait;

use crate::error::{RemoteError, RetrievalError};
use crate::types::{ArtifactLocator, GenerationRequest, JobHandle, JobStatus};

/// Outcome of an interactive credential acquisition flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionOutcome {
    /// The user finished the flow. The credential is not verified here.
    Completed,
    /// The user closed or abandoned the flow.
    Abandoned,
}

/// Source of the authorization the remote service requires.
///
/// The orchestrator never sees the credential value; it only asks whether
/// one is present and, if not, asks for one to be acquired.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Whether a credential is currently selected.
    async fn has_valid_credential(&self) -> bool;

    /// Run the interactive acquisition flow and wait for the user to finish
    /// or abandon it.
    async fn acquire_credential(&self) -> AcquisitionOutcome;
}

/// Bytes returned by an authorized artifact fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// The remote long-running generation service.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Queue a generation job and return its handle.
    async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, RemoteError>;

    /// Query the current status of a job.
    ///
    /// Transport failures are reported as `Err`; a job the service reports
    /// as failed is `Ok(JobStatus::Failed(..))`. The orchestrator treats
    /// both the same way.
    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, RemoteError>;

    /// Download one generated artifact with the current authorization.
    async fn fetch_artifact(
        &self,
        locator: &ArtifactLocator,
    ) -> Result<FetchedArtifact, RetrievalError>;
}

//! Externally visible orchestration lifecycle.
//!
//! [`OrchestrationState`] is the single value the UI layer observes. It only
//! changes through [`OrchestrationState::apply`], which enforces the
//! transition table:
//!
//! ```text
//! Idle | Completed | Error --Start--------------> ResolvingCredential
//! ResolvingCredential ----CredentialResolved---> Generating
//! Generating -------------Progress-------------> Generating
//! Generating -------------CredentialRejected---> ResolvingCredential
//! Generating -------------Succeeded------------> Completed
//! ResolvingCredential | Generating --Failed----> Error
//! ResolvingCredential | Generating --Cancelled-> Idle
//! ```

use serde::Serialize;

use crate::error::{CredentialUnavailable, RemoteError, RetrievalError, SubmissionError};
use crate::types::LocalArtifact;

/// Shown when a second credential rejection ends the run.
pub const MSG_CREDENTIAL_EXPIRED: &str = "API key expired or invalid. Please try again.";
/// Shown when the service finished without producing anything.
pub const MSG_NO_ARTIFACT: &str = "No video was generated.";
/// Fallback when the remote error carried no detail.
pub const MSG_GENERATION_FAILED: &str = "Something went wrong during generation.";

// ---------------------------------------------------------------------------
// Failure
// ---------------------------------------------------------------------------

/// Broad class of a terminal failure. Each class has a different recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No usable credential, or the service kept rejecting it.
    Authorization,
    /// The request was malformed or refused at submission time.
    Submission,
    /// The remote job failed or produced nothing.
    Generation,
    /// The job succeeded but the result could not be downloaded.
    Retrieval,
}

impl FailureKind {
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            FailureKind::Authorization => "Select a valid API key and try again.",
            FailureKind::Submission => "Check the request settings and try again.",
            FailureKind::Generation => "Generation failed. Try again later.",
            FailureKind::Retrieval => "The video could not be downloaded. Try again.",
        }
    }
}

/// Payload of the terminal `Error` state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    /// Set when the underlying cause was transient; a caller-side retry
    /// policy may start a fresh run.
    pub retryable: bool,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Terminal failure for a remote error observed while polling.
    pub fn from_remote(err: &RemoteError) -> Self {
        match err {
            RemoteError::CredentialInvalid(_) => {
                Failure::new(FailureKind::Authorization, MSG_CREDENTIAL_EXPIRED)
            }
            RemoteError::Transient(_) | RemoteError::Fatal(_) => {
                let detail = err.detail().trim();
                let message = if detail.is_empty() {
                    MSG_GENERATION_FAILED.to_string()
                } else {
                    detail.to_string()
                };
                Failure::new(FailureKind::Generation, message).retryable(err.is_transient())
            }
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<CredentialUnavailable> for Failure {
    fn from(err: CredentialUnavailable) -> Self {
        Failure::new(FailureKind::Authorization, err.to_string())
    }
}

impl From<SubmissionError> for Failure {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Invalid(_) => Failure::new(FailureKind::Submission, err.to_string()),
            SubmissionError::Rejected(RemoteError::CredentialInvalid(_)) => {
                Failure::new(FailureKind::Authorization, MSG_CREDENTIAL_EXPIRED)
            }
            SubmissionError::Rejected(ref remote) => {
                let retryable = remote.is_transient();
                Failure::new(FailureKind::Submission, err.to_string()).retryable(retryable)
            }
        }
    }
}

impl From<RetrievalError> for Failure {
    fn from(err: RetrievalError) -> Self {
        let retryable = matches!(&err, RetrievalError::Request(_))
            || matches!(&err, RetrievalError::Status { status, .. } if *status >= 500);
        Failure::new(FailureKind::Retrieval, err.to_string()).retryable(retryable)
    }
}

// ---------------------------------------------------------------------------
// OrchestrationState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OrchestrationState {
    #[default]
    Idle,
    ResolvingCredential,
    Generating { message: String },
    Completed { artifact: LocalArtifact },
    Error { failure: Failure },
}

/// An event that moves the lifecycle forward.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Start,
    CredentialResolved { message: String },
    Progress { message: String },
    CredentialRejected,
    Succeeded(LocalArtifact),
    Failed(Failure),
    Cancelled,
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Start => "start",
            Transition::CredentialResolved { .. } => "credential_resolved",
            Transition::Progress { .. } => "progress",
            Transition::CredentialRejected => "credential_rejected",
            Transition::Succeeded(_) => "succeeded",
            Transition::Failed(_) => "failed",
            Transition::Cancelled => "cancelled",
        }
    }
}

/// A transition that is not allowed from the current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid transition '{transition}' from state '{from}'")]
pub struct InvalidTransition {
    pub from: &'static str,
    pub transition: &'static str,
}

impl OrchestrationState {
    pub fn name(&self) -> &'static str {
        match self {
            OrchestrationState::Idle => "idle",
            OrchestrationState::ResolvingCredential => "resolving_credential",
            OrchestrationState::Generating { .. } => "generating",
            OrchestrationState::Completed { .. } => "completed",
            OrchestrationState::Error { .. } => "error",
        }
    }

    /// `Completed` or `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrchestrationState::Completed { .. } | OrchestrationState::Error { .. }
        )
    }

    /// A new run may only begin from `Idle` or a terminal state.
    pub fn can_start(&self) -> bool {
        matches!(self, OrchestrationState::Idle) || self.is_terminal()
    }

    /// A run is in progress.
    pub fn is_active(&self) -> bool {
        !self.can_start()
    }

    /// Compute the state that follows `transition`, or reject it.
    pub fn apply(&self, transition: Transition) -> Result<OrchestrationState, InvalidTransition> {
        use OrchestrationState as S;

        let next = match (self, transition) {
            (s, Transition::Start) if s.can_start() => S::ResolvingCredential,
            (S::ResolvingCredential, Transition::CredentialResolved { message }) => {
                S::Generating { message }
            }
            (S::Generating { .. }, Transition::Progress { message }) => S::Generating { message },
            (S::Generating { .. }, Transition::CredentialRejected) => S::ResolvingCredential,
            (S::Generating { .. }, Transition::Succeeded(artifact)) => S::Completed { artifact },
            (S::ResolvingCredential | S::Generating { .. }, Transition::Failed(failure)) => {
                S::Error { failure }
            }
            (S::ResolvingCredential | S::Generating { .. }, Transition::Cancelled) => S::Idle,
            (s, t) => {
                return Err(InvalidTransition {
                    from: s.name(),
                    transition: t.name(),
                })
            }
        };
        Ok(next)
    }
}

/// Failure reported by the remote service for a submission or status query.
///
/// The variant is decided by the service adapter from structured status
/// information; callers never inspect the message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The service no longer recognises the job or the caller's credential.
    #[error("Credential rejected: {0}")]
    CredentialInvalid(String),

    #[error("Transient remote failure: {0}")]
    Transient(String),

    #[error("Remote failure: {0}")]
    Fatal(String),
}

impl RemoteError {
    /// Human-readable detail without the classification prefix.
    pub fn detail(&self) -> &str {
        match self {
            RemoteError::CredentialInvalid(msg)
            | RemoteError::Transient(msg)
            | RemoteError::Fatal(msg) => msg,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::Transient(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// The request failed local validation and was never sent.
    #[error("Invalid request: {0}")]
    Invalid(String),

    /// The service refused the submission.
    #[error("Submission rejected: {0}")]
    Rejected(RemoteError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetrievalError {
    /// The descriptor held no locator to fetch.
    #[error("No artifact locator to download")]
    NoLocator,

    /// The fetch completed with a non-2xx status code.
    #[error("Download failed ({status}): {body}")]
    Status {
        status: u16,
        body: String,
    },

    /// The fetch succeeded but carried no bytes.
    #[error("Downloaded artifact is empty")]
    EmptyPayload,

    /// The request itself failed (network, DNS, TLS, etc.).
    #[error("Download request failed: {0}")]
    Request(String),
}

/// No credential could be obtained: the acquisition flow was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No credential available: {reason}")]
pub struct CredentialUnavailable {
    pub reason: String,
}

impl CredentialUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

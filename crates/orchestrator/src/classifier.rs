//! Routing of remote failures observed while polling.
//!
//! A credential rejection is recovered exactly once per run: the first one
//! sends the run back through credential resolution and a fresh
//! submission, any later one is terminal. Everything else is terminal.

use promo_core::error::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Re-resolve the credential, discard the handle, and submit again.
    RetryWithFreshCredential,
    /// End the run with an error.
    Terminal,
}

/// Per-run classifier. Create a new one for every run.
#[derive(Debug, Default)]
pub struct ErrorClassifier {
    credential_retry_used: bool,
}

impl ErrorClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&mut self, err: &RemoteError) -> Classification {
        match err {
            RemoteError::CredentialInvalid(_) if !self.credential_retry_used => {
                self.credential_retry_used = true;
                Classification::RetryWithFreshCredential
            }
            RemoteError::CredentialInvalid(_) => {
                tracing::warn!("Credential rejected again after refresh; giving up");
                Classification::Terminal
            }
            RemoteError::Transient(_) | RemoteError::Fatal(_) => Classification::Terminal,
        }
    }

    /// Whether the single credential retry has been spent.
    pub fn credential_retry_used(&self) -> bool {
        self.credential_retry_used
    }
}

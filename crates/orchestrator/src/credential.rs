//! Credential resolution before submission.
//!
//! [`CredentialResolver`] asks the external provider whether a credential
//! is selected and, if not, runs the interactive acquisition flow and
//! suspends until the user finishes or abandons it. The acquired
//! credential is not verified here; a bad one surfaces on the first
//! remote call.

use std::sync::Arc;

use promo_core::error::CredentialUnavailable;
use promo_core::service::{AcquisitionOutcome, CredentialProvider};

/// Why the resolver is being asked for a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveReason {
    /// First resolution of a run: reuse a selected credential if present.
    Initial,
    /// The service just rejected the current credential; the availability
    /// check would report the stale one, so acquisition runs directly.
    CredentialRejected,
}

pub struct CredentialResolver {
    provider: Arc<dyn CredentialProvider>,
}

impl CredentialResolver {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self { provider }
    }

    /// Make sure a credential is available, acquiring one if needed.
    pub async fn ensure_credential(
        &self,
        reason: ResolveReason,
    ) -> Result<(), CredentialUnavailable> {
        if reason == ResolveReason::Initial && self.provider.has_valid_credential().await {
            tracing::debug!("Credential already selected");
            return Ok(());
        }

        tracing::info!(?reason, "Requesting interactive credential acquisition");
        match self.provider.acquire_credential().await {
            AcquisitionOutcome::Completed => {
                tracing::info!("Credential acquisition completed");
                Ok(())
            }
            AcquisitionOutcome::Abandoned => {
                tracing::warn!("Credential acquisition abandoned");
                Err(CredentialUnavailable::new("credential selection was abandoned"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        present: bool,
        outcome: AcquisitionOutcome,
        checks: AtomicUsize,
        acquisitions: AtomicUsize,
    }

    impl FakeProvider {
        fn new(present: bool, outcome: AcquisitionOutcome) -> Arc<Self> {
            Arc::new(Self {
                present,
                outcome,
                checks: AtomicUsize::new(0),
                acquisitions: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl CredentialProvider for FakeProvider {
        async fn has_valid_credential(&self) -> bool {
            self.checks.fetch_add(1, Ordering::SeqCst);
            self.present
        }

        async fn acquire_credential(&self) -> AcquisitionOutcome {
            self.acquisitions.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }
    }

    #[tokio::test]
    async fn present_credential_skips_acquisition() {
        let provider = FakeProvider::new(true, AcquisitionOutcome::Completed);
        let resolver = CredentialResolver::new(provider.clone());

        assert!(resolver.ensure_credential(ResolveReason::Initial).await.is_ok());
        assert_eq!(provider.checks.load(Ordering::SeqCst), 1);
        assert_eq!(provider.acquisitions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_credential_is_acquired() {
        let provider = FakeProvider::new(false, AcquisitionOutcome::Completed);
        let resolver = CredentialResolver::new(provider.clone());

        assert!(resolver.ensure_credential(ResolveReason::Initial).await.is_ok());
        assert_eq!(provider.acquisitions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn abandoned_acquisition_is_unavailable() {
        let provider = FakeProvider::new(false, AcquisitionOutcome::Abandoned);
        let resolver = CredentialResolver::new(provider);

        let err = resolver
            .ensure_credential(ResolveReason::Initial)
            .await
            .unwrap_err();
        assert!(err.reason.contains("abandoned"));
    }

    #[tokio::test]
    async fn rejection_always_reacquires() {
        let provider = FakeProvider::new(true, AcquisitionOutcome::Completed);
        let resolver = CredentialResolver::new(provider.clone());

        assert!(resolver
            .ensure_credential(ResolveReason::CredentialRejected)
            .await
            .is_ok());
        assert_eq!(provider.checks.load(Ordering::SeqCst), 0);
        assert_eq!(provider.acquisitions.load(Ordering::SeqCst), 1);
    }
}

//! Caller-side retry around [`Orchestrator::start`].
//!
//! The orchestrator itself never retries transient failures. Callers that
//! want a bounded, backed-off retry use [`run_with_retry`], which starts a
//! fresh run each time the previous one ended in a retryable `Error`.

use std::time::Duration;

use promo_core::state::OrchestrationState;
use promo_core::types::GenerationRequest;
use tokio_util::sync::CancellationToken;

use crate::orchestrator::{Orchestrator, StartOutcome};

/// Tunable parameters for the exponential-backoff strategy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Delay before the second run.
    pub initial_delay: Duration,
    /// Upper bound on the delay between runs.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failed run.
    pub multiplier: f64,
    /// Total number of runs, including the first.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            max_attempts: 3,
        }
    }
}

impl RetryPolicy {
    /// Whether a run that settled in `state` on the 1-based `attempt`
    /// earns another run.
    ///
    /// Only retryable `Error`s qualify, and never past `max_attempts`.
    pub fn should_retry(&self, state: &OrchestrationState, attempt: u32) -> bool {
        match state {
            OrchestrationState::Error { failure } => {
                failure.retryable && attempt < self.max_attempts
            }
            _ => false,
        }
    }

    /// Backoff before each retry, one entry per run after the first.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        std::iter::successors(Some(self.initial_delay), move |d| Some(next_delay(*d, self)))
            .take(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// Grow `current` by the policy's multiplier, clamped to
/// [`RetryPolicy::max_delay`].
pub fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let next_ms = (current.as_millis() as f64 * policy.multiplier) as u64;
    Duration::from_millis(next_ms).min(policy.max_delay)
}

/// Run `request` until it settles in a non-retryable state or the policy
/// is exhausted, and return that final state.
///
/// Triggering `cancel` cancels the active run (landing in `Idle`) or skips
/// the pending backoff.
pub async fn run_with_retry(
    orchestrator: &Orchestrator,
    request: GenerationRequest,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> OrchestrationState {
    let mut delays = policy.delays();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        if orchestrator.start(request.clone()) == StartOutcome::AlreadyRunning {
            tracing::warn!("Another run is active, waiting for it instead of retrying");
            return orchestrator.settled().await;
        }

        let settled = tokio::select! {
            _ = cancel.cancelled() => {
                orchestrator.cancel();
                return orchestrator.state();
            }
            state = orchestrator.settled() => state,
        };

        if !policy.should_retry(&settled, attempt) {
            return settled;
        }
        let Some(delay) = delays.next() else {
            return settled;
        };

        tracing::info!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            state = settled.name(),
            "Run failed with a retryable error, starting a fresh run",
        );

        tokio::select! {
            _ = cancel.cancelled() => return settled,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

//! Completion detection for a submitted job.
//!
//! [`PollLoop::run`] sleeps for the poll interval, queries the status, and
//! repeats until the job reaches a terminal status. There is no iteration
//! bound: job duration is decided by the remote service, and the only way
//! to stop early is to drop the future (cancellation).
//!
//! Polls for one job never overlap: each query is awaited before the next
//! sleep begins.

use std::sync::Arc;
use std::time::Duration;

use promo_core::error::RemoteError;
use promo_core::service::GenerationService;
use promo_core::state::MSG_NO_ARTIFACT;
use promo_core::types::{JobHandle, JobStatus, ResultDescriptor};
use tokio::sync::mpsc;

/// Notification sent after every poll that found the job still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPoll {
    /// 1-based poll number for this handle.
    pub attempt: u64,
}

pub struct PollLoop {
    service: Arc<dyn GenerationService>,
    interval: Duration,
}

impl PollLoop {
    pub fn new(service: Arc<dyn GenerationService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Poll `handle` until it finishes.
    ///
    /// Returns the result descriptor of a job that produced at least one
    /// artifact. A job that finished with nothing is reported as
    /// [`RemoteError::Fatal`]; a failed job or failed query returns its
    /// [`RemoteError`] for classification by the caller.
    pub async fn run(
        &self,
        handle: &JobHandle,
        pending_tx: &mpsc::UnboundedSender<PendingPoll>,
    ) -> Result<ResultDescriptor, RemoteError> {
        let mut attempt = 0u64;

        loop {
            tokio::time::sleep(self.interval).await;
            attempt += 1;

            let status = self
                .service
                .status(handle)
                .await
                .unwrap_or_else(JobStatus::Failed);

            match status {
                JobStatus::Pending => {
                    tracing::debug!(handle = %handle, attempt, "Job still pending");
                    // The receiver only disappears when the run is being torn down.
                    let _ = pending_tx.send(PendingPoll { attempt });
                }
                JobStatus::Done(descriptor) if descriptor.is_empty() => {
                    tracing::warn!(handle = %handle, attempt, "Job finished without output");
                    return Err(RemoteError::Fatal(MSG_NO_ARTIFACT.to_string()));
                }
                JobStatus::Done(descriptor) => {
                    tracing::info!(
                        handle = %handle,
                        attempt,
                        artifacts = descriptor.locators.len(),
                        "Job finished",
                    );
                    return Ok(descriptor);
                }
                JobStatus::Failed(err) => {
                    tracing::warn!(handle = %handle, attempt, error = %err, "Job poll failed");
                    return Err(err);
                }
            }
        }
    }
}

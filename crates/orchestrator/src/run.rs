//! One orchestration run, from credential resolution to a terminal state.
//!
//! A [`Run`] is spawned by [`Orchestrator::start`](crate::Orchestrator::start)
//! and races its pipeline against its cancellation token. Dropping the
//! pipeline future on cancellation stops the poll loop and the progress
//! ticker at their next await point and discards the job handle with them.

use std::sync::Arc;
use std::time::Duration;

use promo_core::error::RemoteError;
use promo_core::state::{Failure, Transition};
use promo_core::types::{GenerationRequest, JobHandle, LocalArtifact, ResultDescriptor};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::classifier::{Classification, ErrorClassifier};
use crate::credential::{CredentialResolver, ResolveReason};
use crate::poll::{PendingPoll, PollLoop};
use crate::progress::ProgressTicker;
use crate::publisher::StatePublisher;
use crate::retriever::ArtifactRetriever;
use crate::submission::SubmissionClient;

/// The stateless stages shared by every run of one orchestrator.
pub(crate) struct Pipeline {
    pub resolver: CredentialResolver,
    pub submission: SubmissionClient,
    pub poll: PollLoop,
    pub retriever: ArtifactRetriever,
    pub rotation_interval: Duration,
}

pub(crate) struct Run {
    pipeline: Arc<Pipeline>,
    publisher: Arc<StatePublisher>,
    cancel: CancellationToken,
    request: GenerationRequest,
}

impl Run {
    pub(crate) fn new(
        pipeline: Arc<Pipeline>,
        publisher: Arc<StatePublisher>,
        cancel: CancellationToken,
        request: GenerationRequest,
    ) -> Self {
        Self {
            pipeline,
            publisher,
            cancel,
            request,
        }
    }

    /// Drive the run until it settles or is cancelled.
    pub(crate) async fn execute(self) {
        let cancel = self.cancel.clone();

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::info!("Run cancelled, polling and rotation stopped");
            }
            outcome = self.drive() => match outcome {
                Ok(artifact) => {
                    tracing::info!(
                        locator = %artifact.locator,
                        bytes = artifact.len(),
                        "Run completed",
                    );
                    self.publish(Transition::Succeeded(artifact));
                }
                Err(failure) => {
                    tracing::warn!(kind = ?failure.kind, error = %failure, "Run failed");
                    self.publish(Transition::Failed(failure));
                }
            },
        }
    }

    fn publish(&self, transition: Transition) {
        self.publisher.apply_for_run(&self.cancel, transition);
    }

    async fn drive(&self) -> Result<LocalArtifact, Failure> {
        let mut classifier = ErrorClassifier::new();
        let mut reason = ResolveReason::Initial;

        loop {
            self.pipeline.resolver.ensure_credential(reason).await?;

            let mut ticker = ProgressTicker::new(self.pipeline.rotation_interval);
            self.publish(Transition::CredentialResolved {
                message: ticker.current().to_string(),
            });

            let handle = self.pipeline.submission.submit(&self.request).await?;
            tracing::info!(handle = %handle, "Job submitted");

            match self.monitor(&handle, &mut ticker).await {
                Ok(descriptor) => {
                    return self
                        .pipeline
                        .retriever
                        .retrieve(&descriptor)
                        .await
                        .map_err(Failure::from);
                }
                Err(err) => match classifier.classify(&err) {
                    Classification::RetryWithFreshCredential => {
                        tracing::warn!(
                            handle = %handle,
                            error = %err,
                            "Credential rejected while polling, re-acquiring",
                        );
                        self.publish(Transition::CredentialRejected);
                        reason = ResolveReason::CredentialRejected;
                    }
                    Classification::Terminal => return Err(Failure::from_remote(&err)),
                },
            }
        }
    }

    /// Poll `handle` to completion while rotating the progress message.
    ///
    /// Every pending poll re-publishes `Generating` with the message the
    /// ticker currently shows.
    async fn monitor(
        &self,
        handle: &JobHandle,
        ticker: &mut ProgressTicker,
    ) -> Result<ResultDescriptor, RemoteError> {
        let (pending_tx, mut pending_rx) = mpsc::unbounded_channel::<PendingPoll>();
        let poll = self.pipeline.poll.run(handle, &pending_tx);
        tokio::pin!(poll);

        loop {
            tokio::select! {
                biased;

                result = &mut poll => {
                    while pending_rx.try_recv().is_ok() {
                        self.publish_progress(ticker.current());
                    }
                    return result;
                }
                Some(pending) = pending_rx.recv() => {
                    tracing::debug!(attempt = pending.attempt, "Still generating");
                    self.publish_progress(ticker.current());
                }
                message = ticker.next() => {
                    self.publish_progress(message);
                }
            }
        }
    }

    fn publish_progress(&self, message: &str) {
        self.publish(Transition::Progress {
            message: message.to_string(),
        });
    }
}

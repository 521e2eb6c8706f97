//! Public handle for driving generation runs.
//!
//! [`Orchestrator`] owns the stage pipeline, the state publisher, and at
//! most one active run. It is cheap to clone; all clones drive and observe
//! the same state. Dropping the last clone cancels the active run.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::{FutureExt, StreamExt};
use promo_core::service::{CredentialProvider, GenerationService};
use promo_core::state::{
    Failure, FailureKind, OrchestrationState, Transition, MSG_GENERATION_FAILED,
};
use promo_core::types::GenerationRequest;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::OrchestratorConfig;
use crate::credential::CredentialResolver;
use crate::poll::PollLoop;
use crate::publisher::{StatePublisher, StateStream};
use crate::retriever::ArtifactRetriever;
use crate::run::{Pipeline, Run};
use crate::submission::SubmissionClient;

/// Result of [`Orchestrator::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new run was spawned; its id is attached to every log line it emits.
    Started(Uuid),
    /// A run is already active; the request was ignored.
    AlreadyRunning,
}

#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    pipeline: Arc<Pipeline>,
    publisher: Arc<StatePublisher>,
    active: Mutex<Option<ActiveRun>>,
}

/// Bookkeeping for the most recently started run.
struct ActiveRun {
    id: Uuid,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Orchestrator {
    pub fn new(
        credentials: Arc<dyn CredentialProvider>,
        service: Arc<dyn GenerationService>,
        config: OrchestratorConfig,
    ) -> Self {
        let config = config.validated();
        let pipeline = Pipeline {
            resolver: CredentialResolver::new(credentials),
            submission: SubmissionClient::new(Arc::clone(&service)),
            poll: PollLoop::new(Arc::clone(&service), config.poll_interval),
            retriever: ArtifactRetriever::new(service),
            rotation_interval: config.rotation_interval,
        };

        Self {
            inner: Arc::new(Inner {
                pipeline: Arc::new(pipeline),
                publisher: Arc::new(StatePublisher::default()),
                active: Mutex::new(None),
            }),
        }
    }

    /// Begin a run from `Idle`, `Completed` or `Error`.
    ///
    /// Returns immediately; progress is reported through
    /// [`observe_state`](Self::observe_state). While a run is active the
    /// call is a no-op. Must be called from within a Tokio runtime.
    pub fn start(&self, request: GenerationRequest) -> StartOutcome {
        let mut active = self.inner.lock_active();

        if !self.inner.publisher.try_start() {
            tracing::debug!(
                state = self.inner.publisher.current().name(),
                "Run already active, start ignored",
            );
            return StartOutcome::AlreadyRunning;
        }

        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let run = Run::new(
            Arc::clone(&self.inner.pipeline),
            Arc::clone(&self.inner.publisher),
            cancel.clone(),
            request,
        );

        let publisher = Arc::clone(&self.inner.publisher);
        let run_cancel = cancel.clone();
        let span = tracing::info_span!("run", run_id = %id);
        let task = tokio::spawn(
            async move {
                tracing::info!("Run started");
                // A panic must still settle the state, or no later run could start.
                if let Err(panic) = AssertUnwindSafe(run.execute()).catch_unwind().await {
                    tracing::error!(panic = %panic_message(&panic), "Run task panicked");
                    publisher.apply_for_run(
                        &run_cancel,
                        Transition::Failed(Failure::new(
                            FailureKind::Generation,
                            MSG_GENERATION_FAILED,
                        )),
                    );
                }
                tracing::debug!("Run task exited");
            }
            .instrument(span),
        );

        *active = Some(ActiveRun { id, cancel, task });
        StartOutcome::Started(id)
    }

    /// Stop the active run and return to `Idle`.
    ///
    /// Idempotent, and a no-op once the run has reached `Completed` or
    /// `Error`. When this returns the state is already `Idle` and the run
    /// can no longer publish or poll past its current await point.
    pub fn cancel(&self) {
        let active = self.inner.lock_active();
        let Some(run) = active.as_ref() else {
            return;
        };

        run.cancel.cancel();
        match self.inner.publisher.apply(Transition::Cancelled) {
            Ok(_) => tracing::info!(run_id = %run.id, "Run cancelled"),
            Err(_) => tracing::debug!(run_id = %run.id, "Nothing to cancel"),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> OrchestrationState {
        self.inner.publisher.current()
    }

    /// Stream of states, starting with the current one.
    pub fn observe_state(&self) -> StateStream {
        self.inner.publisher.observe()
    }

    /// Wait until no run is active and return the settled state.
    ///
    /// Resolves immediately when called from `Idle`, `Completed` or `Error`.
    pub async fn settled(&self) -> OrchestrationState {
        let mut states = self.observe_state();
        while let Some(state) = states.next().await {
            if state.can_start() {
                return state;
            }
        }
        self.state()
    }

    /// Cancel any active run and wait for its task to exit.
    pub async fn shutdown(&self) {
        self.cancel();
        let run = self.inner.lock_active().take();
        if let Some(run) = run {
            if let Err(e) = run.task.await {
                tracing::error!(run_id = %run.id, error = %e, "Run task did not exit cleanly");
            }
        }
    }
}

impl Inner {
    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let active = self
            .active
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(run) = active {
            if !run.task.is_finished() {
                tracing::debug!(run_id = %run.id, "Orchestrator dropped, cancelling active run");
            }
            run.cancel.cancel();
        }
    }
}

fn panic_message(panic: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

//! Single source of truth for the orchestration state.
//!
//! [`StatePublisher`] stores the current [`OrchestrationState`], validates
//! every change against the transition table, and fans each new snapshot
//! out over a `tokio::sync::broadcast` channel. Observers get the current
//! snapshot first and then every later one, with no gap in between.

use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::stream::{self, BoxStream, StreamExt};
use promo_core::state::{InvalidTransition, OrchestrationState, Transition};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// Broadcast channel capacity for state snapshots.
const STATE_CHANNEL_CAPACITY: usize = 256;

/// Lazy stream of state snapshots. Ends only when the publisher is dropped.
pub type StateStream = BoxStream<'static, OrchestrationState>;

pub struct StatePublisher {
    current: Mutex<OrchestrationState>,
    sender: broadcast::Sender<OrchestrationState>,
}

impl StatePublisher {
    /// Create a publisher in `Idle` with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest unconsumed snapshots are dropped
    /// for slow observers.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            current: Mutex::new(OrchestrationState::Idle),
            sender,
        }
    }

    fn lock(&self) -> MutexGuard<'_, OrchestrationState> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> OrchestrationState {
        self.lock().clone()
    }

    /// Apply a transition and publish the resulting snapshot.
    ///
    /// Invalid transitions leave the state untouched and publish nothing.
    pub fn apply(&self, transition: Transition) -> Result<OrchestrationState, InvalidTransition> {
        let mut current = self.lock();
        self.apply_locked(&mut current, transition)
    }

    /// Apply a transition on behalf of a run, unless that run has been
    /// cancelled.
    ///
    /// The cancellation check and the state change share one lock, so once
    /// `cancel` has published `Idle` a superseded run can no longer publish.
    pub fn apply_for_run(
        &self,
        run: &CancellationToken,
        transition: Transition,
    ) -> Option<OrchestrationState> {
        let mut current = self.lock();
        if run.is_cancelled() {
            tracing::debug!(transition = transition.name(), "Dropping update from cancelled run");
            return None;
        }
        match self.apply_locked(&mut current, transition) {
            Ok(next) => Some(next),
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring invalid state transition");
                None
            }
        }
    }

    fn apply_locked(
        &self,
        current: &mut OrchestrationState,
        transition: Transition,
    ) -> Result<OrchestrationState, InvalidTransition> {
        let next = current.apply(transition)?;

        if next.name() != current.name() {
            tracing::info!(from = current.name(), to = next.name(), "State changed");
        }

        *current = next.clone();
        // Ignore the SendError: it only means nobody is observing.
        let _ = self.sender.send(next.clone());
        Ok(next)
    }

    /// Apply `Start` only if the current state permits a new run.
    ///
    /// Check and transition happen under one lock, so two racing callers
    /// cannot both start.
    pub fn try_start(&self) -> bool {
        self.apply(Transition::Start).is_ok()
    }

    /// Current snapshot plus a receiver for everything published after it.
    pub fn subscribe(&self) -> (OrchestrationState, broadcast::Receiver<OrchestrationState>) {
        let current = self.lock();
        (current.clone(), self.sender.subscribe())
    }

    /// Stream of snapshots starting with the current one.
    pub fn observe(&self) -> StateStream {
        let (current, rx) = self.subscribe();

        let updates = BroadcastStream::new(rx).filter_map(|item| async move {
            match item {
                Ok(state) => Some(state),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "State observer lagged, snapshots dropped");
                    None
                }
            }
        });

        stream::once(async move { current }).chain(updates).boxed()
    }
}

impl Default for StatePublisher {
    fn default() -> Self {
        Self::new(STATE_CHANNEL_CAPACITY)
    }
}

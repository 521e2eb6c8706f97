//! Shared fakes for orchestrator integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use promo_core::error::{RemoteError, RetrievalError};
use promo_core::service::{
    AcquisitionOutcome, CredentialProvider, FetchedArtifact, GenerationService,
};
use promo_core::types::{
    ArtifactLocator, AspectRatio, GenerationRequest, JobHandle, JobStatus, MediaConfig,
    Resolution, ResultDescriptor,
};
use promo_core::OrchestrationState;
use promo_orchestrator::{OrchestratorConfig, StateStream};

pub const VIDEO_URL: &str = "https://example/video.mp4";

/// The request used throughout the scenarios.
pub fn request() -> GenerationRequest {
    GenerationRequest::new(
        "Velvet Evening Top",
        MediaConfig {
            resolution: Resolution::Hd720,
            aspect_ratio: AspectRatio::Portrait,
            count: 1,
        },
    )
}

pub fn config(poll_secs: u64, rotation_secs: u64) -> OrchestratorConfig {
    OrchestratorConfig {
        poll_interval: Duration::from_secs(poll_secs),
        rotation_interval: Duration::from_secs(rotation_secs),
    }
}

pub fn done() -> Result<JobStatus, RemoteError> {
    Ok(JobStatus::Done(ResultDescriptor::new(vec![ArtifactLocator::new(VIDEO_URL)])))
}

pub fn pending() -> Result<JobStatus, RemoteError> {
    Ok(JobStatus::Pending)
}

pub fn video_bytes() -> Result<FetchedArtifact, RetrievalError> {
    Ok(FetchedArtifact {
        content_type: Some("video/mp4".into()),
        data: vec![0, 0, 0, 24, 102, 116, 121, 112],
    })
}

// ---------------------------------------------------------------------------
// Generation service
// ---------------------------------------------------------------------------

/// Replays scripted replies in order.
///
/// Submissions fall back to handles `H1`, `H2`, ... and polls fall back to
/// `Pending` once their queues are empty.
#[derive(Default)]
pub struct ScriptedService {
    submissions: Mutex<VecDeque<Result<JobHandle, RemoteError>>>,
    statuses: Mutex<VecDeque<Result<JobStatus, RemoteError>>>,
    fetch: Mutex<Option<Result<FetchedArtifact, RetrievalError>>>,
    status_delay: Mutex<Duration>,
    panic_next_submit: AtomicBool,
    submit_calls: AtomicUsize,
    polled: Mutex<Vec<String>>,
    fetch_calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(self, statuses: Vec<Result<JobStatus, RemoteError>>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    pub fn with_submissions(self, submissions: Vec<Result<JobHandle, RemoteError>>) -> Self {
        *self.submissions.lock().unwrap() = submissions.into();
        self
    }

    pub fn with_fetch(self, reply: Result<FetchedArtifact, RetrievalError>) -> Self {
        *self.fetch.lock().unwrap() = Some(reply);
        self
    }

    /// Make every status query take `delay` to answer.
    pub fn with_status_delay(self, delay: Duration) -> Self {
        *self.status_delay.lock().unwrap() = delay;
        self
    }

    /// Make the next submission panic instead of answering.
    pub fn panic_on_next_submit(&self) {
        self.panic_next_submit.store(true, Ordering::SeqCst);
    }

    pub fn push_statuses(&self, statuses: Vec<Result<JobStatus, RemoteError>>) {
        self.statuses.lock().unwrap().extend(statuses);
    }

    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_count(&self) -> usize {
        self.polled.lock().unwrap().len()
    }

    /// Handles in the order they were polled.
    pub fn polled_handles(&self) -> Vec<String> {
        self.polled.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn submit(&self, _request: &GenerationRequest) -> Result<JobHandle, RemoteError> {
        let n = self.submit_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.panic_next_submit.swap(false, Ordering::SeqCst) {
            panic!("scripted submission panic");
        }
        self.submissions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(JobHandle::new(format!("H{n}"))))
    }

    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, RemoteError> {
        self.polled.lock().unwrap().push(handle.as_str().to_string());

        let delay = *self.status_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(pending)
    }

    async fn fetch_artifact(
        &self,
        _locator: &ArtifactLocator,
    ) -> Result<FetchedArtifact, RetrievalError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(RetrievalError::Request("no fetch scripted".into())))
    }
}

// ---------------------------------------------------------------------------
// Credential provider
// ---------------------------------------------------------------------------

/// Credential source that counts checks and acquisitions.
///
/// Acquisition outcomes are replayed in order and default to `Completed`.
pub struct FakeCredentials {
    present: AtomicBool,
    outcomes: Mutex<VecDeque<AcquisitionOutcome>>,
    checks: AtomicUsize,
    acquisitions: AtomicUsize,
}

impl FakeCredentials {
    pub fn present() -> Arc<Self> {
        Self::build(true, Vec::new())
    }

    pub fn absent(outcomes: Vec<AcquisitionOutcome>) -> Arc<Self> {
        Self::build(false, outcomes)
    }

    fn build(present: bool, outcomes: Vec<AcquisitionOutcome>) -> Arc<Self> {
        Arc::new(Self {
            present: AtomicBool::new(present),
            outcomes: Mutex::new(outcomes.into()),
            checks: AtomicUsize::new(0),
            acquisitions: AtomicUsize::new(0),
        })
    }

    pub fn check_count(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    pub fn acquire_count(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for FakeCredentials {
    async fn has_valid_credential(&self) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.present.load(Ordering::SeqCst)
    }

    async fn acquire_credential(&self) -> AcquisitionOutcome {
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(AcquisitionOutcome::Completed);
        if outcome == AcquisitionOutcome::Completed {
            self.present.store(true, Ordering::SeqCst);
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// State helpers
// ---------------------------------------------------------------------------

/// Collect states until the run settles: a terminal state, or `Idle`
/// after a run has begun.
pub async fn collect_until_settled(states: &mut StateStream) -> Vec<OrchestrationState> {
    let mut seen = Vec::new();
    let mut started = false;

    while let Some(state) = states.next().await {
        let settled = state.is_terminal() || (started && state == OrchestrationState::Idle);
        started |= state.is_active();
        seen.push(state);
        if settled {
            break;
        }
    }
    seen
}

pub fn names(states: &[OrchestrationState]) -> Vec<&'static str> {
    states.iter().map(OrchestrationState::name).collect()
}

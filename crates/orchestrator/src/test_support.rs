//! Scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use promo_core::error::{RemoteError, RetrievalError};
use promo_core::service::{FetchedArtifact, GenerationService};
use promo_core::types::{ArtifactLocator, GenerationRequest, JobHandle, JobStatus};

/// Replays queued replies; once a queue is empty, submissions get a fresh
/// handle and polls report `Pending`.
pub(crate) struct ScriptedService {
    statuses: Mutex<VecDeque<Result<JobStatus, RemoteError>>>,
    fetch: Mutex<Option<Result<FetchedArtifact, RetrievalError>>>,
    submissions: AtomicUsize,
    polls: AtomicUsize,
    fetches: AtomicUsize,
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self {
            statuses: Mutex::new(VecDeque::new()),
            fetch: Mutex::new(None),
            submissions: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_statuses(self, statuses: Vec<Result<JobStatus, RemoteError>>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    pub(crate) fn with_fetch(self, reply: Result<FetchedArtifact, RetrievalError>) -> Self {
        *self.fetch.lock().unwrap() = Some(reply);
        self
    }

    pub(crate) fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn submit(&self, _request: &GenerationRequest) -> Result<JobHandle, RemoteError> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(JobHandle::new(format!("H{n}")))
    }

    async fn status(&self, _handle: &JobHandle) -> Result<JobStatus, RemoteError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(JobStatus::Pending))
    }

    async fn fetch_artifact(
        &self,
        _locator: &ArtifactLocator,
    ) -> Result<FetchedArtifact, RetrievalError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetch
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(RetrievalError::Request("no fetch scripted".into())))
    }
}

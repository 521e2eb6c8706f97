//! Client-side orchestration of a remote video generation job.
//!
//! Resolves a credential, submits the request, polls until the job is
//! done while rotating a progress message, recovers once from a rejected
//! credential, and downloads the artifact. All progress is reported as
//! [`OrchestrationState`](promo_core::OrchestrationState) snapshots through
//! [`Orchestrator::observe_state`].

pub mod classifier;
pub mod config;
pub mod credential;
pub mod orchestrator;
pub mod poll;
pub mod progress;
pub mod publisher;
pub mod retriever;
pub mod retry;
pub mod submission;

mod run;

#[cfg(test)]
mod test_support;

pub use config::OrchestratorConfig;
pub use orchestrator::{Orchestrator, StartOutcome};
pub use publisher::StateStream;
pub use retry::{run_with_retry, RetryPolicy};

//! Domain model for the promo video generation orchestrator.
//!
//! This crate holds everything that is independent of I/O:
//!
//! - [`types`]: generation requests, job handles, poll statuses and the
//!   locally held artifact.
//! - [`error`]: the failure taxonomy shared by every layer.
//! - [`state`]: the externally visible lifecycle and its transition table.
//! - [`progress`]: the fixed rotation of human-readable progress messages.
//! - [`prompt`]: the descriptive prompt built from a subject.
//! - [`service`]: traits for the external collaborators (credential
//!   source and remote generation service).

pub mod error;
pub mod progress;
pub mod prompt;
pub mod service;
pub mod state;
pub mod types;

pub use error::{CredentialUnavailable, RemoteError, RetrievalError, SubmissionError};
pub use state::{Failure, FailureKind, OrchestrationState, Transition};
pub use types::{
    ArtifactLocator, AspectRatio, GenerationRequest, JobHandle, JobStatus, LocalArtifact,
    MediaConfig, Resolution, ResultDescriptor,
};

//! Terminal front end for the promo video orchestrator.
//!
//! Wires a [`KeyStore`](keystore::KeyStore), the HTTP generation service,
//! and an [`Orchestrator`], prints progress as it happens, and saves the
//! finished video to disk.

pub mod config;
pub mod keystore;
pub mod output;
pub mod render;
pub mod signal;

use std::path::PathBuf;

use anyhow::Context;
use promo_core::state::OrchestrationState;
use promo_orchestrator::{Orchestrator, StartOutcome};

use crate::config::CliConfig;
use crate::signal::CancelReason;

/// How a CLI generation ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The video was written to this path.
    Saved(PathBuf),
    /// The run was stopped before it finished.
    Cancelled(Option<CancelReason>),
}

/// Run one generation to completion and save the result.
///
/// Ctrl+C and the optional deadline both cancel the run; a terminal
/// `Error` state is returned as `Err` with its recovery hint.
pub async fn generate(orchestrator: &Orchestrator, config: &CliConfig) -> anyhow::Result<Outcome> {
    let mut states = orchestrator.observe_state();
    if orchestrator.start(config.request()) == StartOutcome::AlreadyRunning {
        anyhow::bail!("A generation run is already in progress");
    }

    let settled = tokio::select! {
        settled = render::report_until_settled(&mut states) => settled,
        reason = signal::cancel_requested(config.max_wait) => {
            tracing::warn!(?reason, "Cancelling generation");
            orchestrator.cancel();
            return Ok(Outcome::Cancelled(Some(reason)));
        }
    };

    match settled {
        Some(OrchestrationState::Completed { artifact }) => {
            output::save_artifact(&artifact, &config.output)
                .await
                .with_context(|| format!("Failed to save video to {}", config.output.display()))?;
            Ok(Outcome::Saved(config.output.clone()))
        }
        Some(OrchestrationState::Error { failure }) => Err(anyhow::anyhow!(
            "{} {}",
            failure.message,
            failure.kind.recovery_hint()
        )),
        _ => Ok(Outcome::Cancelled(None)),
    }
}

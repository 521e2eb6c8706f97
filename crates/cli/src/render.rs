//! Terminal rendering of orchestration states.

use futures::StreamExt;
use promo_core::state::OrchestrationState;
use promo_orchestrator::StateStream;

/// One human-readable line for a state snapshot.
pub fn render(state: &OrchestrationState) -> String {
    match state {
        OrchestrationState::Idle => "Idle".to_string(),
        OrchestrationState::ResolvingCredential => "Checking API key...".to_string(),
        OrchestrationState::Generating { message } => message.clone(),
        OrchestrationState::Completed { artifact } => {
            format!("Video ready ({} bytes)", artifact.len())
        }
        OrchestrationState::Error { failure } => {
            format!("Error: {} {}", failure.message, failure.kind.recovery_hint())
        }
    }
}

/// Print each distinct state line until the run settles, and return the
/// settled state.
///
/// A run has settled once it reaches `Completed` or `Error`, or returns
/// to `Idle` after having started.
pub async fn report_until_settled(states: &mut StateStream) -> Option<OrchestrationState> {
    let mut last_line = String::new();
    let mut started = false;

    while let Some(state) = states.next().await {
        if state.is_active() {
            started = true;
        } else if !started && state == OrchestrationState::Idle {
            continue;
        }

        let line = render(&state);
        if line != last_line {
            eprintln!("{line}");
            last_line = line;
        }
        tracing::debug!(state = state.name(), "Observed state");

        if !state.is_active() {
            return Some(state);
        }
    }
    None
}

use std::time::Duration;

/// Why the CLI asked the orchestrator to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Interrupted,
    DeadlineExceeded,
}

/// Resolve on Ctrl+C, or once `max_wait` has elapsed if one is set.
pub async fn cancel_requested(max_wait: Option<Duration>) -> CancelReason {
    let deadline = async {
        match max_wait {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                // Without a signal handler only the deadline can cancel.
                (&mut deadline).await;
                return CancelReason::DeadlineExceeded;
            }
            CancelReason::Interrupted
        }
        _ = &mut deadline => CancelReason::DeadlineExceeded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn deadline_fires_after_max_wait() {
        let start = Instant::now();
        let reason = cancel_requested(Some(Duration::from_secs(90))).await;

        assert_eq!(reason, CancelReason::DeadlineExceeded);
        assert_eq!(start.elapsed(), Duration::from_secs(90));
    }
}

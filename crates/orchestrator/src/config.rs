use std::time::Duration;

/// Default delay between successive status queries.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
/// Default delay between progress-message rotations.
pub const DEFAULT_ROTATION_INTERVAL_SECS: u64 = 4;
/// Longest accepted interval. Larger values are clamped to this.
pub const MAX_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Timing of one orchestration run.
///
/// The two cadences are independent: rotation never delays a poll and a
/// slow poll never holds back rotation.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Sleep before every status query.
    pub poll_interval: Duration,
    /// Period of the progress-message rotation.
    pub rotation_interval: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            rotation_interval: Duration::from_secs(DEFAULT_ROTATION_INTERVAL_SECS),
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default |
    /// |--------------------------------|---------|
    /// | `PROMO_POLL_INTERVAL_SECS`     | `10`    |
    /// | `PROMO_ROTATION_INTERVAL_SECS` | `4`     |
    ///
    /// Unparseable or zero values fall back to the default with a warning;
    /// values above [`MAX_INTERVAL_SECS`] are clamped.
    pub fn from_env() -> Self {
        Self {
            poll_interval: secs_from_env("PROMO_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS),
            rotation_interval: secs_from_env(
                "PROMO_ROTATION_INTERVAL_SECS",
                DEFAULT_ROTATION_INTERVAL_SECS,
            ),
        }
    }

    /// Replace zero intervals with their defaults and clamp long ones.
    ///
    /// The fields are public, so [`Orchestrator::new`](crate::Orchestrator::new)
    /// runs every config through this before building timers from it.
    pub fn validated(self) -> Self {
        Self {
            poll_interval: checked_interval(
                "poll_interval",
                self.poll_interval,
                DEFAULT_POLL_INTERVAL_SECS,
            ),
            rotation_interval: checked_interval(
                "rotation_interval",
                self.rotation_interval,
                DEFAULT_ROTATION_INTERVAL_SECS,
            ),
        }
    }
}

fn checked_interval(field: &'static str, value: Duration, default_secs: u64) -> Duration {
    let max = Duration::from_secs(MAX_INTERVAL_SECS);
    if value.is_zero() {
        tracing::warn!(field, default_secs, "Zero interval, using default");
        Duration::from_secs(default_secs)
    } else if value > max {
        tracing::warn!(field, max_secs = MAX_INTERVAL_SECS, "Interval too long, clamping");
        max
    } else {
        value
    }
}

fn secs_from_env(name: &str, default: u64) -> Duration {
    let secs = match std::env::var(name) {
        Ok(raw) => parse_secs(name, &raw, default),
        Err(_) => default,
    };
    Duration::from_secs(secs)
}

fn parse_secs(name: &str, raw: &str, default: u64) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => {
            tracing::warn!(var = name, value = %raw, default, "Invalid interval, using default");
            default
        }
        Ok(v) if v > MAX_INTERVAL_SECS => {
            tracing::warn!(var = name, value = v, max = MAX_INTERVAL_SECS, "Interval too long, clamping");
            MAX_INTERVAL_SECS
        }
        Ok(v) => v,
    }
}

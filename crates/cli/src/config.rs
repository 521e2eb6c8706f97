use std::path::PathBuf;
use std::time::Duration;

use promo_core::types::{AspectRatio, GenerationRequest, MediaConfig, Resolution};

/// Default file the generated video is written to.
pub const DEFAULT_OUTPUT: &str = "promo.mp4";

/// Settings for one CLI invocation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Product the commercial is about.
    pub subject: String,
    pub media: MediaConfig,
    /// Where the downloaded video is saved.
    pub output: PathBuf,
    /// Optional hard deadline after which the run is cancelled.
    pub max_wait: Option<Duration>,
    /// Pre-selected API key. When absent the user is prompted.
    pub api_key: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("A subject is required: pass it as the first argument or set PROMO_SUBJECT")]
    MissingSubject,

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default     |
    /// |-----------------------|-------------|
    /// | `PROMO_SUBJECT`       | --          |
    /// | `PROMO_RESOLUTION`    | `720p`      |
    /// | `PROMO_ASPECT_RATIO`  | `9:16`      |
    /// | `PROMO_COUNT`         | `1`         |
    /// | `PROMO_OUTPUT`        | `promo.mp4` |
    /// | `PROMO_MAX_WAIT_SECS` | unset       |
    /// | `PROMO_API_KEY`       | unset       |
    ///
    /// A positional `subject` argument takes precedence over `PROMO_SUBJECT`.
    pub fn from_env(subject_arg: Option<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(subject_arg, |name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(
        subject_arg: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let subject = subject_arg
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| var("PROMO_SUBJECT"))
            .ok_or(ConfigError::MissingSubject)?;

        let defaults = MediaConfig::default();
        let resolution = match var("PROMO_RESOLUTION") {
            Some(raw) => raw.parse::<Resolution>().map_err(|e| ConfigError::Invalid {
                var: "PROMO_RESOLUTION",
                reason: e.to_string(),
            })?,
            None => defaults.resolution,
        };
        let aspect_ratio = match var("PROMO_ASPECT_RATIO") {
            Some(raw) => raw.parse::<AspectRatio>().map_err(|e| ConfigError::Invalid {
                var: "PROMO_ASPECT_RATIO",
                reason: e.to_string(),
            })?,
            None => defaults.aspect_ratio,
        };
        let count = match var("PROMO_COUNT") {
            Some(raw) => raw.parse::<u32>().map_err(|e| ConfigError::Invalid {
                var: "PROMO_COUNT",
                reason: e.to_string(),
            })?,
            None => defaults.count,
        };

        let max_wait = match var("PROMO_MAX_WAIT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "PROMO_MAX_WAIT_SECS",
                        reason: format!("expected a positive number of seconds, got '{raw}'"),
                    })
                }
            },
            None => None,
        };

        Ok(Self {
            subject,
            media: MediaConfig {
                resolution,
                aspect_ratio,
                count,
            },
            output: var("PROMO_OUTPUT")
                .unwrap_or_else(|| DEFAULT_OUTPUT.to_string())
                .into(),
            max_wait,
            api_key: var("PROMO_API_KEY"),
        })
    }

    pub fn request(&self) -> GenerationRequest {
        GenerationRequest::new(self.subject.clone(), self.media)
    }
}

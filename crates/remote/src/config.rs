use std::time::Duration;

/// Default base URL of the generation API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default video model.
pub const DEFAULT_MODEL: &str = "veo-3.1-fast-generate-preview";
/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the remote generation service.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base API URL, without a trailing slash.
    pub api_url: String,
    /// Model id used in the submission path.
    pub model: String,
    /// Timeout applied to every HTTP request.
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                                            |
    /// |------------------------------|----------------------------------------------------|
    /// | `PROMO_API_URL`              | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `PROMO_MODEL`                | `veo-3.1-fast-generate-preview`                    |
    /// | `PROMO_REQUEST_TIMEOUT_SECS` | `60`                                               |
    pub fn from_env() -> Self {
        let api_url = std::env::var("PROMO_API_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let model = std::env::var("PROMO_MODEL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let request_timeout_secs = match std::env::var("PROMO_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid PROMO_REQUEST_TIMEOUT_SECS, using default");
                DEFAULT_REQUEST_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Self {
            api_url,
            model,
            request_timeout_secs,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

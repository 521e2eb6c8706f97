//! Access to the API key the HTTP client authenticates with.

/// Supplies the currently selected API key, if any.
///
/// Implemented by whatever owns the credential (the CLI key store, a
/// test fixture). The HTTP client reads it on every request so a key
/// acquired mid-run is picked up without rebuilding the client.
pub trait ApiKeySource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// A fixed key, mostly useful in tests and scripts.
#[derive(Debug, Clone)]
pub struct StaticKey(pub String);

impl ApiKeySource for StaticKey {
    fn api_key(&self) -> Option<String> {
        Some(self.0.clone()).filter(|k| !k.is_empty())
    }
}

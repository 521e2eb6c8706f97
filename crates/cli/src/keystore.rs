//! In-process API key store.
//!
//! [`KeyStore`] is both the credential provider the orchestrator asks for
//! a credential and the key source the HTTP client reads from, so a key
//! entered mid-run is used by the very next request.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use promo_core::service::{AcquisitionOutcome, CredentialProvider};
use promo_remote::ApiKeySource;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Asks the user for an API key.
#[async_trait]
pub trait KeyPrompt: Send + Sync {
    /// `None` when the user declines to provide one.
    async fn read_key(&self) -> Option<String>;
}

/// Prompts on stderr and reads one line from stdin.
///
/// An empty line or end of input counts as abandoning the prompt.
pub struct TerminalPrompt;

const PROMPT: &str = "Enter your API key (leave empty to cancel): ";

#[async_trait]
impl KeyPrompt for TerminalPrompt {
    async fn read_key(&self) -> Option<String> {
        if let Err(e) = show_prompt(&mut tokio::io::stderr()).await {
            tracing::warn!(error = %e, "Failed to write key prompt");
        }

        let mut line = String::new();
        let mut stdin = BufReader::new(tokio::io::stdin());
        match stdin.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()).filter(|k| !k.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read API key from stdin");
                None
            }
        }
    }
}

/// Write the prompt and flush it so it shows before stdin blocks.
async fn show_prompt<W: AsyncWrite + Unpin>(out: &mut W) -> std::io::Result<()> {
    out.write_all(PROMPT.as_bytes()).await?;
    out.flush().await
}

pub struct KeyStore {
    key: RwLock<Option<String>>,
    prompt: Arc<dyn KeyPrompt>,
}

impl KeyStore {
    pub fn new(initial: Option<String>, prompt: Arc<dyn KeyPrompt>) -> Self {
        Self {
            key: RwLock::new(initial.filter(|k| !k.trim().is_empty())),
            prompt,
        }
    }

    fn current(&self) -> Option<String> {
        self.key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, key: String) {
        *self.key.write().unwrap_or_else(PoisonError::into_inner) = Some(key);
    }
}

impl ApiKeySource for KeyStore {
    fn api_key(&self) -> Option<String> {
        self.current()
    }
}

#[async_trait]
impl CredentialProvider for KeyStore {
    async fn has_valid_credential(&self) -> bool {
        self.current().is_some()
    }

    async fn acquire_credential(&self) -> AcquisitionOutcome {
        match self.prompt.read_key().await {
            Some(key) => {
                self.replace(key);
                tracing::info!("API key selected");
                AcquisitionOutcome::Completed
            }
            None => AcquisitionOutcome::Abandoned,
        }
    }
}

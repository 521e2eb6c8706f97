//! `promo-cli` -- generate a festive promo video for a product.
//!
//! Prompts for an API key when none is configured, submits the job,
//! shows rotating progress messages while the remote service renders,
//! and writes the video to disk.
//!
//! # Environment variables
//!
//! | Variable                       | Required | Default     | Description                         |
//! |--------------------------------|----------|-------------|-------------------------------------|
//! | `PROMO_SUBJECT`                | yes*     | --          | Product name (*or first argument)   |
//! | `PROMO_API_KEY`                | no       | --          | Skip the interactive key prompt     |
//! | `PROMO_RESOLUTION`             | no       | `720p`      | `720p` or `1080p`                   |
//! | `PROMO_ASPECT_RATIO`           | no       | `9:16`      | `9:16` or `16:9`                    |
//! | `PROMO_COUNT`                  | no       | `1`         | Videos requested                    |
//! | `PROMO_OUTPUT`                 | no       | `promo.mp4` | Output file                         |
//! | `PROMO_MAX_WAIT_SECS`          | no       | --          | Cancel the run after this long      |
//! | `PROMO_POLL_INTERVAL_SECS`     | no       | `10`        | Seconds between status queries      |
//! | `PROMO_ROTATION_INTERVAL_SECS` | no       | `4`         | Seconds between progress messages   |
//! | `PROMO_API_URL`                | no       | Gemini API  | Service base URL                    |
//! | `PROMO_MODEL`                  | no       | Veo fast    | Model id                            |
//! | `PROMO_REQUEST_TIMEOUT_SECS`   | no       | `60`        | Per-request HTTP timeout            |

use std::sync::Arc;

use anyhow::Context;
use promo_cli::config::CliConfig;
use promo_cli::keystore::{KeyStore, TerminalPrompt};
use promo_cli::Outcome;
use promo_orchestrator::{Orchestrator, OrchestratorConfig};
use promo_remote::{RemoteConfig, VideoServiceClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "promo_cli=info,promo_orchestrator=info,promo_remote=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig::from_env(std::env::args().nth(1)).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(2);
    });
    let remote = RemoteConfig::from_env();

    tracing::info!(
        subject = %config.subject,
        resolution = %config.media.resolution,
        aspect_ratio = %config.media.aspect_ratio,
        model = %remote.model,
        "Starting promo-cli",
    );

    let keys = Arc::new(KeyStore::new(config.api_key.clone(), Arc::new(TerminalPrompt)));
    let service = VideoServiceClient::new(&remote, keys.clone())
        .context("Failed to build HTTP client")?;
    let orchestrator = Orchestrator::new(keys, Arc::new(service), OrchestratorConfig::from_env());

    let outcome = promo_cli::generate(&orchestrator, &config).await;
    orchestrator.shutdown().await;

    match outcome? {
        Outcome::Saved(path) => println!("{}", path.display()),
        Outcome::Cancelled(reason) => {
            tracing::warn!(?reason, "Generation cancelled, nothing saved");
        }
    }
    Ok(())
}

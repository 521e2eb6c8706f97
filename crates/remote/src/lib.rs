//! HTTP client for the long-running video generation service.
//!
//! Provides typed wire messages, a thin REST wrapper, and
//! [`VideoServiceClient`], the [`GenerationService`] implementation the
//! orchestrator drives.
//!
//! [`GenerationService`]: promo_core::service::GenerationService

pub mod api;
pub mod client;
pub mod config;
pub mod key;
pub mod messages;

pub use client::VideoServiceClient;
pub use config::RemoteConfig;
pub use key::{ApiKeySource, StaticKey};

//! CLI subcommands.

pub mod config;
pub mod lookup;

use giftcard_lookup_api::config::ConfigError;
use giftcard_lookup_api::services::LookupError;
use giftcard_lookup_api::shopify::ShopifyError;
use giftcard_lookup_core::EmailError;
use thiserror::Error;

/// Errors surfaced by any subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

//! Shopify Admin REST API client.
//!
//! # Security
//!
//! The client holds the Admin API access token. It is installed once as a
//! default header and never logged; `ShopifyConfig`'s `Debug` output redacts it.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` (`customers/search.json`, `gift_cards.json`)
//! - Cursor pagination through the `Link` response header
//! - No retries: the first failed request ends the lookup
//!
//! # Example
//!
//! ```rust,ignore
//! use giftcard_lookup_api::shopify::ShopifyClient;
//!
//! let client = ShopifyClient::new(&config.shopify)?;
//! let email = Email::parse("shopper@example.com")?;
//!
//! let customer = client.resolve_customer(&email).await?;
//! let cards = client.list_gift_cards(Some(&email)).await?;
//! ```

pub(crate) mod client;
mod conversions;
mod customers;
mod gift_cards;
pub mod pagination;
pub mod types;

pub use client::ShopifyClient;
pub use pagination::{Listing, Page, PageCursor};

use thiserror::Error;

/// Errors that can occur when talking to the Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("Shopify request failed with status {status}")]
    Request {
        /// Upstream HTTP status code.
        status: u16,
        /// Upstream response body, verbatim.
        body: String,
    },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request or pagination URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A response header could not be decoded.
    #[error("Invalid response header: {0}")]
    InvalidHeader(String),

    /// The client could not be constructed from configuration.
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// Pagination kept going past the configured page limit.
    #[error("Pagination aborted after {0} pages")]
    PageLimitExceeded(usize),
}

impl ShopifyError {
    /// The upstream status code, when Shopify produced one.
    #[must_use]
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

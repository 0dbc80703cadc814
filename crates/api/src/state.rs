//! Application state shared across handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::ApiConfig;
use crate::services::GiftCardLookup;
use crate::shopify::{ShopifyClient, ShopifyError};

/// Source of the current time for expiry checks.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds only the lookup
/// service, with its shared HTTP client, and the clock.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    lookup: GiftCardLookup,
    clock: Clock,
}

impl AppState {
    /// Create a new application state using the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ShopifyError> {
        Self::with_clock(config, Arc::new(Utc::now))
    }

    /// Create a new application state with a fixed time source.
    ///
    /// # Errors
    ///
    /// Returns an error if the Shopify client cannot be built.
    pub fn with_clock(config: ApiConfig, clock: Clock) -> Result<Self, ShopifyError> {
        let client = ShopifyClient::new(&config.shopify)?;
        let lookup = GiftCardLookup::new(client, config.lookup);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                lookup,
                clock,
            }),
        })
    }

    /// Get a reference to the lookup service.
    #[must_use]
    pub fn lookup(&self) -> &GiftCardLookup {
        &self.inner.lookup
    }

    /// The current time according to the configured clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        (self.inner.clock)()
    }
}

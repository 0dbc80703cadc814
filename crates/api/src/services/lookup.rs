//! Gift card balance lookup.
//!
//! One lookup runs sequentially: customer search (when enabled), then every
//! page of gift cards, then local filtering and aggregation. Any upstream
//! failure aborts the whole lookup.

use chrono::{DateTime, Utc};
use giftcard_lookup_core::{AggregateError, CustomerResolution, Email, GiftCardSummary, aggregate};
use thiserror::Error;
use tracing::instrument;

use crate::config::{LookupConfig, QueryScope};
use crate::shopify::{ShopifyClient, ShopifyError};

/// Why a lookup produced no summary.
#[derive(Debug, Error)]
pub enum LookupError {
    /// An upstream request failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// The fetched cards could not be totalled.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// Looks up the active gift cards of a shopper.
#[derive(Clone)]
pub struct GiftCardLookup {
    client: ShopifyClient,
    config: LookupConfig,
}

impl GiftCardLookup {
    #[must_use]
    pub const fn new(client: ShopifyClient, config: LookupConfig) -> Self {
        Self { client, config }
    }

    /// Look up `email`'s active gift cards, evaluating expiry at `now`.
    ///
    /// # Errors
    ///
    /// Returns the first upstream error, or an aggregation error if the
    /// balances cannot be totalled. No partial summary is produced.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn lookup(&self, email: &Email, now: DateTime<Utc>) -> Result<GiftCardSummary, LookupError> {
        let resolution = if self.config.resolve_customer_first {
            let customer = self.client.resolve_customer(email).await?;
            if let Some(identity) = &customer {
                tracing::debug!(
                    customer_id = identity.id.as_i64(),
                    resolved_from = %identity.email,
                    "Customer resolved"
                );
            }
            CustomerResolution::Resolved(customer.map(|c| c.id))
        } else {
            CustomerResolution::Infer
        };

        let scope = match self.config.query_scope {
            QueryScope::Email => Some(email),
            QueryScope::None => None,
        };
        let records = self.client.list_gift_cards(scope).await?;
        let fetched = records.len();

        let result = aggregate(records, resolution, email, &self.config.policy, now)?;

        tracing::info!(
            fetched,
            cards = result.active_count(),
            total_balance = %result.total_balance,
            customer_id = result.customer_id.map(|id| id.as_i64()),
            "Gift card lookup complete"
        );

        Ok(GiftCardSummary::project(email.clone(), result))
    }
}

//! Public response shape.
//!
//! Only the fields listed here ever leave the service; codes, notes, order
//! links and anything else upstream returns are dropped during projection.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::AggregationResult;
use crate::gift_card::GiftCardRecord;
use crate::types::{CustomerId, Email, GiftCardId, serialize_amount};

/// A gift card as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveCard {
    /// Upstream gift card ID.
    pub id: GiftCardId,
    /// Remaining balance, as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub balance: Decimal,
    /// Value at issue, as a decimal string.
    #[serde(with = "rust_decimal::serde::str")]
    pub initial_value: Decimal,
    /// ISO 4217 currency code.
    pub currency: Option<String>,
    /// Linked customer, if any.
    pub customer_id: Option<CustomerId>,
    /// Address the card was sent to.
    pub recipient_email: Option<String>,
    /// Expiry date (`YYYY-MM-DD`), if the card expires.
    pub expires_on: Option<String>,
    /// Upstream creation timestamp.
    pub created_at: Option<String>,
    /// Upstream last-modified timestamp.
    pub updated_at: Option<String>,
}

impl From<GiftCardRecord> for ActiveCard {
    fn from(gc: GiftCardRecord) -> Self {
        Self {
            id: gc.id,
            balance: gc.balance,
            initial_value: gc.initial_value,
            currency: gc.currency,
            customer_id: gc.customer_id,
            recipient_email: gc.recipient_email,
            expires_on: gc.expires_on,
            created_at: gc.created_at,
            updated_at: gc.updated_at,
        }
    }
}

/// Response body for a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GiftCardSummary {
    /// The normalized email that was looked up.
    pub email: Email,
    /// The shopper's customer ID, if one was resolved or inferred.
    pub customer_id: Option<CustomerId>,
    /// Sum of `active_cards[..].balance`, rounded to cents, as a JSON number.
    #[serde(serialize_with = "serialize_amount")]
    pub total_balance: Decimal,
    /// Always `active_cards.len()`.
    pub active_cards_count: usize,
    /// Cards that passed every rule, in upstream order.
    pub active_cards: Vec<ActiveCard>,
}

impl GiftCardSummary {
    /// Project an aggregation result for `email`.
    #[must_use]
    pub fn project(email: Email, result: AggregationResult) -> Self {
        let active_cards: Vec<ActiveCard> = result.cards.into_iter().map(ActiveCard::from).collect();

        Self {
            email,
            customer_id: result.customer_id,
            total_balance: result.total_balance,
            active_cards_count: active_cards.len(),
            active_cards,
        }
    }
}

//! Gift card record and customer identity.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CustomerId, Email, GiftCardId};

/// A gift card as fetched from the Admin API, with amounts already parsed.
///
/// Records are immutable once fetched and live only for one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCardRecord {
    /// Gift card ID.
    pub id: GiftCardId,
    /// Current balance. Unparseable upstream values become zero.
    pub balance: Decimal,
    /// Value the card was issued with.
    pub initial_value: Decimal,
    /// ISO 4217 currency code, passed through as received.
    pub currency: Option<String>,
    /// Owning customer, if the card is linked to one.
    pub customer_id: Option<CustomerId>,
    /// Recipient email for cards sent as gifts.
    pub recipient_email: Option<String>,
    /// When the card was disabled.
    pub disabled_at: Option<String>,
    /// Expiration date (`YYYY-MM-DD`).
    pub expires_on: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
}

impl GiftCardRecord {
    /// Whether the card carries a disabled timestamp.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled_at.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// The instant the card expires.
    ///
    /// A bare date is midnight UTC of that day; full RFC 3339 timestamps are
    /// also accepted. Values that parse as neither yield `None`, and such a
    /// card is treated as never expiring.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.expires_on.as_deref()?.trim();

        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }

        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether the card's expiry lies strictly before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires| expires < now)
    }

    /// Whether the card is linked to `customer_id`.
    #[must_use]
    pub fn belongs_to(&self, customer_id: CustomerId) -> bool {
        self.customer_id == Some(customer_id)
    }

    /// Whether the recipient email, normalized, is `email`.
    #[must_use]
    pub fn is_addressed_to(&self, email: &Email) -> bool {
        self.recipient_email
            .as_deref()
            .is_some_and(|recipient| email.matches(recipient))
    }
}

/// A customer resolved from an email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerIdentity {
    /// Upstream customer ID.
    pub id: CustomerId,
    /// Email the customer was resolved from.
    pub email: Email,
}

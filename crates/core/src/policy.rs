//! Filter and ownership-matching policy.
//!
//! Which cards count toward a shopper's balance is a business decision, not a
//! property of the data. Every rule is an explicit field here so the service
//! can be configured instead of patched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gift_card::GiftCardRecord;

/// Error parsing a policy value from configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown match strategy '{0}' (expected customer_id, customer_id_then_recipient_email or none)")]
pub struct ParsePolicyError(pub String);

/// How a record is attributed to the requesting shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Only cards linked to the resolved customer.
    #[serde(rename = "customer_id")]
    CustomerIdOnly,
    /// Cards linked to the customer, or whose recipient email is the
    /// requested address.
    #[default]
    #[serde(rename = "customer_id_then_recipient_email")]
    CustomerIdThenRecipientEmail,
    /// Keep everything the upstream query returned.
    None,
}

impl MatchStrategy {
    /// Configuration value for this strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomerIdOnly => "customer_id",
            Self::CustomerIdThenRecipientEmail => "customer_id_then_recipient_email",
            Self::None => "none",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer_id" | "customer_id_only" => Ok(Self::CustomerIdOnly),
            "customer_id_then_recipient_email" | "customer_id_or_email" => {
                Ok(Self::CustomerIdThenRecipientEmail)
            }
            "none" => Ok(Self::None),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// Which gift cards count as active for a shopper.
///
/// The default keeps only positive-balance, enabled, unexpired cards that are
/// linked to the customer or addressed to the requested email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FilterPolicy {
    /// Drop cards whose balance is not strictly positive.
    pub require_positive_balance: bool,
    /// Drop cards with a disabled timestamp.
    pub exclude_disabled: bool,
    /// Drop cards whose expiry is before now.
    pub exclude_expired: bool,
    /// How cards are attributed to the shopper.
    pub match_strategy: MatchStrategy,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            require_positive_balance: true,
            exclude_disabled: true,
            exclude_expired: true,
            match_strategy: MatchStrategy::default(),
        }
    }
}

impl FilterPolicy {
    /// A policy that drops nothing on account of card state.
    #[must_use]
    pub const fn keep_all(match_strategy: MatchStrategy) -> Self {
        Self {
            require_positive_balance: false,
            exclude_disabled: false,
            exclude_expired: false,
            match_strategy,
        }
    }

    /// Whether the card passes the balance, disabled and expiry rules.
    ///
    /// Ownership is checked separately.
    #[must_use]
    pub fn admits(&self, card: &GiftCardRecord, now: DateTime<Utc>) -> bool {
        if self.require_positive_balance && card.balance <= Decimal::ZERO {
            return false;
        }

        if self.exclude_disabled && card.is_disabled() {
            return false;
        }

        if self.exclude_expired && card.is_expired_at(now) {
            return false;
        }

        true
    }
}

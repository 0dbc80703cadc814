//! Balance aggregation.
//!
//! Takes every record fetched for a lookup and reduces it to the cards that
//! count for the shopper, plus their total. The total is always computed over
//! exactly the returned cards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::gift_card::GiftCardRecord;
use crate::policy::{FilterPolicy, MatchStrategy};
use crate::types::{CustomerId, Email, round_currency};

/// Where the shopper's customer id comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerResolution {
    /// A customer search ran first; `None` means it found nobody.
    Resolved(Option<CustomerId>),
    /// No search ran. Use the first linked customer among the admitted
    /// cards, falling back to all fetched cards.
    Infer,
}

/// Aggregation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// The active balances sum past what a `Decimal` can hold.
    #[error("Total balance overflowed across {cards} active cards")]
    BalanceOverflow {
        /// Number of active cards being summed.
        cards: usize,
    },
}

/// Outcome of one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationResult {
    /// The shopper's customer id, if known.
    pub customer_id: Option<CustomerId>,
    /// Cards that passed every rule, in upstream order.
    pub cards: Vec<GiftCardRecord>,
    /// Sum of `cards[..].balance`, rounded to cents.
    pub total_balance: Decimal,
}

impl AggregationResult {
    /// Number of active cards.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.cards.len()
    }
}

/// Filter `records` by `policy`, attribute them to the shopper and sum balances.
///
/// `now` is the instant expiry is evaluated against; passing it in keeps the
/// result deterministic.
///
/// # Errors
///
/// Returns [`AggregateError::BalanceOverflow`] if the active balances cannot
/// be summed without overflow. No partial total is produced.
pub fn aggregate(
    records: Vec<GiftCardRecord>,
    resolution: CustomerResolution,
    email: &Email,
    policy: &FilterPolicy,
    now: DateTime<Utc>,
) -> Result<AggregationResult, AggregateError> {
    let (admitted, rejected): (Vec<_>, Vec<_>) =
        records.into_iter().partition(|gc| policy.admits(gc, now));

    let customer_id = match resolution {
        CustomerResolution::Resolved(id) => id,
        CustomerResolution::Infer => first_customer_id(&admitted)
            .or_else(|| first_customer_id(&rejected)),
    };

    let cards: Vec<GiftCardRecord> = admitted
        .into_iter()
        .filter(|gc| is_owned(gc, customer_id, email, policy.match_strategy))
        .collect();

    let total_balance = cards
        .iter()
        .try_fold(Decimal::ZERO, |acc, gc| acc.checked_add(gc.balance))
        .map(round_currency)
        .ok_or(AggregateError::BalanceOverflow { cards: cards.len() })?;

    Ok(AggregationResult {
        customer_id,
        cards,
        total_balance,
    })
}

fn first_customer_id(records: &[GiftCardRecord]) -> Option<CustomerId> {
    records.iter().find_map(|gc| gc.customer_id)
}

fn is_owned(
    card: &GiftCardRecord,
    customer_id: Option<CustomerId>,
    email: &Email,
    strategy: MatchStrategy,
) -> bool {
    let by_customer = customer_id.is_some_and(|id| card.belongs_to(id));

    match strategy {
        MatchStrategy::None => true,
        MatchStrategy::CustomerIdOnly => by_customer,
        MatchStrategy::CustomerIdThenRecipientEmail => by_customer || card.is_addressed_to(email),
    }
}

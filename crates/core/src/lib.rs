//! Gift Card Lookup Core - Domain types and balance aggregation.
//!
//! This crate provides the pieces of the lookup pipeline that do not touch
//! the network. It is shared by:
//! - `api` - HTTP service that answers `/giftcard?email=...`
//! - `cli` - Operator tool that runs the same lookup from a terminal
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Records are fetched by the API crate, converted into
//! [`GiftCardRecord`]s, and handed to [`aggregate`] together with a
//! [`FilterPolicy`] and the current instant.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails and monetary amounts
//! - [`gift_card`] - The gift card record and customer identity
//! - [`policy`] - Filter and ownership-matching configuration
//! - [`aggregate`] - Filtering, ownership matching and balance summing
//! - [`summary`] - The public response shape

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregate;
pub mod gift_card;
pub mod policy;
pub mod summary;
pub mod types;

pub use aggregate::{AggregateError, AggregationResult, CustomerResolution, aggregate};
pub use gift_card::{CustomerIdentity, GiftCardRecord};
pub use policy::{FilterPolicy, MatchStrategy, ParsePolicyError};
pub use summary::{ActiveCard, GiftCardSummary};
pub use types::*;

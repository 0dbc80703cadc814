//! Core types for the gift card lookup.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{parse_amount, round_currency, serialize_amount};

//! Business logic services.
//!
//! - `lookup` - Gift card balance lookup for one shopper

pub mod lookup;

pub use lookup::{GiftCardLookup, LookupError};

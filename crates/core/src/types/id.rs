//! Newtype IDs for type-safe entity references.
//!
//! Shopify REST resources carry numeric ids, but the same id can show up as a
//! JSON number, a numeric string, or a GraphQL global id
//! (`gid://shopify/Customer/555`). The generated types coerce all three so that
//! ownership comparisons are plain numeric equality.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`, `from_json()`
/// - `FromStr` accepting `"555"` and `"gid://shopify/Type/555"`
///
/// # Example
///
/// ```rust
/// # use giftcard_lookup_core::define_id;
/// define_id!(OrderId);
///
/// let id: OrderId = "gid://shopify/Order/7".parse().unwrap();
/// assert_eq!(id, OrderId::new(7));
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }

            /// Coerce a loosely typed JSON value into an ID.
            ///
            /// Integers and integral strings are accepted; anything else
            /// (null, fractions, non-numeric text) yields `None`.
            #[must_use]
            pub fn from_json(value: &::serde_json::Value) -> Option<Self> {
                match value {
                    ::serde_json::Value::Number(n) => n.as_i64().map(Self),
                    ::serde_json::Value::String(s) => s.parse().ok(),
                    _ => None,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                let s = s.trim();
                let numeric = if s.starts_with("gid://") {
                    s.rsplit('/').next().unwrap_or(s)
                } else {
                    s
                };
                numeric.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(GiftCardId);
define_id!(CustomerId);

//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when normalizing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing left after trimming.
    #[error("Email missing")]
    Empty,
}

/// A normalized email address.
///
/// Normalization trims surrounding whitespace and lowercases the address.
/// No structural validation is performed: the upstream search is exact-match,
/// so an address without an `@` simply finds nothing.
///
/// ## Examples
///
/// ```
/// use giftcard_lookup_core::Email;
///
/// let email = Email::parse("  Shopper@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "shopper@example.com");
///
/// assert!(Email::parse("   ").is_err());
/// assert!(Email::normalize(None).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Normalize an optional raw value, treating a missing value as empty.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] if the value is missing or whitespace-only.
    pub fn normalize(raw: Option<&str>) -> Result<Self, EmailError> {
        let normalized = raw.unwrap_or_default().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }

        Ok(Self(normalized))
    }

    /// Normalize a raw string.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] if the value is whitespace-only.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        Self::normalize(Some(s))
    }

    /// Whether `other`, once normalized, is this address.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        other.trim().to_lowercase() == self.0
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

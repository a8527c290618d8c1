//! # Currency Value Objects
//!
//! ISO-4217-shaped currency codes and currency pairs.
//!
//! # Examples
//!
//! ```
//! use remit_compare::domain::value_objects::currency::{CurrencyCode, CurrencyPair};
//!
//! let gbp = CurrencyCode::new("gbp").unwrap();
//! let eur: CurrencyCode = "EUR".parse().unwrap();
//! let pair = CurrencyPair::new(gbp, eur).unwrap();
//! assert_eq!(pair.to_string(), "GBP/EUR");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A three-letter currency code, stored uppercase.
///
/// # Invariants
///
/// - Exactly three ASCII letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// Creates a currency code, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCurrency` unless the input is exactly
    /// three ASCII letters (surrounding whitespace is ignored).
    pub fn new(code: &str) -> DomainResult<Self> {
        let trimmed = code.trim();
        let bytes = trimmed.as_bytes();
        match bytes {
            [a, b, c] if bytes.iter().all(u8::is_ascii_alphabetic) => Ok(Self([
                a.to_ascii_uppercase(),
                b.to_ascii_uppercase(),
                c.to_ascii_uppercase(),
            ])),
            _ => Err(DomainError::InvalidCurrency(code.to_string())),
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Constructed only from ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}

/// An ordered (source, destination) currency pair.
///
/// # Invariants
///
/// - Source and destination differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    from: CurrencyCode,
    to: CurrencyCode,
}

impl CurrencyPair {
    /// Creates a currency pair.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCurrency` if both sides are the same.
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> DomainResult<Self> {
        if from == to {
            return Err(DomainError::InvalidCurrency(format!(
                "source and destination are both {from}"
            )));
        }
        Ok(Self { from, to })
    }

    /// Returns the source currency.
    #[inline]
    #[must_use]
    pub const fn from(&self) -> CurrencyCode {
        self.from
    }

    /// Returns the destination currency.
    #[inline]
    #[must_use]
    pub const fn to(&self) -> CurrencyCode {
        self.to
    }

    /// Returns the pair with sides swapped.
    #[must_use]
    pub const fn inverse(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

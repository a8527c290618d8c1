//! # Provider Identity
//!
//! Stable provider keys and the raw identity fields they are derived from.
//!
//! A [`ProviderKey`] is the lowercase, ASCII-alphanumeric-only form of the
//! most specific identifying field a source reported. Different sources
//! spell the same provider differently (`"Wise"`, `"provider_wise"`,
//! `"WISE"`); they all collapse to the key `wise`.
//!
//! # Examples
//!
//! ```
//! use remit_compare::domain::value_objects::provider_key::{ProviderIdentity, ProviderKey};
//!
//! let identity = ProviderIdentity::named("Western Union").with_identifier("provider_western-union");
//! assert_eq!(ProviderKey::derive(&identity, 0).as_str(), "westernunion");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier prefixes some sources put in front of provider ids.
pub const KNOWN_ID_PREFIXES: &[&str] = &["provider_", "provider-", "prv_", "prv-"];

/// A normalized provider key.
///
/// # Invariants
///
/// - Non-empty
/// - Only lowercase ASCII letters and digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderKey(String);

impl ProviderKey {
    /// Normalizes arbitrary text into a key.
    ///
    /// Returns `None` when nothing alphanumeric remains.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    /// Creates a key, normalizing the input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidProviderKey` if the input has no
    /// alphanumeric characters.
    pub fn new(raw: &str) -> DomainResult<Self> {
        Self::normalize(raw).ok_or_else(|| DomainError::InvalidProviderKey(raw.to_string()))
    }

    /// Derives the key for an identity, in priority order: explicit code,
    /// identifier with a known prefix stripped, display name, and finally a
    /// positional key built from `position`.
    #[must_use]
    pub fn derive(identity: &ProviderIdentity, position: usize) -> Self {
        identity
            .code
            .as_deref()
            .and_then(Self::normalize)
            .or_else(|| {
                identity
                    .identifier
                    .as_deref()
                    .map(strip_known_prefix)
                    .and_then(Self::normalize)
            })
            .or_else(|| Self::normalize(&identity.name))
            .unwrap_or_else(|| Self(format!("provider{position}")))
    }

    /// Returns the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProviderKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ProviderKey> for String {
    fn from(key: ProviderKey) -> Self {
        key.0
    }
}

/// Removes the first matching entry of [`KNOWN_ID_PREFIXES`], case-insensitively.
#[must_use]
pub fn strip_known_prefix(identifier: &str) -> &str {
    let trimmed = identifier.trim();
    for prefix in KNOWN_ID_PREFIXES {
        if let Some(head) = trimmed.get(..prefix.len())
            && head.eq_ignore_ascii_case(prefix)
            && let Some(rest) = trimmed.get(prefix.len()..)
        {
            return rest;
        }
    }
    trimmed
}

/// Identity fields as reported by a quote source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// Explicit provider code, when the source has one.
    pub code: Option<String>,
    /// Full provider identifier, possibly prefixed.
    pub identifier: Option<String>,
    /// Display name.
    pub name: String,
}

impl ProviderIdentity {
    /// Creates an identity carrying only a display name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            code: None,
            identifier: None,
            name: name.into(),
        }
    }

    /// Sets the explicit provider code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the full provider identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(ProviderKey::normalize("Wise-Transfer_2").unwrap().as_str(), "wisetransfer2");
        assert!(ProviderKey::normalize("--").is_none());
        assert!(ProviderKey::new(" ").is_err());
    }

    #[test]
    fn derive_prefers_code() {
        let identity = ProviderIdentity::named("Wise")
            .with_code("TW")
            .with_identifier("provider_wise");
        assert_eq!(ProviderKey::derive(&identity, 3).as_str(), "tw");
    }

    #[test]
    fn derive_strips_identifier_prefix() {
        let identity = ProviderIdentity::named("Remitly Inc.").with_identifier("PROVIDER_remitly");
        assert_eq!(ProviderKey::derive(&identity, 0).as_str(), "remitly");
    }

    #[test]
    fn derive_falls_back_to_name() {
        let identity = ProviderIdentity::named("Western Union").with_code("  ");
        assert_eq!(ProviderKey::derive(&identity, 0).as_str(), "westernunion");
    }

    #[test]
    fn derive_falls_back_to_position() {
        let identity = ProviderIdentity::named("¿?");
        assert_eq!(ProviderKey::derive(&identity, 7).as_str(), "provider7");
    }

    #[test]
    fn strip_prefix_is_case_insensitive() {
        assert_eq!(strip_known_prefix("Prv-ofx"), "ofx");
        assert_eq!(strip_known_prefix("xe"), "xe");
    }

    #[test]
    fn serde_normalizes_on_read() {
        let key: ProviderKey = serde_json::from_str("\"Wise\"").unwrap();
        assert_eq!(key.as_str(), "wise");
        assert!(serde_json::from_str::<ProviderKey>("\"!!\"").is_err());
    }
}

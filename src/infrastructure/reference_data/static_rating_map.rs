//! # Static Rating Map
//!
//! Read-only `provider -> rating` reference table, loaded once at startup
//! from a TOML file or taken from the built-in table.
//!
//! File format:
//!
//! ```toml
//! [ratings]
//! wise = 4.3
//! "western-union" = 4.0
//! ```
//!
//! Keys are matched case-insensitively; the rating resolver decides which
//! spellings of a provider to try.

use crate::domain::value_objects::Rating;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors loading reference data.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML of the expected shape.
    #[error("failed to parse rating map: {0}")]
    Parse(String),

    /// A rating lies outside `[0, 5]`.
    #[error("rating for '{key}' is out of range: {value}")]
    InvalidRating {
        /// Provider key as written in the file.
        key: String,
        /// Offending value.
        value: Decimal,
    },
}

#[derive(Debug, Deserialize)]
struct RatingMapFile {
    #[serde(default)]
    ratings: HashMap<String, Decimal>,
}

/// Case-insensitive provider rating table.
#[derive(Debug, Clone, Default)]
pub struct StaticRatingMap {
    ratings: HashMap<String, Rating>,
}

impl StaticRatingMap {
    /// Creates a map from already-validated entries.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (String, Rating)>) -> Self {
        Self {
            ratings: entries
                .into_iter()
                .map(|(key, rating)| (key.trim().to_lowercase(), rating))
                .collect(),
        }
    }

    /// Returns the built-in table.
    #[must_use]
    pub fn with_defaults() -> Self {
        let entries = [
            ("wise", dec!(4.3)),
            ("remitly", dec!(4.1)),
            ("westernunion", dec!(3.9)),
            ("western-union", dec!(3.9)),
            ("moneygram", dec!(3.7)),
            ("worldremit", dec!(4.2)),
            ("revolut", dec!(4.2)),
            ("instarem", dec!(4.4)),
            ("paysend", dec!(4.3)),
            ("xe", dec!(4.2)),
            ("ofx", dec!(4.3)),
            ("torfx", dec!(4.8)),
            ("currencyfair", dec!(4.1)),
            ("skrill", dec!(3.8)),
            ("ria", dec!(4.0)),
        ];
        Self::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), Rating::clamped(value))),
        )
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceDataError::Parse` for malformed TOML and
    /// `ReferenceDataError::InvalidRating` for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ReferenceDataError> {
        let file: RatingMapFile =
            toml::from_str(text).map_err(|e| ReferenceDataError::Parse(e.to_string()))?;
        let mut entries = Vec::with_capacity(file.ratings.len());
        for (key, value) in file.ratings {
            let rating = Rating::new(value)
                .map_err(|_| ReferenceDataError::InvalidRating {
                    key: key.clone(),
                    value,
                })?;
            entries.push((key, rating));
        }
        Ok(Self::new(entries))
    }

    /// Loads a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceDataError` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ReferenceDataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Looks up a rating, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Rating> {
        self.ratings.get(&key.trim().to_lowercase()).copied()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

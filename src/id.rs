//! Typed identifiers for catalog records.
//!
//! Catalog records are keyed by short human-readable slugs such as
//! `fed-funds-target` or `fed_hike_hawkish_surprise`. Each record kind gets
//! its own newtype so an indicator id can never be passed where a mechanism
//! id is expected. Identifiers are validated on construction and on
//! deserialization.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum identifier length in bytes.
pub const MAX_ID_LEN: usize = 128;

fn validate_slug(kind: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyIdentifier { kind });
    }
    if value.len() > MAX_ID_LEN {
        return Err(ValidationError::FieldTooLong {
            field: kind.to_string(),
            max_length: MAX_ID_LEN,
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(ValidationError::InvalidIdentifier {
            kind,
            value: value.to_string(),
            character: bad,
        });
    }
    Ok(())
}

macro_rules! slug_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a validated identifier.
            ///
            /// # Errors
            ///
            /// Returns a `ValidationError` if the slug is empty, too long, or
            /// contains characters other than ASCII alphanumerics, `-` and `_`.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                validate_slug($kind, &value)?;
                Ok(Self(value))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValidationError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

slug_id!(
    /// Identifier of an economic indicator (e.g. `core-pce`).
    IndicatorId,
    "indicator"
);

slug_id!(
    /// Identifier of a causal mechanism (e.g. `policy_path_repricing`).
    MechanismId,
    "mechanism"
);

slug_id!(
    /// Identifier of a scenario preset (e.g. `fed_cut_dovish_surprise`).
    ScenarioId,
    "scenario"
);

slug_id!(
    /// Identifier of a macro regime (e.g. `late_cycle`).
    RegimeId,
    "regime"
);

/// Regimes the built-in data is curated against.
pub const KNOWN_REGIMES: [&str; 4] = ["soft_landing", "late_cycle", "recession_risk", "financial_stress"];

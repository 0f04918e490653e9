//! Error types for macroshock.
//!
//! All errors are strongly typed using thiserror. The scenario engine itself
//! never fails: unknown scenarios, regimes and surprise sizes resolve to
//! documented defaults. Errors only surface while building or loading the
//! static catalogs, where a defect is fatal for initialization.

use thiserror::Error;

/// Validation errors raised while constructing typed values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// An identifier was empty.
    #[error("Identifier for {kind} cannot be empty")]
    EmptyIdentifier {
        /// Record kind the identifier names.
        kind: &'static str,
    },

    /// An identifier contained a character outside the slug alphabet.
    #[error("Identifier '{value}' for {kind} contains invalid character '{character}'")]
    InvalidIdentifier {
        /// Record kind the identifier names.
        kind: &'static str,
        /// The rejected identifier.
        value: String,
        /// First offending character.
        character: char,
    },

    /// A text field exceeded its length limit.
    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        /// Offending field.
        field: String,
        /// Maximum length in characters.
        max_length: usize,
    },

    /// A numeric setting asked for more decimal places than supported.
    #[error("Field '{field}' exceeds maximum precision of {max_decimals} decimal places")]
    PrecisionTooHigh {
        /// Offending field.
        field: String,
        /// Largest accepted number of decimal places.
        max_decimals: u32,
    },

    /// Impact confidence outside 1..=5.
    #[error("Confidence {value} is out of range [1, 5]")]
    ConfidenceOutOfRange {
        /// The rejected value.
        value: u8,
    },

    /// A strength or multiplier that is negative, NaN or infinite.
    #[error("Field '{field}' must be a finite, non-negative number (got {value})")]
    InvalidMagnitude {
        /// Offending field.
        field: String,
        /// The rejected value.
        value: f64,
    },

    /// A required field was absent.
    #[error("Required field '{field}' is missing")]
    MissingField {
        /// The absent field.
        field: String,
    },
}

/// Referential-integrity defects found in the static catalogs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    /// A rule targets an indicator missing from the catalog.
    #[error("Rule #{index} of scenario '{scenario}' targets unknown indicator '{indicator}'")]
    UnknownRuleTarget {
        /// Scenario owning the rule.
        scenario: String,
        /// Position of the rule within the scenario.
        index: usize,
        /// The unknown indicator id.
        indicator: String,
    },

    /// A rule cites a mechanism missing from the registry.
    #[error("Rule #{index} of scenario '{scenario}' references unknown mechanism '{mechanism}'")]
    UnknownRuleMechanism {
        /// Scenario owning the rule.
        scenario: String,
        /// Position of the rule within the scenario.
        index: usize,
        /// The unknown mechanism id.
        mechanism: String,
    },

    /// Rules exist for a scenario that has no preset.
    #[error("Rules are defined for unknown scenario '{scenario}'")]
    RulesForUnknownScenario {
        /// The unknown scenario id.
        scenario: String,
    },

    /// A preset's primary shock node is not a known indicator.
    #[error("Scenario '{scenario}' has unknown primary shock node '{indicator}'")]
    UnknownShockNode {
        /// The preset.
        scenario: String,
        /// The unknown indicator id.
        indicator: String,
    },

    /// A preset lists a regime outside the known vocabulary.
    #[error("Scenario '{scenario}' applies to unknown regime '{regime}'")]
    UnknownPresetRegime {
        /// The preset.
        scenario: String,
        /// The unknown regime.
        regime: String,
    },

    /// A rule override is keyed by a regime outside the known vocabulary.
    #[error("Rule #{index} of scenario '{scenario}' overrides unknown regime '{regime}'")]
    UnknownOverrideRegime {
        /// Scenario owning the rule.
        scenario: String,
        /// Position of the rule within the scenario.
        index: usize,
        /// The unknown regime.
        regime: String,
    },

    /// A relationship edge points at an unknown indicator.
    #[error("Relationship '{relationship}' references unknown indicator '{indicator}'")]
    UnknownRelationshipEndpoint {
        /// Relationship label.
        relationship: String,
        /// The unknown indicator id.
        indicator: String,
    },

    /// Two records of one kind share an id.
    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId {
        /// Record kind.
        kind: &'static str,
        /// The repeated id.
        id: String,
    },
}

/// Failures while loading catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog document is not valid JSON for its schema.
    #[error("Failed to parse {catalog} catalog: {source}")]
    Parse {
        /// Which catalog failed.
        catalog: &'static str,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// A catalog file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Catalogs could not be serialized for fingerprinting.
    #[error("Failed to serialize catalogs: {message}")]
    Serialization {
        /// Encoder message.
        message: String,
    },

    /// The shared snapshot lock was poisoned by a panicking writer.
    #[error("Catalog snapshot lock poisoned: {context}")]
    LockPoisoned {
        /// Operation that found the poisoned lock.
        context: &'static str,
    },
}

/// Top-level error type for macroshock.
#[derive(Debug, Error)]
pub enum ShockError {
    /// A value failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The catalogs reference each other inconsistently. Carries every
    /// defect found.
    #[error("Catalog integrity error: {}", format_integrity(.0))]
    Integrity(Vec<IntegrityError>),

    /// Catalog data could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

fn format_integrity(errors: &[IntegrityError]) -> String {
    match errors {
        [] => "no defects".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

impl From<IntegrityError> for ShockError {
    fn from(err: IntegrityError) -> Self {
        Self::Integrity(vec![err])
    }
}

impl ShockError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a referential-integrity error.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    /// Returns true if this is a catalog loading error.
    #[must_use]
    pub const fn is_catalog(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }

    /// Integrity defects carried by this error, if any.
    #[must_use]
    pub fn integrity_defects(&self) -> &[IntegrityError] {
        match self {
            Self::Integrity(defects) => defects,
            _ => &[],
        }
    }
}

/// Result type alias for macroshock operations.
pub type ShockResult<T> = Result<T, ShockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_confidence() {
        let err = ValidationError::ConfidenceOutOfRange { value: 9 };
        let msg = format!("{err}");
        assert!(msg.contains('9'));
        assert!(msg.contains("out of range"));
    }

    #[test]
    fn test_validation_error_precision() {
        let err = ValidationError::PrecisionTooHigh {
            field: "strength_decimals".to_string(),
            max_decimals: 10,
        };
        let msg = format!("{err}");
        assert!(msg.contains("strength_decimals"));
        assert!(msg.contains("precision of 10 decimal places"));
        assert!(!msg.contains("length"));
    }

    #[test]
    fn test_integrity_error_names_rule() {
        let err = IntegrityError::UnknownRuleTarget {
            scenario: "fed_hike_hawkish_surprise".to_string(),
            index: 3,
            indicator: "gold".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("#3"));
        assert!(msg.contains("gold"));
    }

    #[test]
    fn test_shock_error_from_validation() {
        let err: ShockError = ValidationError::MissingField {
            field: "id".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_integrity());
        assert!(err.integrity_defects().is_empty());
    }

    #[test]
    fn test_shock_error_integrity_summary() {
        let err = ShockError::Integrity(vec![
            IntegrityError::DuplicateId {
                kind: "mechanism",
                id: "a".to_string(),
            },
            IntegrityError::DuplicateId {
                kind: "mechanism",
                id: "b".to_string(),
            },
        ]);
        assert!(err.is_integrity());
        assert_eq!(err.integrity_defects().len(), 2);
        let msg = format!("{err}");
        assert!(msg.contains("'a'"));
        assert!(msg.contains("1 more"));
    }

    #[test]
    fn test_shock_error_from_single_integrity() {
        let err: ShockError = IntegrityError::RulesForUnknownScenario {
            scenario: "nope".to_string(),
        }
        .into();
        assert_eq!(err.integrity_defects().len(), 1);
    }

    #[test]
    fn test_catalog_error_lock() {
        let err: ShockError = CatalogError::LockPoisoned { context: "replace" }.into();
        assert!(err.is_catalog());
        assert!(format!("{err}").contains("replace"));
    }
}

//! Mechanism registry.
//!
//! A mechanism is a reusable causal story ("policy path repricing",
//! "flight to quality") shared by many rules. Its templates carry
//! `{scenarioLabel}` and `{targetLabel}` placeholders that are filled in at
//! presentation time, never by the engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::IntegrityError;
use crate::id::MechanismId;
use crate::template::render_labels;

/// A reusable causal mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mechanism {
    /// Unique slug.
    pub id: MechanismId,
    /// Display name.
    pub name: String,
    /// One-line template for tooltips.
    pub tooltip_template: String,
    /// Longer explanatory template.
    pub long_template: String,
}

impl Mechanism {
    /// Renders the tooltip template with scenario and target labels.
    #[must_use]
    pub fn tooltip(&self, scenario_label: &str, target_label: &str) -> String {
        render_labels(&self.tooltip_template, scenario_label, target_label)
    }

    /// Renders the long template with scenario and target labels.
    #[must_use]
    pub fn long_text(&self, scenario_label: &str, target_label: &str) -> String {
        render_labels(&self.long_template, scenario_label, target_label)
    }
}

/// Immutable registry of mechanisms, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MechanismRegistry {
    records: Vec<Mechanism>,
    index: HashMap<MechanismId, usize>,
}

impl MechanismRegistry {
    /// Builds a registry, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns `IntegrityError::DuplicateId` for the first repeated id.
    pub fn new(records: Vec<Mechanism>) -> Result<Self, IntegrityError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, mechanism) in records.iter().enumerate() {
            if index.insert(mechanism.id.clone(), pos).is_some() {
                return Err(IntegrityError::DuplicateId {
                    kind: "mechanism",
                    id: mechanism.id.to_string(),
                });
            }
        }
        Ok(Self { records, index })
    }

    /// Looks up a mechanism by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Mechanism> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Renders a mechanism tooltip, or an empty string for an unknown id.
    #[must_use]
    pub fn render_tooltip(&self, id: &str, scenario_label: &str, target_label: &str) -> String {
        self.get(id)
            .map(|m| m.tooltip(scenario_label, target_label))
            .unwrap_or_default()
    }

    /// Mechanisms in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Mechanism> {
        self.records.iter()
    }

    /// Number of mechanisms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn records(&self) -> &[Mechanism] {
        &self.records
    }
}

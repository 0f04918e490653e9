//! Scenario presets.
//!
//! A preset names a hypothetical economic event, its shock type and default
//! direction, and the indicator where its causal effect originates. Which
//! regimes a preset is curated for is informational; rule overrides apply
//! regardless of it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IntegrityError;
use crate::id::{IndicatorId, RegimeId, ScenarioId};

/// Broad family of a shock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShockType {
    /// Central-bank action or guidance.
    Policy,
    /// Price prints.
    Inflation,
    /// Payrolls, wages and unemployment.
    Labor,
    /// Output and activity.
    Growth,
    /// Spreads and funding conditions.
    Credit,
}

impl ShockType {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Policy => "Policy",
            Self::Inflation => "Inflation",
            Self::Labor => "Labor",
            Self::Growth => "Growth",
            Self::Credit => "Credit",
        }
    }
}

impl fmt::Display for ShockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a shock direction reads as pressure or relief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionTone {
    /// Tightening, inflationary or risk-off.
    Negative,
    /// Easing, disinflationary or growth-positive.
    Positive,
}

/// Direction of the shock itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShockDirection {
    /// Tighter policy than expected.
    Hawkish,
    /// Easier policy than expected.
    Dovish,
    /// Prices hotter than expected.
    Inflationary,
    /// Prices cooler than expected.
    Disinflationary,
    /// Activity weaker than expected.
    GrowthDown,
    /// Activity stronger than expected.
    GrowthUp,
    /// Flight from risk assets.
    RiskOff,
}

impl ShockDirection {
    /// Pressure or relief.
    #[must_use]
    pub const fn tone(self) -> DirectionTone {
        match self {
            Self::Hawkish | Self::Inflationary | Self::GrowthDown | Self::RiskOff => {
                DirectionTone::Negative
            }
            Self::Dovish | Self::Disinflationary | Self::GrowthUp => DirectionTone::Positive,
        }
    }
}

/// A named hypothetical economic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPreset {
    /// Unique slug; the run context refers to presets by it.
    pub id: ScenarioId,
    /// Display title, also the scenario label in rendered templates.
    pub title: String,
    /// One-line description.
    pub description_short: String,
    /// Paragraph for non-specialists.
    pub plain_english_summary: String,
    /// Shock family.
    pub shock_type: ShockType,
    /// Direction the preset assumes.
    pub default_shock_direction: ShockDirection,
    /// 1 (small), 2 (medium) or 3 (large).
    pub default_surprise_size: i64,
    /// Indicator where the causal effect originates.
    pub primary_shock_node: IndicatorId,
    /// Regimes the preset is curated for; `None` is unrestricted.
    #[serde(default)]
    pub applies_to_regimes: Option<Vec<RegimeId>>,
}

impl ScenarioPreset {
    /// Whether the preset is curated for `regime`.
    #[must_use]
    pub fn applies_to(&self, regime: &str) -> bool {
        self.applies_to_regimes
            .as_ref()
            .map_or(true, |regimes| regimes.iter().any(|r| r == regime))
    }
}

/// Immutable catalog of presets, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetCatalog {
    records: Vec<ScenarioPreset>,
    index: HashMap<ScenarioId, usize>,
}

impl PresetCatalog {
    /// Builds a catalog, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns `IntegrityError::DuplicateId` for the first repeated id.
    pub fn new(records: Vec<ScenarioPreset>) -> Result<Self, IntegrityError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, preset) in records.iter().enumerate() {
            if index.insert(preset.id.clone(), pos).is_some() {
                return Err(IntegrityError::DuplicateId {
                    kind: "scenario",
                    id: preset.id.to_string(),
                });
            }
        }
        Ok(Self { records, index })
    }

    /// Looks up a preset; `None` is the not-found sentinel.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ScenarioPreset> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Whether `id` names a preset.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Presets of one shock type, in catalog order.
    pub fn by_shock_type(&self, shock_type: ShockType) -> impl Iterator<Item = &ScenarioPreset> {
        self.records
            .iter()
            .filter(move |preset| preset.shock_type == shock_type)
    }

    /// Presets in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ScenarioPreset> {
        self.records.iter()
    }

    /// Number of presets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn records(&self) -> &[ScenarioPreset] {
        &self.records
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn preset(id: &str, shock_node: &str) -> ScenarioPreset {
        ScenarioPreset {
            id: ScenarioId::new(id).unwrap(),
            title: format!("{id} title"),
            description_short: "short".to_string(),
            plain_english_summary: "summary".to_string(),
            shock_type: ShockType::Policy,
            default_shock_direction: ShockDirection::Hawkish,
            default_surprise_size: 2,
            primary_shock_node: IndicatorId::new(shock_node).unwrap(),
            applies_to_regimes: None,
        }
    }

    #[test]
    fn unrestricted_preset_applies_everywhere() {
        let p = preset("fed_higher_for_longer", "forward-guidance");
        assert!(p.applies_to("late_cycle"));
        assert!(p.applies_to("anything"));
    }

    #[test]
    fn restricted_preset_checks_membership() {
        let mut p = preset("fed_hike_hawkish_surprise", "fed-funds-target");
        p.applies_to_regimes = Some(vec![
            RegimeId::new("soft_landing").unwrap(),
            RegimeId::new("late_cycle").unwrap(),
        ]);
        assert!(p.applies_to("late_cycle"));
        assert!(!p.applies_to("recession_risk"));
    }

    #[test]
    fn direction_tones() {
        assert_eq!(ShockDirection::Hawkish.tone(), DirectionTone::Negative);
        assert_eq!(ShockDirection::RiskOff.tone(), DirectionTone::Negative);
        assert_eq!(ShockDirection::Dovish.tone(), DirectionTone::Positive);
        assert_eq!(ShockDirection::Disinflationary.tone(), DirectionTone::Positive);
    }

    #[test]
    fn catalog_lookup_and_filter() {
        let mut credit = preset("credit_spreads_widen_sharply", "corporate-borrowing");
        credit.shock_type = ShockType::Credit;
        let catalog = PresetCatalog::new(vec![
            preset("fed_hike_hawkish_surprise", "fed-funds-target"),
            credit,
        ])
        .unwrap();

        assert!(catalog.get("fed_hike_hawkish_surprise").is_some());
        assert!(catalog.get("does-not-exist").is_none());
        let credit_ids: Vec<_> = catalog
            .by_shock_type(ShockType::Credit)
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(credit_ids, vec!["credit_spreads_widen_sharply"]);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = PresetCatalog::new(vec![preset("a", "x"), preset("a", "y")]).unwrap_err();
        assert!(matches!(err, IntegrityError::DuplicateId { kind: "scenario", .. }));
    }
}

//! Indicator catalog.
//!
//! Indicators are the nodes of the causal network: policy instruments,
//! financial conditions, real-economy measures, inflation prints and market
//! prices. Each carries its latest hand-curated observation. Scenario runs
//! never mutate indicators; they produce impact overlays instead.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IntegrityError;
use crate::id::IndicatorId;

/// Theme an indicator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Instruments the central bank sets directly.
    PolicyInstruments,
    /// Yields, spreads and borrowing costs.
    Financial,
    /// Output, labour and spending.
    RealEconomy,
    /// Price indices.
    Inflation,
    /// Market prices and risk sentiment.
    Exogenous,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 5] = [
        Self::PolicyInstruments,
        Self::Financial,
        Self::RealEconomy,
        Self::Inflation,
        Self::Exogenous,
    ];

    /// Human-readable theme title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::PolicyInstruments => "Policy Instruments",
            Self::Financial => "Financial Conditions",
            Self::RealEconomy => "Real Economy",
            Self::Inflation => "Inflation",
            Self::Exogenous => "Market Pricing & Risk Sentiment",
        }
    }

    /// Stable slug as used in the data files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PolicyInstruments => "policy-instruments",
            Self::Financial => "financial",
            Self::RealEconomy => "real-economy",
            Self::Inflation => "inflation",
            Self::Exogenous => "exogenous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an indicator's displayed value may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Set by policy or an exogenous fact; never restated by a simulation.
    Manual,

    /// May be restated as a simulation output.
    Derived,
}

impl UpdateMode {
    /// Whether a simulation may restate the displayed value.
    #[must_use]
    pub const fn is_simulation_output(self) -> bool {
        matches!(self, Self::Derived)
    }
}

/// Tone of the latest observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Read as good news.
    Positive,
    /// Read as bad news.
    Negative,
    /// Neither.
    #[default]
    Neutral,
}

/// Latest published observation of an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Display value, already formatted (e.g. `+3.0% YoY`).
    pub value: String,

    /// Period label the value refers to (e.g. `Dec 2025`).
    pub period: String,

    /// Tone of the print; neutral when absent.
    #[serde(default)]
    pub sentiment: Sentiment,
}

/// An economic indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    /// Unique slug.
    pub id: IndicatorId,
    /// Display name.
    pub name: String,
    /// Theme the indicator is grouped under.
    pub category: Category,
    /// Unit-of-measure tag (e.g. `percent-yoy`, `index`).
    pub unit: String,
    /// Whether simulations may restate the value.
    pub update_mode: UpdateMode,
    /// Source citation for the observation.
    pub source: String,
    /// Latest observation.
    pub observation: Observation,
}

/// Immutable registry of indicators, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorCatalog {
    records: Vec<Indicator>,
    index: HashMap<IndicatorId, usize>,
}

impl IndicatorCatalog {
    /// Builds a catalog, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns `IntegrityError::DuplicateId` for the first repeated id.
    pub fn new(records: Vec<Indicator>) -> Result<Self, IntegrityError> {
        let mut index = HashMap::with_capacity(records.len());
        for (pos, indicator) in records.iter().enumerate() {
            if index.insert(indicator.id.clone(), pos).is_some() {
                return Err(IntegrityError::DuplicateId {
                    kind: "indicator",
                    id: indicator.id.to_string(),
                });
            }
        }
        Ok(Self { records, index })
    }

    /// Looks up an indicator by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Indicator> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Whether `id` is a known indicator.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Display name for an id, falling back to the raw id.
    #[must_use]
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |indicator| indicator.name.as_str())
    }

    /// Indicators of one category, in catalog order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Indicator> {
        self.records
            .iter()
            .filter(move |indicator| indicator.category == category)
    }

    /// Indicators in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.records.iter()
    }

    /// Number of indicators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no indicator.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn records(&self) -> &[Indicator] {
        &self.records
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn indicator(id: &str, category: Category) -> Indicator {
        Indicator {
            id: IndicatorId::new(id).unwrap(),
            name: id.to_uppercase(),
            category,
            unit: "percent".to_string(),
            update_mode: UpdateMode::Derived,
            source: "test".to_string(),
            observation: Observation {
                value: "1.0%".to_string(),
                period: "Jan 2026".to_string(),
                sentiment: Sentiment::Neutral,
            },
        }
    }

    #[test]
    fn lookup_and_label() {
        let catalog = IndicatorCatalog::new(vec![
            indicator("vix", Category::Exogenous),
            indicator("core-pce", Category::Inflation),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("vix"));
        assert_eq!(catalog.get("core-pce").unwrap().category, Category::Inflation);
        assert!(catalog.get("gold").is_none());
        assert_eq!(catalog.label("vix"), "VIX");
        assert_eq!(catalog.label("gold"), "gold");
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = IndicatorCatalog::new(vec![
            indicator("vix", Category::Exogenous),
            indicator("vix", Category::Exogenous),
        ])
        .unwrap_err();
        assert!(matches!(err, IntegrityError::DuplicateId { kind: "indicator", .. }));
    }

    #[test]
    fn by_category_keeps_order() {
        let catalog = IndicatorCatalog::new(vec![
            indicator("dow", Category::Exogenous),
            indicator("core-cpi", Category::Inflation),
            indicator("vix", Category::Exogenous),
        ])
        .unwrap();

        let ids: Vec<_> = catalog
            .by_category(Category::Exogenous)
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["dow", "vix"]);
    }

    #[test]
    fn category_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Category::PolicyInstruments).unwrap();
        assert_eq!(json, "\"policy-instruments\"");
        for category in Category::ALL {
            let round: Category =
                serde_json::from_str(&format!("\"{}\"", category.as_str())).unwrap();
            assert_eq!(round, category);
        }
    }

    #[test]
    fn derived_indicators_are_simulation_outputs() {
        assert!(UpdateMode::Derived.is_simulation_output());
        assert!(!UpdateMode::Manual.is_simulation_output());
    }
}

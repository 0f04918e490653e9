//! Static catalog bundle, loading and referential-integrity checks.
//!
//! All data the engine consumes lives in five JSON documents:
//! `indicators.json`, `mechanisms.json`, `rules.json`, `scenarios.json` and
//! (optionally) `relationships.json`. The built-in set is embedded at
//! compile time. Any validation or integrity defect is a fatal
//! initialization error. A set shared through [`CatalogHandle`] is never
//! mutated in place; [`CatalogHandle::replace`] re-runs every check before
//! swapping a new set in.

use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CatalogError, IntegrityError, ShockError, ShockResult};
use crate::id::KNOWN_REGIMES;
use crate::indicator::{Indicator, IndicatorCatalog};
use crate::mechanism::{Mechanism, MechanismRegistry};
use crate::relationship::{Relationship, RelationshipGraph};
use crate::rule::RuleSet;
use crate::scenario::{PresetCatalog, ScenarioPreset};

const BUILTIN_INDICATORS: &str = include_str!("../data/indicators.json");
const BUILTIN_MECHANISMS: &str = include_str!("../data/mechanisms.json");
const BUILTIN_RULES: &str = include_str!("../data/rules.json");
const BUILTIN_SCENARIOS: &str = include_str!("../data/scenarios.json");
const BUILTIN_RELATIONSHIPS: &str = include_str!("../data/relationships.json");

/// Raw JSON documents making up a catalog set.
#[derive(Debug, Clone, Copy)]
pub struct CatalogDocuments<'a> {
    /// `indicators.json`: array of indicators.
    pub indicators: &'a str,
    /// `mechanisms.json`: array of mechanisms.
    pub mechanisms: &'a str,
    /// `rules.json`: scenario id to rule list.
    pub rules: &'a str,
    /// `scenarios.json`: array of presets.
    pub scenarios: &'a str,
    /// `relationships.json`, if the set has a relationship graph.
    pub relationships: Option<&'a str>,
}

impl CatalogDocuments<'static> {
    /// The documents embedded in the crate.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            indicators: BUILTIN_INDICATORS,
            mechanisms: BUILTIN_MECHANISMS,
            rules: BUILTIN_RULES,
            scenarios: BUILTIN_SCENARIOS,
            relationships: Some(BUILTIN_RELATIONSHIPS),
        }
    }
}

fn parse<T: DeserializeOwned>(catalog: &'static str, text: &str) -> Result<T, CatalogError> {
    serde_json::from_str(text).map_err(|source| CatalogError::Parse { catalog, source })
}

fn read_file(dir: &Path, name: &str) -> Result<String, CatalogError> {
    let path = dir.join(name);
    fs::read_to_string(&path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Every static collaborator of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogs {
    /// Indicator records.
    pub indicators: IndicatorCatalog,
    /// Mechanism records.
    pub mechanisms: MechanismRegistry,
    /// Impact rules per scenario.
    pub rules: RuleSet,
    /// Scenario presets.
    pub presets: PresetCatalog,
    /// Indicator-to-indicator edges; may be empty.
    pub relationships: RelationshipGraph,
}

#[derive(Serialize)]
struct CanonicalView<'a> {
    indicators: &'a [Indicator],
    mechanisms: &'a [Mechanism],
    rules: &'a RuleSet,
    scenarios: &'a [ScenarioPreset],
    relationships: &'a [Relationship],
}

impl Catalogs {
    /// Assembles and validates a catalog set.
    ///
    /// # Errors
    ///
    /// - `ShockError::Validation` if a rule carries a non-finite or negative magnitude.
    /// - `ShockError::Integrity` listing every dangling reference.
    pub fn new(
        indicators: IndicatorCatalog,
        mechanisms: MechanismRegistry,
        rules: RuleSet,
        presets: PresetCatalog,
        relationships: RelationshipGraph,
    ) -> ShockResult<Self> {
        let catalogs = Self {
            indicators,
            mechanisms,
            rules,
            presets,
            relationships,
        };
        catalogs.validate()?;
        Ok(catalogs)
    }

    /// Runs every check a catalog set must pass: per-rule magnitude
    /// validation first, then referential integrity.
    ///
    /// # Errors
    ///
    /// - `ShockError::Validation` for the first rule with a non-finite or negative magnitude.
    /// - `ShockError::Integrity` listing every dangling reference.
    pub fn validate(&self) -> ShockResult<()> {
        for (scenario, scenario_rules) in self.rules.iter() {
            for rule in scenario_rules {
                rule.validate().inspect_err(|err| {
                    tracing::warn!(%scenario, error = %err, "catalog rule rejected");
                })?;
            }
        }

        let defects = self.integrity_defects();
        if !defects.is_empty() {
            tracing::warn!(count = defects.len(), first = %defects[0], "catalog integrity check failed");
            return Err(ShockError::Integrity(defects));
        }
        Ok(())
    }

    /// Parses and validates a catalog set from JSON documents.
    ///
    /// # Errors
    ///
    /// Returns `ShockError::Catalog` for malformed JSON, otherwise the errors of [`Catalogs::new`].
    pub fn from_documents(docs: CatalogDocuments<'_>) -> ShockResult<Self> {
        let indicators = IndicatorCatalog::new(parse("indicators", docs.indicators)?)?;
        let mechanisms = MechanismRegistry::new(parse("mechanisms", docs.mechanisms)?)?;
        let rules: RuleSet = parse("rules", docs.rules)?;
        let presets = PresetCatalog::new(parse("scenarios", docs.scenarios)?)?;
        let relationships = match docs.relationships {
            Some(text) => RelationshipGraph::new(parse("relationships", text)?)?,
            None => RelationshipGraph::default(),
        };

        let catalogs = Self::new(indicators, mechanisms, rules, presets, relationships)?;
        let fingerprint = catalogs.fingerprint()?;
        tracing::info!(
            %fingerprint,
            indicators = catalogs.indicators.len(),
            mechanisms = catalogs.mechanisms.len(),
            rules = catalogs.rules.rule_count(),
            scenarios = catalogs.presets.len(),
            "catalogs loaded"
        );
        Ok(catalogs)
    }

    /// The catalogs embedded in the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded data is defective, which the test suite rules out.
    pub fn builtin() -> ShockResult<Self> {
        Self::from_documents(CatalogDocuments::builtin())
    }

    /// Loads catalogs from a directory holding the five JSON files.
    /// `relationships.json` may be absent.
    ///
    /// # Errors
    ///
    /// Returns `ShockError::Catalog` if a required file cannot be read, otherwise
    /// the errors of [`Catalogs::from_documents`].
    pub fn load_dir(dir: impl AsRef<Path>) -> ShockResult<Self> {
        let dir = dir.as_ref();
        let indicators = read_file(dir, "indicators.json")?;
        let mechanisms = read_file(dir, "mechanisms.json")?;
        let rules = read_file(dir, "rules.json")?;
        let scenarios = read_file(dir, "scenarios.json")?;
        let relationships = if dir.join("relationships.json").exists() {
            Some(read_file(dir, "relationships.json")?)
        } else {
            None
        };

        tracing::debug!(dir = %dir.display(), "loading catalogs from directory");
        Self::from_documents(CatalogDocuments {
            indicators: &indicators,
            mechanisms: &mechanisms,
            rules: &rules,
            scenarios: &scenarios,
            relationships: relationships.as_deref(),
        })
    }

    /// Every dangling cross-reference in the set, in a stable order.
    #[must_use]
    pub fn integrity_defects(&self) -> Vec<IntegrityError> {
        let mut defects = Vec::new();

        for preset in self.presets.iter() {
            if !self.indicators.contains(preset.primary_shock_node.as_str()) {
                defects.push(IntegrityError::UnknownShockNode {
                    scenario: preset.id.to_string(),
                    indicator: preset.primary_shock_node.to_string(),
                });
            }
            for regime in preset.applies_to_regimes.iter().flatten() {
                if !KNOWN_REGIMES.contains(&regime.as_str()) {
                    defects.push(IntegrityError::UnknownPresetRegime {
                        scenario: preset.id.to_string(),
                        regime: regime.to_string(),
                    });
                }
            }
        }

        for (scenario, rules) in self.rules.iter() {
            if !self.presets.contains(scenario.as_str()) {
                defects.push(IntegrityError::RulesForUnknownScenario {
                    scenario: scenario.to_string(),
                });
            }
            for (index, rule) in rules.iter().enumerate() {
                if !self.indicators.contains(rule.target_indicator_id.as_str()) {
                    defects.push(IntegrityError::UnknownRuleTarget {
                        scenario: scenario.to_string(),
                        index,
                        indicator: rule.target_indicator_id.to_string(),
                    });
                }
                if !self.mechanisms.contains(rule.mechanism.as_str()) {
                    defects.push(IntegrityError::UnknownRuleMechanism {
                        scenario: scenario.to_string(),
                        index,
                        mechanism: rule.mechanism.to_string(),
                    });
                }
                for regime in rule.regime_overrides.keys() {
                    if !KNOWN_REGIMES.contains(&regime.as_str()) {
                        defects.push(IntegrityError::UnknownOverrideRegime {
                            scenario: scenario.to_string(),
                            index,
                            regime: regime.to_string(),
                        });
                    }
                }
            }
        }

        for edge in self.relationships.iter() {
            for endpoint in [&edge.source, &edge.target] {
                if !self.indicators.contains(endpoint.as_str()) {
                    defects.push(IntegrityError::UnknownRelationshipEndpoint {
                        relationship: edge.id.clone(),
                        indicator: endpoint.to_string(),
                    });
                }
            }
        }

        defects
    }

    /// Content hash of the canonical JSON form, identifying the data version.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Serialization` if the canonical form cannot be produced.
    pub fn fingerprint(&self) -> Result<String, CatalogError> {
        let view = CanonicalView {
            indicators: self.indicators.records(),
            mechanisms: self.mechanisms.records(),
            rules: &self.rules,
            scenarios: self.presets.records(),
            relationships: self.relationships.records(),
        };
        let bytes = serde_json::to_vec(&view).map_err(|e| CatalogError::Serialization {
            message: e.to_string(),
        })?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}

/// Shared, swappable catalog snapshot.
///
/// Readers take an `Arc` snapshot and keep it for a whole scenario run, so
/// a concurrent [`CatalogHandle::replace`] never changes data mid-run.
#[derive(Debug)]
pub struct CatalogHandle {
    current: RwLock<Arc<Catalogs>>,
}

impl CatalogHandle {
    /// Wraps an already validated set.
    #[must_use]
    pub fn new(catalogs: Catalogs) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalogs)),
        }
    }

    /// The current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::LockPoisoned` if a writer panicked.
    pub fn snapshot(&self) -> Result<Arc<Catalogs>, CatalogError> {
        let guard = self
            .current
            .read()
            .map_err(|_| CatalogError::LockPoisoned { context: "snapshot" })?;
        Ok(Arc::clone(&guard))
    }

    /// Swaps in a new catalog set after re-running [`Catalogs::validate`]
    /// and returns the previous snapshot. Runs holding the old snapshot are
    /// unaffected.
    ///
    /// # Errors
    ///
    /// Returns `ShockError::Validation` or `ShockError::Integrity` if the new
    /// set is defective (the current set stays in place), or
    /// `CatalogError::LockPoisoned`.
    pub fn replace(&self, catalogs: Catalogs) -> ShockResult<Arc<Catalogs>> {
        catalogs.validate()?;
        let fingerprint = catalogs.fingerprint()?;
        let mut guard = self
            .current
            .write()
            .map_err(|_| CatalogError::LockPoisoned { context: "replace" })?;
        let previous = std::mem::replace(&mut *guard, Arc::new(catalogs));
        tracing::info!(%fingerprint, "catalogs replaced");
        Ok(previous)
    }
}

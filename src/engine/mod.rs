//! Scenario evaluation engine.
//!
//! `run_scenario` is a pure function of a run context and the static
//! catalogs: it performs no I/O, holds no mutable state and never fails.
//! Identical inputs always yield identical output, field for field and in
//! the same order.

mod ordering;
mod resolve;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalogs;
use crate::context::ScenarioRunContext;
use crate::error::{CatalogError, ShockResult, ValidationError};
use crate::id::{IndicatorId, MechanismId};
use crate::rule::{ImpactConfidence, LagBucket, Sign};

pub use ordering::is_ordered;
pub use resolve::MISSING_TEMPLATE;

/// Rounds `value` to `decimals` places, halves away from zero.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    (value * scale).round() / scale
}

/// Tunable constants of the resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Strength multiplier when the market already priced the shock in.
    pub priced_in_dampening: f64,
    /// Strength multiplier for trend-confirming shocks.
    pub trend_confirming_boost: f64,
    /// Decimal places of the reported strength.
    pub strength_decimals: u32,
}

impl EngineConfig {
    /// Default priced-in multiplier.
    pub const DEFAULT_DAMPENING: f64 = 0.3;
    /// Default trend-confirming multiplier.
    pub const DEFAULT_BOOST: f64 = 1.15;
    /// Largest accepted `strength_decimals`.
    pub const MAX_DECIMALS: u32 = 10;

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidMagnitude` for a non-finite or negative
    /// factor and `ValidationError::PrecisionTooHigh` when `strength_decimals`
    /// exceeds [`Self::MAX_DECIMALS`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("priced_in_dampening", self.priced_in_dampening),
            ("trend_confirming_boost", self.trend_confirming_boost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidMagnitude {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if self.strength_decimals > Self::MAX_DECIMALS {
            return Err(ValidationError::PrecisionTooHigh {
                field: "strength_decimals".to_string(),
                max_decimals: Self::MAX_DECIMALS,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            priced_in_dampening: Self::DEFAULT_DAMPENING,
            trend_confirming_boost: Self::DEFAULT_BOOST,
            strength_decimals: 2,
        }
    }
}

/// Where an impact's explanation text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    /// The rule's template, copied verbatim.
    StaticTemplate,
}

/// One predicted impact on one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedImpact {
    /// Indicator the impact lands on.
    pub target_indicator_id: IndicatorId,
    /// Direction after any regime override.
    pub sign: Sign,
    /// Rounded to the configured precision (two decimals by default).
    pub strength: f64,
    /// Horizon after any regime override.
    pub lag: LagBucket,
    /// Confidence after any regime override.
    pub confidence: ImpactConfidence,
    /// Causal mechanism behind the rule.
    pub mechanism: MechanismId,
    /// Rule template, or [`MISSING_TEMPLATE`].
    pub explanation_short: String,
    /// Origin of `explanation_short`.
    pub explanation_source: ExplanationSource,
    /// Human-readable audit trail of the modifiers applied, in order.
    pub reasons_applied: Vec<String>,
}

/// Output of one scenario evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// The context the result was computed for, echoed back.
    pub context: ScenarioRunContext,
    /// Sorted by lag rank, then strength descending; ties keep rule order.
    pub impacts: Vec<ComputedImpact>,
}

impl ScenarioResult {
    /// An empty result for `context`.
    #[must_use]
    pub fn empty(context: ScenarioRunContext) -> Self {
        Self {
            context,
            impacts: Vec::new(),
        }
    }

    /// Whether no impact was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.impacts.is_empty()
    }

    /// Impacts targeting `indicator`, in result order.
    pub fn impacts_on<'a>(&'a self, indicator: &'a str) -> impl Iterator<Item = &'a ComputedImpact> {
        self.impacts
            .iter()
            .filter(move |impact| impact.target_indicator_id == indicator)
    }
}

/// Evaluates a scenario with the default configuration.
#[must_use]
pub fn run_scenario(catalogs: &Catalogs, context: ScenarioRunContext) -> ScenarioResult {
    run_scenario_with(catalogs, &EngineConfig::default(), context)
}

/// Evaluates a scenario with an explicit configuration.
///
/// An unknown scenario id, or a scenario without rules, yields an empty
/// impact list.
#[must_use]
pub fn run_scenario_with(
    catalogs: &Catalogs,
    config: &EngineConfig,
    context: ScenarioRunContext,
) -> ScenarioResult {
    let rules = catalogs.rules.rules_for(&context.scenario_id);
    if catalogs.presets.get(&context.scenario_id).is_none() || rules.is_empty() {
        tracing::debug!(scenario = %context.scenario_id, "no preset or rules; empty result");
        return ScenarioResult::empty(context);
    }

    let mut impacts: Vec<ComputedImpact> = rules
        .iter()
        .map(|rule| resolve::resolve_rule(rule, &context, config))
        .collect();
    ordering::sort_impacts(&mut impacts);

    tracing::debug!(
        scenario = %context.scenario_id,
        surprise = context.surprise_size,
        regime = %context.regime,
        priced_in = context.market_already_priced_in,
        persistence = %context.persistence,
        impacts = impacts.len(),
        "scenario evaluated"
    );
    ScenarioResult { context, impacts }
}

/// Engine bound to one catalog snapshot.
#[derive(Debug, Clone)]
pub struct ScenarioEngine {
    catalogs: Arc<Catalogs>,
    config: EngineConfig,
}

impl ScenarioEngine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        Self {
            catalogs,
            config: EngineConfig::default(),
        }
    }

    /// Creates an engine with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `ShockError::Validation` if the configuration is invalid.
    pub fn with_config(catalogs: Arc<Catalogs>, config: EngineConfig) -> ShockResult<Self> {
        config.validate()?;
        Ok(Self { catalogs, config })
    }

    /// Engine over the built-in catalogs.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded catalogs are defective.
    pub fn builtin() -> ShockResult<Self> {
        Ok(Self::new(Arc::new(Catalogs::builtin()?)))
    }

    /// The catalog snapshot this engine evaluates against.
    #[must_use]
    pub fn catalogs(&self) -> &Arc<Catalogs> {
        &self.catalogs
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Content hash of the catalogs this engine evaluates against.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Serialization` if the catalogs cannot be serialized.
    pub fn catalog_fingerprint(&self) -> Result<String, CatalogError> {
        self.catalogs.fingerprint()
    }

    /// Evaluates a scenario.
    #[must_use]
    pub fn run(&self, context: ScenarioRunContext) -> ScenarioResult {
        run_scenario_with(&self.catalogs, &self.config, context)
    }
}

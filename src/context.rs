//! Scenario run context.
//!
//! The context is the engine's only per-call input. It is a plain value:
//! built once per evaluation and never mutated afterwards. Out-of-range
//! inputs are resolved leniently: an unmapped surprise size scales as
//! medium and an unknown persistence mode applies no boost. On the wire a
//! surprise size that is not the number 1, 2 or 3 (a string, `null`, a
//! fraction) reads as 2.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::rule::SurpriseKey;
use crate::scenario::ScenarioPreset;

/// Regime label meaning "no particular regime".
pub const NO_REGIME: &str = "none";

/// Surprise size used when none is given or the given one is unusable.
pub const DEFAULT_SURPRISE_SIZE: i64 = 2;

/// Whether the shock is a one-off or confirms an existing trend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Persistence {
    /// `one_off`: no boost.
    #[default]
    OneOff,
    /// `trend_confirming`: the persistence boost applies.
    TrendConfirming,
    /// Any other label; treated like a one-off.
    Unrecognized(String),
}

impl Persistence {
    /// Whether the trend-confirming strength boost applies.
    #[must_use]
    pub const fn is_trend_confirming(&self) -> bool {
        matches!(self, Self::TrendConfirming)
    }

    /// Wire label, verbatim for unrecognized modes.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::OneOff => "one_off",
            Self::TrendConfirming => "trend_confirming",
            Self::Unrecognized(other) => other,
        }
    }
}

impl From<String> for Persistence {
    fn from(value: String) -> Self {
        match value.as_str() {
            "one_off" => Self::OneOff,
            "trend_confirming" => Self::TrendConfirming,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for Persistence {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Persistence> for String {
    fn from(p: Persistence) -> Self {
        match p {
            Persistence::Unrecognized(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of one scenario evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRunContext {
    /// Scenario preset to evaluate. Unknown ids produce an empty result.
    pub scenario_id: String,
    /// 1 (small), 2 (medium) or 3 (large); anything else scales as medium.
    #[serde(
        default = "default_surprise_size",
        deserialize_with = "lenient_surprise_size"
    )]
    pub surprise_size: i64,
    /// Regime label matched against rule overrides.
    pub regime: String,
    /// Dampens every impact when set.
    pub market_already_priced_in: bool,
    /// Trend-confirming shocks get the persistence boost.
    pub persistence: Persistence,
}

const fn default_surprise_size() -> i64 {
    DEFAULT_SURPRISE_SIZE
}

fn lenient_surprise_size<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(surprise_size_from_value(&value))
}

/// Integral 1 and 3 (`3` or `3.0`) keep their size; everything else is 2.
#[allow(clippy::float_cmp)]
fn surprise_size_from_value(value: &Value) -> i64 {
    match value.as_f64() {
        Some(size) if size == 1.0 => 1,
        Some(size) if size == 3.0 => 3,
        _ => DEFAULT_SURPRISE_SIZE,
    }
}

impl ScenarioRunContext {
    /// Starts a builder for `scenario_id` with neutral modifiers.
    #[must_use]
    pub fn builder(scenario_id: impl Into<String>) -> ScenarioRunBuilder {
        ScenarioRunBuilder::new(scenario_id)
    }

    /// Context using a preset's default surprise size and neutral modifiers.
    #[must_use]
    pub fn for_preset(preset: &ScenarioPreset) -> Self {
        ScenarioRunBuilder::new(preset.id.as_str())
            .surprise_size(preset.default_surprise_size)
            .build()
    }

    /// Scaling key the surprise size resolves to.
    #[must_use]
    pub const fn surprise_key(&self) -> SurpriseKey {
        SurpriseKey::from_size(self.surprise_size)
    }
}

/// Builder for [`ScenarioRunContext`].
#[derive(Debug, Clone)]
pub struct ScenarioRunBuilder {
    scenario_id: String,
    surprise_size: i64,
    regime: String,
    market_already_priced_in: bool,
    persistence: Persistence,
}

impl ScenarioRunBuilder {
    /// Size 2, no regime, not priced in, one-off.
    #[must_use]
    pub fn new(scenario_id: impl Into<String>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            surprise_size: DEFAULT_SURPRISE_SIZE,
            regime: NO_REGIME.to_string(),
            market_already_priced_in: false,
            persistence: Persistence::OneOff,
        }
    }

    /// Kept as given; unmapped sizes scale as medium.
    #[must_use]
    pub fn surprise_size(mut self, size: i64) -> Self {
        self.surprise_size = size;
        self
    }

    /// Regime label, free-form.
    #[must_use]
    pub fn regime(mut self, regime: impl Into<String>) -> Self {
        self.regime = regime.into();
        self
    }

    /// Sets `market_already_priced_in`.
    #[must_use]
    pub fn priced_in(mut self, priced_in: bool) -> Self {
        self.market_already_priced_in = priced_in;
        self
    }

    /// Accepts a [`Persistence`] or its wire label.
    #[must_use]
    pub fn persistence(mut self, persistence: impl Into<Persistence>) -> Self {
        self.persistence = persistence.into();
        self
    }

    /// Finishes the context.
    #[must_use]
    pub fn build(self) -> ScenarioRunContext {
        ScenarioRunContext {
            scenario_id: self.scenario_id,
            surprise_size: self.surprise_size,
            regime: self.regime,
            market_already_priced_in: self.market_already_priced_in,
            persistence: self.persistence,
        }
    }
}

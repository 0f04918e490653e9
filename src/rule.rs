//! Causal impact rules.
//!
//! A rule links a scenario to one affected indicator with a base sign,
//! strength, lag and confidence. Rules may carry per-regime overrides and
//! per-surprise-size scaling factors; the engine resolves these against a
//! run context. Rules are identified only by their position within their
//! scenario's list.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{IndicatorId, MechanismId, RegimeId, ScenarioId};

/// Direction of an impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    /// The indicator rises.
    Up,
    /// The indicator falls.
    Down,
    /// Direction depends on which force dominates.
    Mixed,
}

impl Sign {
    /// +1 for up, -1 for down, 0 for mixed.
    #[must_use]
    pub const fn direction(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
            Self::Mixed => 0.0,
        }
    }

    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approximate delay between the shock and its effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LagBucket {
    /// Minutes to days.
    Immediate,
    /// Days to weeks.
    Short,
    /// Weeks to months.
    Medium,
    /// Months and beyond.
    Long,
}

/// Calendar window covered by a lag bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagHorizon {
    /// Earliest expected effect.
    pub from: Duration,
    /// Latest expected effect; `None` is open-ended.
    pub to: Option<Duration>,
}

impl LagBucket {
    /// All buckets in rank order.
    pub const ALL: [Self; 4] = [Self::Immediate, Self::Short, Self::Medium, Self::Long];

    /// Sort rank: immediate=0 < short=1 < medium=2 < long=3.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Immediate => 0,
            Self::Short => 1,
            Self::Medium => 2,
            Self::Long => 3,
        }
    }

    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// Approximate calendar window of the bucket.
    #[must_use]
    pub fn horizon(self) -> LagHorizon {
        match self {
            Self::Immediate => LagHorizon {
                from: Duration::zero(),
                to: Some(Duration::days(2)),
            },
            Self::Short => LagHorizon {
                from: Duration::weeks(1),
                to: Some(Duration::weeks(4)),
            },
            Self::Medium => LagHorizon {
                from: Duration::days(30),
                to: Some(Duration::days(182)),
            },
            Self::Long => LagHorizon {
                from: Duration::days(182),
                to: None,
            },
        }
    }
}

impl fmt::Display for LagBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Curator confidence in a rule, on a 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ImpactConfidence(u8);

impl ImpactConfidence {
    /// Lowest confidence.
    pub const MIN: u8 = 1;
    /// Highest confidence.
    pub const MAX: u8 = 5;

    /// Creates a confidence level.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ConfidenceOutOfRange` outside 1..=5.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::ConfidenceOutOfRange { value })
        }
    }

    /// The level as a plain integer.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ImpactConfidence {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImpactConfidence> for u8 {
    fn from(c: ImpactConfidence) -> Self {
        c.0
    }
}

impl fmt::Display for ImpactConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Partial replacement of a rule's base values under a regime.
///
/// Absent fields leave the base value untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegimeOverride {
    /// Replacement sign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<Sign>,
    /// Replacement base strength, applied before scaling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    /// Replacement lag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lag: Option<LagBucket>,
    /// Replacement confidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ImpactConfidence>,
}

impl RegimeOverride {
    /// Sets the replacement sign.
    #[must_use]
    pub fn sign(mut self, sign: Sign) -> Self {
        self.sign = Some(sign);
        self
    }

    /// Sets the replacement strength.
    #[must_use]
    pub fn strength(mut self, strength: f64) -> Self {
        self.strength = Some(strength);
        self
    }

    /// Sets the replacement lag.
    #[must_use]
    pub fn lag(mut self, lag: LagBucket) -> Self {
        self.lag = Some(lag);
        self
    }

    /// Sets the replacement confidence.
    #[must_use]
    pub fn confidence(mut self, confidence: ImpactConfidence) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Surprise magnitude bucket used to pick a scaling factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurpriseKey {
    /// Size 1.
    Small,
    /// Size 2, and any unmapped size.
    Medium,
    /// Size 3.
    Large,
}

impl SurpriseKey {
    /// Maps a surprise size to its key: 1 → small, 2 → medium, 3 → large.
    /// Any other value resolves as medium.
    #[must_use]
    pub const fn from_size(size: i64) -> Self {
        match size {
            1 => Self::Small,
            3 => Self::Large,
            _ => Self::Medium,
        }
    }

    /// Wire label, also used in the audit trail.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for SurpriseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-surprise-size strength multipliers. Missing keys leave strength as is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurpriseScaling {
    /// Factor for size 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<f64>,
    /// Factor for size 2 and unmapped sizes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<f64>,
    /// Factor for size 3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<f64>,
}

impl SurpriseScaling {
    /// Scaling with all three factors set.
    #[must_use]
    pub const fn new(small: f64, medium: f64, large: f64) -> Self {
        Self {
            small: Some(small),
            medium: Some(medium),
            large: Some(large),
        }
    }

    /// Factor for `key`, if one is set.
    #[must_use]
    pub const fn factor(&self, key: SurpriseKey) -> Option<f64> {
        match key {
            SurpriseKey::Small => self.small,
            SurpriseKey::Medium => self.medium,
            SurpriseKey::Large => self.large,
        }
    }

    fn factors(&self) -> impl Iterator<Item = (SurpriseKey, f64)> + '_ {
        [SurpriseKey::Small, SurpriseKey::Medium, SurpriseKey::Large]
            .into_iter()
            .filter_map(|key| self.factor(key).map(|f| (key, f)))
    }
}

/// A static causal link from a scenario to one affected indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRule {
    /// Indicator the rule moves.
    pub target_indicator_id: IndicatorId,
    /// Base direction.
    pub sign: Sign,
    /// Nominal range 0..=5.
    pub strength: f64,
    /// Base horizon.
    pub lag: LagBucket,
    /// Base confidence.
    pub confidence: ImpactConfidence,
    /// Replacements keyed by regime.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub regime_overrides: BTreeMap<RegimeId, RegimeOverride>,
    /// Strength multipliers by surprise size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surprise_scaling: Option<SurpriseScaling>,
    /// Causal mechanism cited for the rule.
    pub mechanism: MechanismId,
    /// Short explanation with `{scenarioLabel}` and `{targetLabel}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation_template: Option<String>,
}

fn validate_magnitude(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidMagnitude {
            field: field.into(),
            value,
        })
    }
}

impl ImpactRule {
    /// Creates a rule with no overrides, no scaling and no explanation.
    #[must_use]
    pub fn new(
        target_indicator_id: IndicatorId,
        sign: Sign,
        strength: f64,
        lag: LagBucket,
        confidence: ImpactConfidence,
        mechanism: MechanismId,
    ) -> Self {
        Self {
            target_indicator_id,
            sign,
            strength,
            lag,
            confidence,
            regime_overrides: BTreeMap::new(),
            surprise_scaling: None,
            mechanism,
            explanation_template: None,
        }
    }

    /// Adds or replaces the override for `regime`.
    #[must_use]
    pub fn with_regime_override(mut self, regime: RegimeId, over: RegimeOverride) -> Self {
        self.regime_overrides.insert(regime, over);
        self
    }

    /// Sets the surprise scaling.
    #[must_use]
    pub fn with_surprise_scaling(mut self, scaling: SurpriseScaling) -> Self {
        self.surprise_scaling = Some(scaling);
        self
    }

    /// Sets the explanation template.
    #[must_use]
    pub fn with_explanation(mut self, template: impl Into<String>) -> Self {
        self.explanation_template = Some(template.into());
        self
    }

    /// Checks that every magnitude in the rule is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidMagnitude` naming the offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_magnitude("strength", self.strength)?;
        for (regime, over) in &self.regime_overrides {
            if let Some(strength) = over.strength {
                validate_magnitude(format!("regime_overrides.{regime}.strength"), strength)?;
            }
        }
        if let Some(scaling) = &self.surprise_scaling {
            for (key, factor) in scaling.factors() {
                validate_magnitude(format!("surprise_scaling.{key}"), factor)?;
            }
        }
        Ok(())
    }
}

/// Rules grouped by scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(BTreeMap<ScenarioId, Vec<ImpactRule>>);

impl RuleSet {
    /// Wraps rule lists keyed by scenario.
    #[must_use]
    pub fn new(rules: BTreeMap<ScenarioId, Vec<ImpactRule>>) -> Self {
        Self(rules)
    }

    /// Rules for a scenario; empty when the scenario has none.
    #[must_use]
    pub fn rules_for(&self, scenario_id: &str) -> &[ImpactRule] {
        self.0.get(scenario_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Adds a rule to the end of a scenario's list.
    pub fn push(&mut self, scenario_id: ScenarioId, rule: ImpactRule) {
        self.0.entry(scenario_id).or_default().push(rule);
    }

    /// Scenarios and their rules, ordered by scenario id.
    pub fn iter(&self) -> impl Iterator<Item = (&ScenarioId, &[ImpactRule])> {
        self.0.iter().map(|(id, rules)| (id, rules.as_slice()))
    }

    /// Total number of rules across all scenarios.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Whether no scenario has rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

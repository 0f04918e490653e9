//! Per-rule resolution.
//!
//! Each rule is resolved independently: seed from the base values, apply a
//! matching regime override, then scale, dampen and boost the strength in
//! that order, recording one audit line per step that fired.

use crate::context::ScenarioRunContext;
use crate::rule::ImpactRule;

use super::{round_to, ComputedImpact, EngineConfig, ExplanationSource};

/// Explanation used when a rule carries no template.
pub const MISSING_TEMPLATE: &str = "(no template)";

pub(crate) fn resolve_rule(
    rule: &ImpactRule,
    ctx: &ScenarioRunContext,
    config: &EngineConfig,
) -> ComputedImpact {
    let mut sign = rule.sign;
    let mut strength = rule.strength;
    let mut lag = rule.lag;
    let mut confidence = rule.confidence;
    let mut reasons = vec![format!(
        "base: sign={sign}, strength={strength}, lag={lag}, confidence={confidence}"
    )];

    if let Some(over) = rule.regime_overrides.get(ctx.regime.as_str()) {
        if let Some(s) = over.sign {
            sign = s;
        }
        if let Some(s) = over.strength {
            strength = s;
        }
        if let Some(l) = over.lag {
            lag = l;
        }
        if let Some(c) = over.confidence {
            confidence = c;
        }
        reasons.push(format!("regime override applied: {}", ctx.regime));
    }

    let key = ctx.surprise_key();
    if let Some(factor) = rule.surprise_scaling.and_then(|s| s.factor(key)) {
        strength *= factor;
        reasons.push(format!("surprise scaling: {key} (×{factor})"));
    }

    if ctx.market_already_priced_in {
        strength *= config.priced_in_dampening;
        reasons.push(format!(
            "dampened: market already priced in (×{})",
            config.priced_in_dampening
        ));
    }

    if ctx.persistence.is_trend_confirming() {
        strength *= config.trend_confirming_boost;
        reasons.push(format!(
            "persistence boost: trend_confirming (×{})",
            config.trend_confirming_boost
        ));
    }

    let strength = round_to(strength, config.strength_decimals);
    tracing::trace!(target_indicator = %rule.target_indicator_id, strength, "rule resolved");

    ComputedImpact {
        target_indicator_id: rule.target_indicator_id.clone(),
        sign,
        strength,
        lag,
        confidence,
        mechanism: rule.mechanism.clone(),
        explanation_short: rule
            .explanation_template
            .clone()
            .unwrap_or_else(|| MISSING_TEMPLATE.to_string()),
        explanation_source: ExplanationSource::StaticTemplate,
        reasons_applied: reasons,
    }
}

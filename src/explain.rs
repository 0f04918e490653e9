//! Human-facing explanations for computed impacts.
//!
//! The engine copies rule templates verbatim. Filling in scenario and
//! target labels happens here, on demand, against the same catalog
//! snapshot the result was computed from.

use serde::Serialize;

use crate::catalog::Catalogs;
use crate::engine::ComputedImpact;
use crate::template::render_labels;

/// Rendered explanation of one impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactExplanation {
    /// Mechanism display name; empty if the mechanism is unknown.
    pub mechanism_name: String,
    /// Mechanism tooltip with labels substituted.
    pub tooltip: String,
    /// Mechanism long text with labels substituted.
    pub long_text: String,
    /// The rule's own explanation with labels substituted.
    pub rule_text: String,
}

/// Renders the explanation of `impact` produced by scenario `scenario_id`.
///
/// Unknown scenario or indicator ids fall back to the raw id as label; an
/// unknown mechanism yields empty mechanism texts.
#[must_use]
pub fn explain_impact(
    catalogs: &Catalogs,
    scenario_id: &str,
    impact: &ComputedImpact,
) -> ImpactExplanation {
    let scenario_label = catalogs
        .presets
        .get(scenario_id)
        .map_or(scenario_id, |preset| preset.title.as_str());
    let target_label = catalogs.indicators.label(impact.target_indicator_id.as_str());

    let (mechanism_name, tooltip, long_text) = catalogs
        .mechanisms
        .get(impact.mechanism.as_str())
        .map(|m| {
            (
                m.name.clone(),
                m.tooltip(scenario_label, target_label),
                m.long_text(scenario_label, target_label),
            )
        })
        .unwrap_or_default();

    ImpactExplanation {
        mechanism_name,
        tooltip,
        long_text,
        rule_text: render_labels(&impact.explanation_short, scenario_label, target_label),
    }
}

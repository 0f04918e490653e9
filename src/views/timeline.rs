//! Chronological feed: impacts grouped by lag, strongest first.

use serde::Serialize;

use crate::engine::{ComputedImpact, ScenarioResult};
use crate::indicator::{Category, IndicatorCatalog};
use crate::rule::LagBucket;

/// Section title and sublabel for a lag bucket.
#[must_use]
pub const fn section_label(lag: LagBucket) -> (&'static str, &'static str) {
    match lag {
        LagBucket::Immediate => ("Immediate", "Minutes to Days"),
        LagBucket::Short => ("Short-Term", "Days to Weeks"),
        LagBucket::Medium => ("Medium-Term", "Weeks to Months"),
        LagBucket::Long => ("Longer-Term", "Months+"),
    }
}

/// Impacts sharing one lag bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSection<'a> {
    /// Section lag.
    pub lag: LagBucket,
    /// Section heading.
    pub title: &'static str,
    /// Time span under the heading.
    pub sublabel: &'static str,
    /// Strength descending; equal strengths keep result order.
    pub impacts: Vec<&'a ComputedImpact>,
}

/// Groups the result into lag sections, omitting empty ones.
///
/// With a category filter, impacts on indicators outside the category (or
/// missing from the catalog) are dropped.
#[must_use]
pub fn build_timeline<'a>(
    indicators: &IndicatorCatalog,
    result: &'a ScenarioResult,
    category: Option<Category>,
) -> Vec<TimelineSection<'a>> {
    let keep = |impact: &ComputedImpact| {
        category.map_or(true, |only| {
            indicators
                .get(impact.target_indicator_id.as_str())
                .is_some_and(|indicator| indicator.category == only)
        })
    };

    LagBucket::ALL
        .into_iter()
        .filter_map(|lag| {
            let mut impacts: Vec<&ComputedImpact> = result
                .impacts
                .iter()
                .filter(|impact| impact.lag == lag && keep(*impact))
                .collect();
            if impacts.is_empty() {
                return None;
            }
            impacts.sort_by(|a, b| b.strength.total_cmp(&a.strength));
            let (title, sublabel) = section_label(lag);
            Some(TimelineSection {
                lag,
                title,
                sublabel,
                impacts,
            })
        })
        .collect()
}

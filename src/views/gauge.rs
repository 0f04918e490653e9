//! Net directional score per theme.

use serde::Serialize;

use crate::engine::{ComputedImpact, ScenarioResult};

/// Score bound; readings are clamped to `[-MAX_SCORE, MAX_SCORE]`.
pub const MAX_SCORE: f64 = 5.0;

/// A gauge theme and the indicators it aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GaugeTheme {
    /// Theme slug.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Indicators whose impacts feed the score.
    pub indicator_ids: &'static [&'static str],
}

/// The five dials, in display order.
pub const GAUGE_THEMES: [GaugeTheme; 5] = [
    GaugeTheme {
        id: "markets",
        label: "Markets",
        indicator_ids: &["sp-500", "nasdaq", "dow", "vix", "oil-barrel-price"],
    },
    GaugeTheme {
        id: "credit",
        label: "Credit",
        indicator_ids: &[
            "front-end-yields-2y",
            "long-end-yields-10y",
            "mortgage-rates",
            "corporate-borrowing",
        ],
    },
    GaugeTheme {
        id: "real-economy",
        label: "Real Economy",
        indicator_ids: &[
            "housing-starts",
            "consumer-spending",
            "gdp-growth",
            "unemployment",
            "job-openings",
            "wage-growth",
        ],
    },
    GaugeTheme {
        id: "inflation",
        label: "Inflation",
        indicator_ids: &[
            "core-cpi",
            "core-ppi",
            "headline-cpi",
            "headline-ppi",
            "pce",
            "core-pce",
        ],
    },
    GaugeTheme {
        id: "policy",
        label: "Policy",
        indicator_ids: &["fed-funds-target", "qe-qt-pace", "forward-guidance"],
    },
];

/// One gauge dial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeReading {
    /// Theme slug.
    pub theme: &'static str,
    /// Theme label.
    pub label: &'static str,
    /// In `[-5, 5]`; 0 when no impact hits the theme.
    pub score: f64,
    /// Verbal band of `score`.
    pub descriptor: &'static str,
}

impl GaugeTheme {
    /// Mean signed strength of the impacts hitting this theme.
    ///
    /// Mixed impacts count toward the mean with a zero contribution.
    #[must_use]
    pub fn score(&self, impacts: &[ComputedImpact]) -> f64 {
        let (total, count) = impacts
            .iter()
            .filter(|impact| self.indicator_ids.contains(&impact.target_indicator_id.as_str()))
            .fold((0.0, 0_u32), |(total, count), impact| {
                (total + impact.sign.direction() * impact.strength, count + 1)
            });
        if count == 0 {
            return 0.0;
        }
        (total / f64::from(count)).clamp(-MAX_SCORE, MAX_SCORE)
    }
}

/// Verbal band for a gauge score.
#[must_use]
pub fn descriptor(score: f64) -> &'static str {
    if score <= -3.5 {
        "Strong Headwinds"
    } else if score <= -2.0 {
        "Hawkish Pressure"
    } else if score <= -0.8 {
        "Mild Headwinds"
    } else if score < 0.8 {
        "Broadly Neutral"
    } else if score < 2.0 {
        "Modest Tailwinds"
    } else if score < 3.5 {
        "Favorable"
    } else {
        "Strong Tailwinds"
    }
}

/// One reading per theme, in theme order.
#[must_use]
pub fn gauge_summary(result: &ScenarioResult) -> Vec<GaugeReading> {
    GAUGE_THEMES
        .iter()
        .map(|theme| {
            let score = theme.score(&result.impacts);
            GaugeReading {
                theme: theme.id,
                label: theme.label,
                score,
                descriptor: descriptor(score),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;
    use crate::context::ScenarioRunContext;
    use crate::engine::run_scenario;
    use crate::rule::{LagBucket, Sign};
    use crate::views::tests::impact;

    #[test]
    fn score_is_mean_of_signed_strength() {
        let impacts = vec![
            impact("sp-500", Sign::Down, 3.0, LagBucket::Immediate),
            impact("nasdaq", Sign::Down, 4.0, LagBucket::Immediate),
            impact("vix", Sign::Mixed, 2.0, LagBucket::Immediate),
            impact("core-pce", Sign::Up, 5.0, LagBucket::Long),
        ];
        let markets = &GAUGE_THEMES[0];
        assert!((markets.score(&impacts) - (-7.0 / 3.0)).abs() < 1e-9);
        assert_eq!(GAUGE_THEMES[4].score(&impacts), 0.0);
    }

    #[test]
    fn score_is_clamped() {
        let impacts = vec![impact("fed-funds-target", Sign::Up, 7.5, LagBucket::Immediate)];
        assert_eq!(GAUGE_THEMES[4].score(&impacts), MAX_SCORE);
    }

    #[test]
    fn descriptor_bands() {
        assert_eq!(descriptor(-5.0), "Strong Headwinds");
        assert_eq!(descriptor(-3.5), "Strong Headwinds");
        assert_eq!(descriptor(-2.0), "Hawkish Pressure");
        assert_eq!(descriptor(-1.0), "Mild Headwinds");
        assert_eq!(descriptor(-0.8), "Mild Headwinds");
        assert_eq!(descriptor(0.0), "Broadly Neutral");
        assert_eq!(descriptor(0.8), "Modest Tailwinds");
        assert_eq!(descriptor(2.0), "Favorable");
        assert_eq!(descriptor(3.5), "Strong Tailwinds");
    }

    #[test]
    fn themes_reference_builtin_indicators() {
        let catalogs = Catalogs::builtin().unwrap();
        for theme in &GAUGE_THEMES {
            for id in theme.indicator_ids {
                assert!(catalogs.indicators.contains(id), "{} not in catalog", id);
            }
        }
    }

    #[test]
    fn hawkish_hike_weighs_on_markets() {
        let catalogs = Catalogs::builtin().unwrap();
        let result = run_scenario(
            &catalogs,
            ScenarioRunContext::builder("fed_hike_hawkish_surprise").build(),
        );
        let readings = gauge_summary(&result);
        assert_eq!(readings.len(), GAUGE_THEMES.len());
        let markets = readings.iter().find(|r| r.theme == "markets").unwrap();
        assert!(markets.score < 0.0);
        let policy = readings.iter().find(|r| r.theme == "policy").unwrap();
        assert_eq!(policy.descriptor, "Strong Tailwinds");
    }
}

//! Indicator × lag grid.
//!
//! Rows are indicators grouped by category in catalog order; columns are
//! the lag buckets that are not hidden. A cell carries the first impact on
//! its (indicator, lag) pair in result order.

use serde::Serialize;

use crate::engine::{ComputedImpact, ScenarioResult};
use crate::indicator::{Category, Indicator, IndicatorCatalog};
use crate::rule::LagBucket;

/// Filters applied when building the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeatmapOptions {
    /// Restrict rows to one category.
    pub category: Option<Category>,
    /// Lag columns to leave out.
    pub hidden_lags: Vec<LagBucket>,
}

impl HeatmapOptions {
    /// Keeps only rows of `category`.
    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Leaves out the `lag` column. Hiding twice is a no-op.
    #[must_use]
    pub fn hide(mut self, lag: LagBucket) -> Self {
        if !self.hidden_lags.contains(&lag) {
            self.hidden_lags.push(lag);
        }
        self
    }
}

/// Column header label and sublabel.
#[must_use]
pub const fn column_label(lag: LagBucket) -> (&'static str, &'static str) {
    match lag {
        LagBucket::Immediate => ("Immediate", "Minutes – Days"),
        LagBucket::Short => ("Short-term", "Days – Weeks"),
        LagBucket::Medium => ("Medium-term", "Weeks – Months"),
        LagBucket::Long => ("Longer-term", "Months+"),
    }
}

/// Colour intensity of a cell: strength rounded, clamped to 1..=5.
#[must_use]
pub fn intensity(strength: f64) -> u8 {
    if strength.is_nan() {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let level = strength.round().clamp(1.0, 5.0) as u8;
    level
}

/// One (indicator, lag) slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell<'a> {
    /// Column the cell sits in.
    pub lag: LagBucket,
    /// First impact on the pair in result order.
    pub impact: Option<&'a ComputedImpact>,
    /// Present only when `impact` is.
    pub intensity: Option<u8>,
}

/// One indicator across the visible columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow<'a> {
    /// Row indicator.
    pub indicator: &'a Indicator,
    /// One cell per column, in column order.
    pub cells: Vec<HeatmapCell<'a>>,
}

/// Rows of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapGroup<'a> {
    /// Group category.
    pub category: Category,
    /// Category title.
    pub title: &'static str,
    /// Rows in catalog order.
    pub rows: Vec<HeatmapRow<'a>>,
}

/// The whole grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap<'a> {
    /// Visible lag columns in rank order.
    pub columns: Vec<LagBucket>,
    /// Non-empty category groups in display order.
    pub groups: Vec<HeatmapGroup<'a>>,
}

impl Heatmap<'_> {
    /// Number of cells holding an impact.
    #[must_use]
    pub fn active_cells(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.rows)
            .flat_map(|r| &r.cells)
            .filter(|c| c.impact.is_some())
            .count()
    }
}

/// Builds the grid. Without a result every cell is empty.
///
/// Categories with no indicators are omitted.
#[must_use]
pub fn build_heatmap<'a>(
    indicators: &'a IndicatorCatalog,
    result: Option<&'a ScenarioResult>,
    options: &HeatmapOptions,
) -> Heatmap<'a> {
    let columns: Vec<LagBucket> = LagBucket::ALL
        .into_iter()
        .filter(|lag| !options.hidden_lags.contains(lag))
        .collect();

    let groups = Category::ALL
        .into_iter()
        .filter(|category| options.category.map_or(true, |only| only == *category))
        .filter_map(|category| {
            let rows: Vec<HeatmapRow<'a>> = indicators
                .by_category(category)
                .map(|indicator| HeatmapRow {
                    indicator,
                    cells: columns
                        .iter()
                        .map(|&lag| {
                            let impact = result.and_then(|r| {
                                r.impacts_on(indicator.id.as_str()).find(|i| i.lag == lag)
                            });
                            HeatmapCell {
                                lag,
                                impact,
                                intensity: impact.map(|i| intensity(i.strength)),
                            }
                        })
                        .collect(),
                })
                .collect();
            (!rows.is_empty()).then(|| HeatmapGroup {
                category,
                title: category.title(),
                rows,
            })
        })
        .collect();

    Heatmap { columns, groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScenarioRunContext;
    use crate::indicator::tests::indicator;
    use crate::rule::Sign;
    use crate::views::tests::impact;

    fn catalog() -> IndicatorCatalog {
        IndicatorCatalog::new(vec![
            indicator("fed-funds-target", Category::PolicyInstruments),
            indicator("vix", Category::Exogenous),
            indicator("sp-500", Category::Exogenous),
        ])
        .unwrap()
    }

    fn result(impacts: Vec<ComputedImpact>) -> ScenarioResult {
        ScenarioResult {
            context: ScenarioRunContext::builder("s").build(),
            impacts,
        }
    }

    #[test]
    fn intensity_rounds_and_clamps() {
        assert_eq!(intensity(0.2), 1);
        assert_eq!(intensity(2.5), 3);
        assert_eq!(intensity(3.4), 3);
        assert_eq!(intensity(9.0), 5);
        assert_eq!(intensity(f64::NAN), 1);
    }

    #[test]
    fn groups_follow_category_order_and_skip_empty() {
        let indicators = catalog();
        let grid = build_heatmap(&indicators, None, &HeatmapOptions::default());
        let categories: Vec<_> = grid.groups.iter().map(|g| g.category).collect();
        assert_eq!(categories, vec![Category::PolicyInstruments, Category::Exogenous]);
        assert_eq!(grid.columns, LagBucket::ALL.to_vec());
        assert_eq!(grid.active_cells(), 0);
    }

    #[test]
    fn first_impact_per_cell_wins() {
        let indicators = catalog();
        let res = result(vec![
            impact("vix", Sign::Up, 3.6, LagBucket::Immediate),
            impact("vix", Sign::Down, 1.0, LagBucket::Immediate),
            impact("sp-500", Sign::Down, 2.0, LagBucket::Short),
        ]);
        let grid = build_heatmap(&indicators, Some(&res), &HeatmapOptions::default());
        assert_eq!(grid.active_cells(), 2);
        let markets = &grid.groups[1];
        let vix = &markets.rows[0];
        assert_eq!(vix.indicator.id, "vix");
        assert_eq!(vix.cells[0].impact.unwrap().sign, Sign::Up);
        assert_eq!(vix.cells[0].intensity, Some(4));
        assert!(vix.cells[1].impact.is_none());
        assert_eq!(vix.cells[1].intensity, None);
    }

    #[test]
    fn filters_category_and_hides_columns() {
        let indicators = catalog();
        let res = result(vec![impact("vix", Sign::Up, 2.0, LagBucket::Immediate)]);
        let options = HeatmapOptions::default()
            .category(Category::Exogenous)
            .hide(LagBucket::Immediate)
            .hide(LagBucket::Immediate);
        let grid = build_heatmap(&indicators, Some(&res), &options);
        assert_eq!(grid.groups.len(), 1);
        assert_eq!(grid.columns.len(), 3);
        assert_eq!(grid.groups[0].rows[0].cells.len(), 3);
        assert_eq!(grid.active_cells(), 0);
    }

    #[test]
    fn column_labels() {
        assert_eq!(column_label(LagBucket::Immediate).0, "Immediate");
        assert_eq!(column_label(LagBucket::Long), ("Longer-term", "Months+"));
    }
}

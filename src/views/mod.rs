//! View models derived from a scenario result.
//!
//! Each view is a pure aggregation over a [`ScenarioResult`] and the
//! indicator catalog. Nothing here renders; presentation layers consume the
//! serialized structures.
//!
//! [`ScenarioResult`]: crate::engine::ScenarioResult

pub mod gauge;
pub mod heatmap;
pub mod timeline;

pub use gauge::{gauge_summary, GaugeReading, GaugeTheme, GAUGE_THEMES};
pub use heatmap::{build_heatmap, Heatmap, HeatmapOptions};
pub use timeline::{build_timeline, TimelineSection};

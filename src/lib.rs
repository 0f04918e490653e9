//! # Macroshock - deterministic macroeconomic shock evaluation
//!
//! Macroshock predicts how a discrete economic surprise (a hawkish Fed
//! decision, a hot inflation print, a credit blow-out) ripples through a
//! network of indicators. The prediction is not a fitted model: it resolves
//! a static, hand-curated catalog of causal rules against a small set of
//! contextual modifiers and returns a ranked, explainable list of impacts.
//!
//! ## Core Concepts
//!
//! - **Indicator**: an economic variable with its latest observation
//! - **Scenario preset**: a named shock with default direction and surprise size
//! - **Impact rule**: a scenario's base effect on one indicator, with optional
//!   regime overrides and surprise scaling
//! - **Mechanism**: the reusable causal story explaining why a rule fires
//! - **Computed impact**: a resolved rule plus the audit trail of modifiers applied
//!
//! ## Usage
//!
//! ```rust,no_run
//! use macroshock::{ScenarioEngine, ScenarioRunContext, ShockResult};
//!
//! fn main() -> ShockResult<()> {
//!     let engine = ScenarioEngine::builtin()?;
//!     let result = engine.run(
//!         ScenarioRunContext::builder("fed_hike_hawkish_surprise")
//!             .surprise_size(3)
//!             .regime("late_cycle")
//!             .build(),
//!     );
//!     for impact in &result.impacts {
//!         println!("{} {} {}", impact.target_indicator_id, impact.sign, impact.strength);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Identifiers, errors and static data
pub mod error;
pub mod id;
pub mod indicator;
pub mod mechanism;
pub mod relationship;
pub mod rule;
pub mod scenario;
pub mod template;

// Catalog bundle and evaluation
pub mod catalog;
pub mod context;
pub mod engine;

// Presentation helpers
pub mod display;
pub mod explain;
pub mod views;

// Re-export primary types at crate root for convenience
pub use catalog::{CatalogDocuments, CatalogHandle, Catalogs};
pub use context::{Persistence, ScenarioRunBuilder, ScenarioRunContext};
pub use engine::{
    run_scenario, run_scenario_with, ComputedImpact, EngineConfig, ExplanationSource,
    ScenarioEngine, ScenarioResult,
};
pub use error::{CatalogError, IntegrityError, ShockError, ShockResult, ValidationError};
pub use explain::{explain_impact, ImpactExplanation};
pub use id::{IndicatorId, MechanismId, RegimeId, ScenarioId};
pub use indicator::{Category, Indicator, IndicatorCatalog, Observation, Sentiment, UpdateMode};
pub use mechanism::{Mechanism, MechanismRegistry};
pub use relationship::{ChainStep, Polarity, Relationship, RelationshipGraph};
pub use rule::{
    ImpactConfidence, ImpactRule, LagBucket, RegimeOverride, RuleSet, Sign, SurpriseKey,
    SurpriseScaling,
};
pub use scenario::{DirectionTone, PresetCatalog, ScenarioPreset, ShockDirection, ShockType};
pub use template::render_template;

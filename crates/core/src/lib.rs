#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod results;
pub mod shuffle;

pub use catalog::{Catalog, RiskSummaryRow};
pub use error::ContentError;
pub use evaluator::{ScenarioEvaluator, SelectionOutcome, FALLBACK_HINT};
pub use results::{Score, WorkshopResults, aggregate_results};
pub use shuffle::shuffle_with_seed;

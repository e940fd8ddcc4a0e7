//! Day completeness
//!
//! A day is complete when every configured station has at least one sample
//! in each of the day's 288 five-minute slots.

pub mod coverage;
pub mod evaluator;

pub use coverage::StationCoverage;
pub use evaluator::{candidate_range, last_candidate, CompletenessEvaluator, DayEvaluation};

//! S-curve pipeline stages and entry point.
//!
//! Data flows strictly through five stages, each a pure function of the
//! previous stage's output:
//!
//! | Stage | Function | Output |
//! |-------|----------|--------|
//! | Weighting | [`weight`] | `WeightedActivity` |
//! | Expansion | [`expand`] | lazy `DailyContribution`s |
//! | Filter & aggregation | [`aggregate`] / [`Aggregator`] | `DailyAggregate`s |
//! | Assembly | [`build_curve`] | `Curve` |
//! | Metrics | [`CurveSummary`] | summary of the curve |
//!
//! [`CurveEngine`] runs them end to end over a [`CurveRequest`].

mod aggregation;
mod assembly;
mod engine;
mod expansion;
mod summary;
mod weighting;

pub use aggregation::{aggregate, Aggregator};
pub use assembly::build_curve;
pub use engine::{CurveEngine, CurveOutcome, CurveRequest, ZeroDurationPolicy};
pub use expansion::{expand, Expansion};
pub use summary::CurveSummary;
pub use weighting::weight;

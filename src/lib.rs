//! Project progress S-curves for the U-Engine ecosystem.
//!
//! Spreads each activity's share of the project cost evenly over the
//! business days of its planned span, sums concurrent activities per day,
//! and accumulates the result into a dense, non-decreasing daily curve.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Activity`, `WeightedActivity`, `WorkCalendar`,
//!   `BusinessCalendar`, `DailyContribution`, `DailyAggregate`, `Curve`
//! - **`pipeline`**: Weighting, expansion, aggregation, assembly, and the
//!   `CurveEngine` entry point
//! - **`validation`**: Activity integrity checks (IDs, spans, costs)
//! - **`ingest`**: Nullable raw records and the `ActivitySource` collaborator
//! - **`config`**: TOML-loadable run configuration
//! - **`error`**: `CurveError` taxonomy (`Config`, `Computation`, `Data`)
//!
//! # Example
//!
//! ```
//! use u_scurve::config::CurveConfig;
//! use u_scurve::models::Activity;
//! use chrono::NaiveDate;
//!
//! let config = CurveConfig::from_toml_str(r#"
//!     project_cost = 1000.0
//!     report_start = "2026-01-01"
//!     report_end = "2026-01-05"
//!
//!     [calendar]
//!     workdays = "Mon Tue Wed Thu Fri Sat"
//!     holidays = ["2026-01-01"]
//! "#).unwrap();
//!
//! let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
//! let activities = vec![Activity::new("A", day(1), day(3)).with_planned_cost(100.0)];
//!
//! let outcome = config.run(&activities).unwrap();
//! let cumulative = outcome.curve.cumulative_totals();
//! assert!((cumulative[1] - 0.05).abs() < 1e-12);
//! assert!((cumulative[4] - 0.10).abs() < 1e-12);
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod validation;

pub use error::{CurveError, Result};

//! S-curve domain models.
//!
//! Provides the data types flowing through the curve pipeline, from
//! planned activities to the finished cumulative series.
//!
//! # Lifecycle
//!
//! | Type | Role | Lifetime |
//! |------|------|----------|
//! | Activity | Planned sub-task (input) | Whole run, immutable |
//! | WorkCalendar | Business-day rules (input) | Whole run, shared read-only |
//! | WeightedActivity | Activity + duration + daily rate | Transient |
//! | DailyContribution | (day, activity, rate) row | Transient, streamed |
//! | DailyAggregate | (day, summed rate) row | Transient |
//! | Curve | Dense cumulative series (output) | Handed to the caller |

mod activity;
mod calendar;
mod curve;
mod series;
mod span;

pub use activity::{Activity, WeightedActivity};
pub use calendar::{BusinessCalendar, CalendarDays, WeekdayMask, WorkCalendar};
pub use curve::{Curve, CurvePoint, CurveSink};
pub use series::{DailyAggregate, DailyContribution};
pub use span::DayRange;

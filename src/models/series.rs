//! Intermediate daily series: per-activity contributions and per-day aggregates.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One activity's rate on one calendar day.
///
/// Produced for every day of the activity's span, working or not.
/// Non-business days are zeroed during aggregation, not dropped here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyContribution {
    /// Calendar day.
    pub date: NaiveDate,
    /// Contributing activity ID.
    pub activity_id: String,
    /// Rate before business-day filtering.
    pub daily_rate: f64,
}

impl DailyContribution {
    /// Creates a new contribution.
    pub fn new(date: NaiveDate, activity_id: impl Into<String>, daily_rate: f64) -> Self {
        Self {
            date,
            activity_id: activity_id.into(),
            daily_rate,
        }
    }

    /// Creates a contribution from a timestamp, dropping the time of day.
    pub fn at(timestamp: NaiveDateTime, activity_id: impl Into<String>, daily_rate: f64) -> Self {
        Self::new(timestamp.date(), activity_id, daily_rate)
    }
}

/// Sum of effective rates on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    /// Calendar day (unique within an aggregate series).
    pub date: NaiveDate,
    /// Summed business-day rate; zero on non-business days.
    pub total_rate: f64,
}

impl DailyAggregate {
    /// Creates a new aggregate row.
    pub fn new(date: NaiveDate, total_rate: f64) -> Self {
        Self { date, total_rate }
    }
}

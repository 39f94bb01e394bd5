//! Activity (sub-task) model.
//!
//! An activity is one weighted piece of project work with a planned
//! calendar span and a planned cost. Its share of the project cost is
//! spread evenly over the business days of its span.
//!
//! # Weight Model
//!
//! - **Activity weight**: `planned_cost / project_cost`
//! - **Duration**: business days in `[start_date, end_date]`, both inclusive
//! - **Daily rate**: `activity_weight / duration_business_days`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A planned activity as ingested.
///
/// Immutable once built; the pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique, stable activity identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// First planned day (inclusive).
    pub start_date: NaiveDate,
    /// Last planned day (inclusive).
    pub end_date: NaiveDate,
    /// Planned cost (non-negative).
    pub planned_cost: f64,
}

impl Activity {
    /// Creates a new activity with zero planned cost.
    pub fn new(id: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_date,
            end_date,
            planned_cost: 0.0,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the planned cost.
    pub fn with_planned_cost(mut self, planned_cost: f64) -> Self {
        self.planned_cost = planned_cost;
        self
    }

    /// Number of calendar days in the span (inclusive).
    ///
    /// Zero if the span is inverted.
    pub fn calendar_days(&self) -> i64 {
        ((self.end_date - self.start_date).num_days() + 1).max(0)
    }

    /// Whether `date` falls inside the planned span.
    pub fn spans(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// An activity with its business-day duration and daily progress rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedActivity {
    /// The source activity.
    pub activity: Activity,
    /// Share of the project cost (`planned_cost / project_cost`).
    pub activity_weight: f64,
    /// Business days in the span. Always >= 1.
    pub duration_business_days: u32,
    /// Progress accrued per business day.
    pub daily_rate: f64,
}

impl WeightedActivity {
    /// Activity identifier.
    pub fn id(&self) -> &str {
        &self.activity.id
    }

    /// First planned day.
    pub fn start_date(&self) -> NaiveDate {
        self.activity.start_date
    }

    /// Last planned day.
    pub fn end_date(&self) -> NaiveDate {
        self.activity.end_date
    }
}

//! Run configuration.
//!
//! Everything that used to be process-wide (project cost, calendar,
//! reporting range) is passed in explicitly, so several projects can be
//! computed side by side.
//!
//! # Format
//!
//! ```toml
//! project_cost = 1000.0
//! report_start = "2026-01-01"
//! report_end = "2026-12-31"
//! zero_duration = "skip"          # or "abort" (default)
//!
//! [calendar]
//! workdays = "Mon Tue Wed Thu Fri Sat"   # or "1111110"
//! holidays = ["2026-01-01", "2026-12-25"]
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, Result};
use crate::ingest::ActivitySource;
use crate::models::{WeekdayMask, WorkCalendar};
use crate::pipeline::{CurveEngine, CurveOutcome, CurveRequest, ZeroDurationPolicy};

/// Calendar section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Weekly work pattern. Defaults to Monday-Friday.
    #[serde(default = "default_workdays")]
    pub workdays: WeekdayMask,
    /// Non-working dates.
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

fn default_workdays() -> WeekdayMask {
    WeekdayMask::MON_FRI
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            workdays: default_workdays(),
            holidays: Vec::new(),
        }
    }
}

impl CalendarConfig {
    /// Builds the calendar.
    ///
    /// # Errors
    /// `Config` if no weekday is a workday.
    pub fn build(&self) -> Result<WorkCalendar> {
        WorkCalendar::new(self.workdays, self.holidays.iter().copied())
    }
}

/// Complete configuration of one project's curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Project planned cost.
    pub project_cost: f64,
    /// First reporting day (inclusive).
    pub report_start: NaiveDate,
    /// Last reporting day (inclusive).
    pub report_end: NaiveDate,
    /// Zero-duration activity handling.
    #[serde(default)]
    pub zero_duration: ZeroDurationPolicy,
    /// Business calendar.
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl CurveConfig {
    /// Creates a configuration with a Monday-Friday calendar and no holidays.
    pub fn new(project_cost: f64, report_start: NaiveDate, report_end: NaiveDate) -> Self {
        Self {
            project_cost,
            report_start,
            report_end,
            zero_duration: ZeroDurationPolicy::default(),
            calendar: CalendarConfig::default(),
        }
    }

    /// Sets the calendar.
    pub fn with_calendar(mut self, workdays: WeekdayMask, holidays: Vec<NaiveDate>) -> Self {
        self.calendar = CalendarConfig { workdays, holidays };
        self
    }

    /// Sets the zero-duration policy.
    pub fn with_zero_duration_policy(mut self, policy: ZeroDurationPolicy) -> Self {
        self.zero_duration = policy;
        self
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    /// `Config` (entity `config`) if the document is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CurveError::config("config", e.to_string()))
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| CurveError::config("config", e.to_string()))
    }

    /// Builds the engine described by this configuration.
    pub fn engine(&self) -> Result<CurveEngine<WorkCalendar>> {
        Ok(CurveEngine::new(self.calendar.build()?).with_zero_duration_policy(self.zero_duration))
    }

    /// Builds a request for `source`'s activities.
    pub fn request<S>(&self, source: &S) -> Result<CurveRequest>
    where
        S: ActivitySource + ?Sized,
    {
        CurveRequest::from_source(source, self.project_cost, self.report_start, self.report_end)
    }

    /// Runs the whole pipeline over `source`.
    pub fn run<S>(&self, source: &S) -> Result<CurveOutcome>
    where
        S: ActivitySource + ?Sized,
    {
        let engine = self.engine()?;
        engine.run(&self.request(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, BusinessCalendar};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const SAMPLE: &str = r#"
project_cost = 1000.0
report_start = "2026-01-01"
report_end = "2026-01-05"
zero_duration = "skip"

[calendar]
workdays = "Mon Tue Wed Thu Fri Sat"
holidays = [
    "2026-01-01", "2026-02-25", "2026-04-09", "2026-05-01",
    "2026-06-12", "2026-08-31", "2026-11-30", "2026-12-25",
]
"#;

    #[test]
    fn test_parse_toml() {
        let config = CurveConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.project_cost, 1000.0);
        assert_eq!(config.report_start, d(2026, 1, 1));
        assert_eq!(config.zero_duration, ZeroDurationPolicy::Skip);
        assert_eq!(config.calendar.workdays, WeekdayMask::MON_SAT);
        assert_eq!(config.calendar.holidays.len(), 8);
    }

    #[test]
    fn test_defaults() {
        let config = CurveConfig::from_toml_str(
            "project_cost = 10.0\nreport_start = \"2026-01-01\"\nreport_end = \"2026-01-31\"\n",
        )
        .unwrap();
        assert_eq!(config.zero_duration, ZeroDurationPolicy::Abort);
        assert_eq!(config.calendar, CalendarConfig::default());
    }

    #[test]
    fn test_bit_string_workdays() {
        let config = CurveConfig::from_toml_str(
            "project_cost = 1.0\nreport_start = \"2026-01-01\"\nreport_end = \"2026-01-02\"\n\
             [calendar]\nworkdays = \"0111110\"\n",
        )
        .unwrap();
        let cal = config.calendar.build().unwrap();
        assert!(!cal.is_business_day(d(2026, 1, 5))); // Monday
        assert!(cal.is_business_day(d(2026, 1, 6))); // Tuesday
    }

    #[test]
    fn test_malformed_toml() {
        let err = CurveConfig::from_toml_str("project_cost = \"lots\"").unwrap_err();
        assert_eq!(err.entity_id(), "config");
    }

    #[test]
    fn test_unknown_weekday_in_toml() {
        let err = CurveConfig::from_toml_str(
            "project_cost = 1.0\nreport_start = \"2026-01-01\"\nreport_end = \"2026-01-02\"\n\
             [calendar]\nworkdays = \"Mon Someday\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("Someday"));
    }

    #[test]
    fn test_empty_workdays_rejected_by_engine() {
        let config = CurveConfig::new(1.0, d(2026, 1, 1), d(2026, 1, 2))
            .with_calendar(WeekdayMask::empty(), vec![]);
        let err = config.engine().unwrap_err();
        assert_eq!(err.entity_id(), "calendar");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = CurveConfig::new(500.0, d(2026, 3, 1), d(2026, 3, 31))
            .with_calendar(WeekdayMask::MON_SAT, vec![d(2026, 3, 9)])
            .with_zero_duration_policy(ZeroDurationPolicy::Skip);
        let text = config.to_toml_string().unwrap();
        assert_eq!(CurveConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_run_from_config() {
        let config = CurveConfig::from_toml_str(SAMPLE).unwrap();
        let activities = vec![
            Activity::new("A", d(2026, 1, 1), d(2026, 1, 3)).with_planned_cost(100.0),
            Activity::new("SUN", d(2026, 1, 4), d(2026, 1, 4)).with_planned_cost(50.0),
        ];
        let outcome = config.run(&activities).unwrap();
        assert_eq!(outcome.skipped.len(), 1);
        let cumulative = outcome.curve.cumulative_totals();
        assert!((cumulative[2] - 0.1).abs() < 1e-12);
        assert!((cumulative[4] - 0.1).abs() < 1e-12);
    }
}

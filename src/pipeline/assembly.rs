//! Curve assembly.
//!
//! Reindexes a sparse aggregate onto the dense reporting range (missing
//! days become zero) and accumulates the running total.
//!
//! # Numerical Stability
//! The running sum uses Neumaier's compensated summation, so rounding
//! error stays at the level of a single addition regardless of series
//! length.
//!
//! # Reference
//! Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren zur Summation endlicher Summen"

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::error::{CurveError, Result};
use crate::models::{Curve, CurvePoint, DailyAggregate, DayRange};

/// Compensated running sum (Kahan-Babuska / Neumaier).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub(crate) fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    /// Compensated total. A non-finite running sum is returned as is: its
    /// compensation term is meaningless (`inf - inf`).
    pub(crate) fn value(&self) -> f64 {
        if self.sum.is_finite() {
            self.sum + self.compensation
        } else {
            self.sum
        }
    }
}

/// Checks that the reporting range is not inverted.
pub(crate) fn check_report_range(report_start: NaiveDate, report_end: NaiveDate) -> Result<()> {
    if report_start > report_end {
        return Err(CurveError::config(
            "report_range",
            format!("report start {report_start} is after report end {report_end}"),
        ));
    }
    Ok(())
}

/// Builds the dense cumulative curve over `[report_start, report_end]`.
///
/// Aggregate rows outside the range are ignored; days in the range with
/// no row get a daily total of 0.
///
/// # Errors
/// `Config` if `report_start > report_end`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_scurve::models::DailyAggregate;
/// use u_scurve::pipeline::build_curve;
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
/// let aggregate = vec![DailyAggregate::new(day(2), 0.25), DailyAggregate::new(day(4), 0.5)];
///
/// let curve = build_curve(&aggregate, day(1), day(5)).unwrap();
/// assert_eq!(curve.daily_totals(), vec![0.0, 0.25, 0.0, 0.5, 0.0]);
/// assert_eq!(curve.cumulative_totals(), vec![0.0, 0.25, 0.25, 0.75, 0.75]);
/// ```
pub fn build_curve(
    aggregate: &[DailyAggregate],
    report_start: NaiveDate,
    report_end: NaiveDate,
) -> Result<Curve> {
    check_report_range(report_start, report_end)?;

    let mut lookup: HashMap<NaiveDate, f64> = HashMap::with_capacity(aggregate.len());
    for row in aggregate {
        *lookup.entry(row.date).or_insert(0.0) += row.total_rate;
    }

    let days = DayRange::new(report_start, report_end);
    let mut points = Vec::with_capacity(days.len());
    let mut running = CompensatedSum::default();
    let mut cumulative_total = 0.0_f64;
    for date in days {
        let daily_total = lookup.get(&date).copied().unwrap_or(0.0);
        running.add(daily_total);
        // rounding in the compensation term must not step the curve backwards,
        // but a NaN total must surface rather than be clamped away
        let value = running.value();
        if value > cumulative_total || value.is_nan() {
            cumulative_total = value;
        }
        points.push(CurvePoint {
            date,
            daily_total,
            cumulative_total,
        });
    }

    Ok(Curve::from_points(points))
}

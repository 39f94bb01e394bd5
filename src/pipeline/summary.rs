//! Curve quality metrics.
//!
//! Summarizes a finished curve against the activities it was built from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Weight | Sum of activity weights (1.0 when costs add up to the project cost) |
//! | Final Progress | Cumulative total on the last reporting day |
//! | Unreported Weight | Total weight minus final progress (work outside the range) |
//! | Active Days | Reporting days with non-zero progress |
//! | Peak Daily Total | Largest single-day progress, and its first date |
//! | First Progress Date | First day with non-zero progress |
//! | Completion Date | First day the cumulative total reaches its final value |

use chrono::NaiveDate;
use serde::Serialize;

use super::assembly::CompensatedSum;
use crate::models::{Curve, WeightedActivity};

const COMPLETION_TOLERANCE: f64 = 1e-9;

/// Curve performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSummary {
    /// Sum of activity weights.
    pub total_weight: f64,
    /// Cumulative progress on the last reporting day.
    pub final_progress: f64,
    /// Weight not accrued inside the reporting range.
    pub unreported_weight: f64,
    /// Number of days with non-zero progress.
    pub active_days: usize,
    /// Largest daily total.
    pub peak_daily_total: f64,
    /// First date reaching the peak daily total.
    pub peak_date: Option<NaiveDate>,
    /// First date with non-zero progress.
    pub first_progress_date: Option<NaiveDate>,
    /// First date where the cumulative total reaches the final value.
    pub completion_date: Option<NaiveDate>,
}

impl CurveSummary {
    /// Computes the summary of `curve` built from `activities`.
    pub fn calculate(curve: &Curve, activities: &[WeightedActivity]) -> Self {
        let mut total_weight = CompensatedSum::default();
        for activity in activities {
            total_weight.add(activity.activity_weight);
        }
        let total_weight = total_weight.value();
        let final_progress = curve.final_progress();

        let mut active_days = 0;
        let mut peak_daily_total = 0.0;
        let mut peak_date = None;
        let mut first_progress_date = None;
        for point in curve.points() {
            if point.daily_total > 0.0 {
                active_days += 1;
                first_progress_date.get_or_insert(point.date);
            }
            if point.daily_total > peak_daily_total {
                peak_daily_total = point.daily_total;
                peak_date = Some(point.date);
            }
        }

        let completion_date = if final_progress > 0.0 {
            let threshold = final_progress * (1.0 - COMPLETION_TOLERANCE);
            curve
                .points()
                .iter()
                .find(|p| p.cumulative_total >= threshold)
                .map(|p| p.date)
        } else {
            None
        };

        Self {
            total_weight,
            final_progress,
            unreported_weight: (total_weight - final_progress).max(0.0),
            active_days,
            peak_daily_total,
            peak_date,
            first_progress_date,
            completion_date,
        }
    }

    /// Whether all activity weight was accrued inside the reporting range.
    pub fn is_complete(&self) -> bool {
        self.unreported_weight <= COMPLETION_TOLERANCE * self.total_weight.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, DailyAggregate};
    use crate::pipeline::build_curve;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn weighted(id: &str, weight: f64) -> WeightedActivity {
        WeightedActivity {
            activity: Activity::new(id, d(2026, 1, 1), d(2026, 1, 2)),
            activity_weight: weight,
            duration_business_days: 2,
            daily_rate: weight / 2.0,
        }
    }

    #[test]
    fn test_summary_basic() {
        let agg = vec![
            DailyAggregate::new(d(2026, 1, 2), 0.25),
            DailyAggregate::new(d(2026, 1, 3), 0.5),
            DailyAggregate::new(d(2026, 1, 5), 0.25),
        ];
        let curve = build_curve(&agg, d(2026, 1, 1), d(2026, 1, 7)).unwrap();
        let summary = CurveSummary::calculate(&curve, &[weighted("A", 0.5), weighted("B", 0.5)]);

        assert_eq!(summary.total_weight, 1.0);
        assert_eq!(summary.final_progress, 1.0);
        assert_eq!(summary.active_days, 3);
        assert_eq!(summary.peak_daily_total, 0.5);
        assert_eq!(summary.peak_date, Some(d(2026, 1, 3)));
        assert_eq!(summary.first_progress_date, Some(d(2026, 1, 2)));
        assert_eq!(summary.completion_date, Some(d(2026, 1, 5)));
        assert!(summary.is_complete());
    }

    #[test]
    fn test_summary_truncated_range() {
        let agg = vec![
            DailyAggregate::new(d(2026, 1, 2), 0.5),
            DailyAggregate::new(d(2026, 1, 9), 0.5),
        ];
        let curve = build_curve(&agg, d(2026, 1, 1), d(2026, 1, 5)).unwrap();
        let summary = CurveSummary::calculate(&curve, &[weighted("A", 1.0)]);

        assert_eq!(summary.final_progress, 0.5);
        assert_eq!(summary.unreported_weight, 0.5);
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_completion_not_before_tiny_progress() {
        let agg = vec![DailyAggregate::new(d(2026, 1, 10), 1e-10)];
        let curve = build_curve(&agg, d(2026, 1, 1), d(2026, 1, 15)).unwrap();
        let summary = CurveSummary::calculate(&curve, &[weighted("A", 1e-10)]);
        assert_eq!(summary.first_progress_date, Some(d(2026, 1, 10)));
        assert_eq!(summary.completion_date, Some(d(2026, 1, 10)));
    }

    #[test]
    fn test_summary_empty() {
        let curve = build_curve(&[], d(2026, 1, 1), d(2026, 1, 3)).unwrap();
        let summary = CurveSummary::calculate(&curve, &[]);
        assert_eq!(summary.total_weight, 0.0);
        assert_eq!(summary.active_days, 0);
        assert_eq!(summary.peak_date, None);
        assert_eq!(summary.completion_date, None);
        assert!(summary.is_complete());
    }
}

//! Pipeline entry point.
//!
//! # Algorithm
//!
//! 1. Check static configuration (project cost, reporting range).
//! 2. Validate activities at the ingestion boundary.
//! 3. Weight each activity against the project cost and calendar.
//! 4. Stream every activity's daily expansion into one aggregator.
//! 5. Reindex the aggregate onto the reporting range and accumulate.
//!
//! The expanded (activity, day) table is never materialized: memory stays
//! O(activities + distinct dates).
//!
//! # Complexity
//! O(n log d + r) where n = total span-days, d = distinct dates, r = report days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::aggregation::Aggregator;
use super::assembly::check_report_range;
use super::weighting::check_project_cost;
use super::{build_curve, expand, weight, CurveSummary};
use crate::error::{CurveError, Result};
use crate::ingest::ActivitySource;
use crate::models::{
    Activity, BusinessCalendar, Curve, CurveSink, DailyContribution, WeightedActivity, WorkCalendar,
};
use crate::validation::validate_activities;

/// What to do with an activity whose span has no business day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroDurationPolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Leave the activity out, log a warning, and report it in
    /// [`CurveOutcome::skipped`].
    Skip,
}

/// Input container for one curve run.
#[derive(Debug, Clone)]
pub struct CurveRequest {
    /// Activities to spread.
    pub activities: Vec<Activity>,
    /// Project planned cost (weight denominator).
    pub project_cost: f64,
    /// First reporting day (inclusive).
    pub report_start: NaiveDate,
    /// Last reporting day (inclusive).
    pub report_end: NaiveDate,
}

impl CurveRequest {
    /// Creates a new request.
    pub fn new(
        activities: Vec<Activity>,
        project_cost: f64,
        report_start: NaiveDate,
        report_end: NaiveDate,
    ) -> Self {
        Self {
            activities,
            project_cost,
            report_start,
            report_end,
        }
    }

    /// Creates a request from an ingestion source.
    ///
    /// # Errors
    /// `Data` if the source rejects any record.
    pub fn from_source<S>(
        source: &S,
        project_cost: f64,
        report_start: NaiveDate,
        report_end: NaiveDate,
    ) -> Result<Self>
    where
        S: ActivitySource + ?Sized,
    {
        Ok(Self::new(
            source.activities()?,
            project_cost,
            report_start,
            report_end,
        ))
    }

    /// Adds an activity.
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }
}

/// Result of a curve run.
#[derive(Debug, Clone)]
pub struct CurveOutcome {
    /// The cumulative curve over the reporting range.
    pub curve: Curve,
    /// Activities that contributed, with their rates.
    pub weighted: Vec<WeightedActivity>,
    /// Zero-duration errors of skipped activities (only under `Skip`).
    pub skipped: Vec<CurveError>,
    /// Curve metrics.
    pub summary: CurveSummary,
}

/// S-curve engine over a business calendar.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_scurve::models::{Activity, WeekdayMask, WorkCalendar};
/// use u_scurve::pipeline::{CurveEngine, CurveRequest};
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
/// let calendar = WorkCalendar::new(WeekdayMask::MON_SAT, [day(1)]).unwrap();
/// let request = CurveRequest::new(
///     vec![Activity::new("A", day(1), day(3)).with_planned_cost(100.0)],
///     1000.0,
///     day(1),
///     day(5),
/// );
///
/// let outcome = CurveEngine::new(calendar).run(&request).unwrap();
/// assert_eq!(outcome.curve.len(), 5);
/// assert!((outcome.curve.final_progress() - 0.1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CurveEngine<C = WorkCalendar> {
    calendar: C,
    zero_duration: ZeroDurationPolicy,
}

impl<C: BusinessCalendar> CurveEngine<C> {
    /// Creates an engine that aborts on zero-duration activities.
    pub fn new(calendar: C) -> Self {
        Self {
            calendar,
            zero_duration: ZeroDurationPolicy::Abort,
        }
    }

    /// Sets the zero-duration policy.
    pub fn with_zero_duration_policy(mut self, policy: ZeroDurationPolicy) -> Self {
        self.zero_duration = policy;
        self
    }

    /// The calendar in use.
    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// The zero-duration policy in use.
    pub fn zero_duration_policy(&self) -> ZeroDurationPolicy {
        self.zero_duration
    }

    /// Weights every activity, applying the zero-duration policy.
    ///
    /// Under `Skip`, every `Computation` error is skipped: zero-duration
    /// spans and weights that overflow `f64` alike.
    ///
    /// Returns the weighted activities and the errors of skipped ones.
    pub fn weigh_all(
        &self,
        activities: &[Activity],
        project_cost: f64,
    ) -> Result<(Vec<WeightedActivity>, Vec<CurveError>)> {
        check_project_cost(project_cost)?;
        info!(count = activities.len(), project_cost, "weighting activities");

        let mut weighted = Vec::with_capacity(activities.len());
        let mut skipped = Vec::new();
        for activity in activities {
            match weight(activity, project_cost, &self.calendar) {
                Ok(w) => weighted.push(w),
                Err(err @ CurveError::Computation { .. })
                    if self.zero_duration == ZeroDurationPolicy::Skip =>
                {
                    warn!(activity = %activity.id, error = %err, "skipping activity");
                    skipped.push(err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok((weighted, skipped))
    }

    /// Full expansion table, unfiltered, in activity order.
    ///
    /// For diagnostics; the run itself streams instead.
    pub fn expand_all(&self, weighted: &[WeightedActivity]) -> Vec<DailyContribution> {
        weighted.iter().flat_map(expand).collect()
    }

    /// Builds the curve for a request.
    ///
    /// # Errors
    /// - `Config` for a non-positive project cost or an inverted range
    /// - `Data` for malformed activities
    /// - `Computation` for a zero-duration or overflowing activity under `Abort`
    pub fn run(&self, request: &CurveRequest) -> Result<CurveOutcome> {
        check_project_cost(request.project_cost)?;
        check_report_range(request.report_start, request.report_end)?;
        validate_activities(&request.activities)?;

        let (weighted, skipped) = self.weigh_all(&request.activities, request.project_cost)?;

        let mut aggregator = Aggregator::new(&self.calendar);
        for w in &weighted {
            aggregator.extend(expand(w).rates());
        }
        debug!(
            contributions = aggregator.contribution_count(),
            dates = aggregator.date_count(),
            "aggregated daily contributions"
        );
        let aggregate = aggregator.finish();

        let curve = build_curve(&aggregate, request.report_start, request.report_end)?;
        let summary = CurveSummary::calculate(&curve, &weighted);
        info!(
            days = curve.len(),
            final_progress = summary.final_progress,
            skipped = skipped.len(),
            "curve assembled"
        );

        Ok(CurveOutcome {
            curve,
            weighted,
            skipped,
            summary,
        })
    }

    /// Builds the curve and hands it to `sink`.
    pub fn run_into<K>(&self, request: &CurveRequest, sink: &mut K) -> Result<CurveOutcome>
    where
        K: CurveSink + ?Sized,
    {
        let outcome = self.run(request)?;
        sink.accept(&outcome.curve)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ActivityRecord;
    use crate::models::{CalendarDays, CurvePoint, WeekdayMask};
    use crate::validation::ValidationErrorKind;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn calendar() -> WorkCalendar {
        WorkCalendar::new(WeekdayMask::MON_SAT, [d(2026, 1, 1)]).unwrap()
    }

    fn example_request() -> CurveRequest {
        CurveRequest::new(
            vec![Activity::new("A", d(2026, 1, 1), d(2026, 1, 3)).with_planned_cost(100.0)],
            1000.0,
            d(2026, 1, 1),
            d(2026, 1, 5),
        )
    }

    fn random_request(rng: &mut StdRng) -> CurveRequest {
        let origin = d(2026, 1, 1);
        let count = rng.random_range(1..40);
        let activities = (0..count)
            .map(|i| {
                let start = origin + Duration::days(rng.random_range(0..90));
                let end = start + Duration::days(rng.random_range(6..60));
                Activity::new(format!("T{i}"), start, end)
                    .with_planned_cost(rng.random_range(0.0..500.0))
            })
            .collect();
        CurveRequest::new(activities, 10_000.0, d(2025, 12, 15), d(2026, 6, 30))
    }

    #[test]
    fn test_example_end_to_end() {
        let outcome = CurveEngine::new(calendar()).run(&example_request()).unwrap();
        let expected_daily = [0.0, 0.05, 0.05, 0.0, 0.0];
        let expected_cumulative = [0.0, 0.05, 0.10, 0.10, 0.10];
        for (i, p) in outcome.curve.points().iter().enumerate() {
            assert_eq!(p.date, d(2026, 1, 1) + Duration::days(i as i64));
            assert!((p.daily_total - expected_daily[i]).abs() < 1e-12);
            assert!((p.cumulative_total - expected_cumulative[i]).abs() < 1e-12);
        }
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.weighted.len(), 1);
        assert!(outcome.summary.is_complete());
    }

    #[test]
    fn test_overlapping_activities_add() {
        let extra = Activity::new("B", d(2026, 1, 2), d(2026, 1, 2)).with_planned_cost(30.0);
        let request = example_request().with_activity(extra);
        let outcome = CurveEngine::new(calendar()).run(&request).unwrap();
        let jan2 = outcome.curve.point_at(d(2026, 1, 2)).unwrap();
        assert!((jan2.daily_total - 0.08).abs() <= 1e-9 * 0.08);
    }

    #[test]
    fn test_zero_duration_aborts_by_default() {
        let extra = Activity::new("SUN", d(2026, 1, 4), d(2026, 1, 4)).with_planned_cost(5.0);
        let request = example_request().with_activity(extra);
        let err = CurveEngine::new(calendar()).run(&request).unwrap_err();
        assert!(
            matches!(err, CurveError::Computation { ref activity_id, .. } if activity_id == "SUN")
        );
    }

    #[test]
    fn test_zero_duration_skip_is_reported() {
        let extra = Activity::new("SUN", d(2026, 1, 4), d(2026, 1, 4)).with_planned_cost(5.0);
        let request = example_request().with_activity(extra);
        let outcome = CurveEngine::new(calendar())
            .with_zero_duration_policy(ZeroDurationPolicy::Skip)
            .run(&request)
            .unwrap();
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].entity_id(), "SUN");
        assert_eq!(outcome.weighted.len(), 1);
        assert!((outcome.curve.final_progress() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_overflowing_weight_aborts_run() {
        let mut request = example_request();
        request.project_cost = 1e-100;
        request.activities[0].planned_cost = 1e300;
        let err = CurveEngine::new(calendar()).run(&request).unwrap_err();
        assert!(matches!(err, CurveError::Computation { .. }));
        assert_eq!(err.entity_id(), request.activities[0].id);
    }

    #[test]
    fn test_skip_does_not_hide_config_errors() {
        let mut request = example_request();
        request.project_cost = 0.0;
        let err = CurveEngine::new(calendar())
            .with_zero_duration_policy(ZeroDurationPolicy::Skip)
            .run(&request)
            .unwrap_err();
        assert_eq!(err.entity_id(), "project_cost");
    }

    #[test]
    fn test_inverted_report_range() {
        let mut request = example_request();
        request.report_start = d(2026, 2, 1);
        let err = CurveEngine::new(calendar()).run(&request).unwrap_err();
        assert_eq!(err.entity_id(), "report_range");
    }

    #[test]
    fn test_malformed_activity_rejected_before_weighting() {
        let extra = Activity::new("BAD", d(2026, 1, 9), d(2026, 1, 2)).with_planned_cost(5.0);
        let request = example_request().with_activity(extra);
        let err = CurveEngine::new(calendar()).run(&request).unwrap_err();
        let CurveError::Data(errors) = err else {
            panic!("expected data error");
        };
        assert_eq!(errors[0].kind, ValidationErrorKind::InvertedSpan);
        assert_eq!(errors[0].entity_id, "BAD");
    }

    #[test]
    fn test_expand_all_keeps_non_business_days() {
        let engine = CurveEngine::new(calendar());
        let (weighted, _) = engine.weigh_all(&example_request().activities, 1000.0).unwrap();
        let table = engine.expand_all(&weighted);
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].date, d(2026, 1, 1));
        assert!((table[0].daily_rate - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_calendar_days_engine() {
        let request = CurveRequest::new(
            vec![Activity::new("A", d(2026, 1, 1), d(2026, 1, 4)).with_planned_cost(40.0)],
            100.0,
            d(2026, 1, 1),
            d(2026, 1, 4),
        );
        let outcome = CurveEngine::new(CalendarDays).run(&request).unwrap();
        assert_eq!(outcome.curve.daily_totals(), vec![0.1, 0.1, 0.1, 0.1]);
    }

    #[test]
    fn test_run_from_records_into_sink() {
        let records = vec![ActivityRecord {
            id: Some("A".into()),
            name: Some("Mobilization".into()),
            start_date: Some("2026-01-01T00:00:00".into()),
            end_date: Some("2026-01-03".into()),
            planned_cost: Some(100.0),
        }];
        let request =
            CurveRequest::from_source(records.as_slice(), 1000.0, d(2026, 1, 1), d(2026, 1, 5))
                .unwrap();
        let mut sink: Vec<CurvePoint> = Vec::new();
        let outcome = CurveEngine::new(calendar())
            .run_into(&request, &mut sink)
            .unwrap();
        assert_eq!(sink.len(), 5);
        assert_eq!(sink.as_slice(), outcome.curve.points());
    }

    #[test]
    fn test_random_curves_monotonic_and_total() {
        let engine = CurveEngine::new(calendar());
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let request = random_request(&mut rng);
            let curve = engine.run(&request).unwrap().curve;

            let expected_days = (request.report_end - request.report_start).num_days() + 1;
            assert_eq!(curve.len() as i64, expected_days);
            for (i, date) in curve.dates().enumerate() {
                assert_eq!(date, request.report_start + Duration::days(i as i64));
            }

            let points = curve.points();
            assert!(points
                .windows(2)
                .all(|w| w[1].cumulative_total >= w[0].cumulative_total));

            let total: f64 = curve.daily_totals().iter().sum();
            let tolerance = 1e-9 * total.abs().max(1.0);
            assert!((curve.final_progress() - total).abs() <= tolerance);
        }
    }

    #[test]
    fn test_random_curves_accrue_all_weight() {
        // Every random span holds at least one business day and ends inside the range
        let engine = CurveEngine::new(calendar());
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let request = random_request(&mut rng);
            let outcome = engine.run(&request).unwrap();
            let expected: f64 = request
                .activities
                .iter()
                .map(|a| a.planned_cost / request.project_cost)
                .sum();
            assert!((outcome.curve.final_progress() - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }

    #[test]
    fn test_idempotent_runs() {
        let engine = CurveEngine::new(calendar());
        let request = random_request(&mut StdRng::seed_from_u64(9));
        let first = engine.run(&request).unwrap().curve;
        let second = engine.run(&request).unwrap().curve;
        let bits = |c: &Curve| -> Vec<(u64, u64)> {
            c.points()
                .iter()
                .map(|p| (p.daily_total.to_bits(), p.cumulative_total.to_bits()))
                .collect()
        };
        assert_eq!(bits(&first), bits(&second));
    }
}

//! Activity weighting.
//!
//! Turns an activity's planned cost and span into a per-business-day
//! progress rate.
//!
//! # Formula
//!
//! ```text
//! activity_weight = planned_cost / project_cost
//! duration        = business days in [start_date, end_date]
//! daily_rate      = activity_weight / duration
//! ```
//!
//! A span with no business day has no defined rate and is reported as a
//! `Computation` error instead of producing `inf` or `NaN`. So is a weight
//! that overflows `f64` (a huge cost over a tiny project cost).

use tracing::debug;

use crate::error::{CurveError, Result};
use crate::models::{Activity, BusinessCalendar, WeightedActivity};
use crate::validation::check_activity;

/// Checks that the project cost can serve as a weight denominator.
pub(crate) fn check_project_cost(project_cost: f64) -> Result<()> {
    if project_cost.is_finite() && project_cost > 0.0 {
        Ok(())
    } else {
        Err(CurveError::config(
            "project_cost",
            format!("project cost must be a positive number, got {project_cost}"),
        ))
    }
}

/// Weights one activity against the project cost and calendar.
///
/// Pure: depends only on its arguments.
///
/// # Errors
/// - `Config` if `project_cost` is not > 0
/// - `Data` if the activity is malformed (inverted span, negative cost)
/// - `Computation` if the span contains no business day, or the weight
///   or rate is not finite
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_scurve::models::{Activity, WeekdayMask, WorkCalendar};
/// use u_scurve::pipeline::weight;
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
/// let calendar = WorkCalendar::new(WeekdayMask::MON_SAT, [day(1)]).unwrap();
/// let activity = Activity::new("A", day(1), day(3)).with_planned_cost(100.0);
///
/// let weighted = weight(&activity, 1000.0, &calendar).unwrap();
/// assert_eq!(weighted.duration_business_days, 2);
/// assert!((weighted.daily_rate - 0.05).abs() < 1e-12);
/// ```
pub fn weight<C>(activity: &Activity, project_cost: f64, calendar: &C) -> Result<WeightedActivity>
where
    C: BusinessCalendar + ?Sized,
{
    check_project_cost(project_cost)?;

    let mut problems = Vec::new();
    check_activity(activity, &mut problems);
    if !problems.is_empty() {
        return Err(CurveError::Data(problems));
    }

    let activity_weight = activity.planned_cost / project_cost;
    let duration_business_days =
        calendar.count_business_days(activity.start_date, activity.end_date);
    if duration_business_days == 0 {
        return Err(CurveError::computation(
            &activity.id,
            format!(
                "zero-duration activity: no business day between {} and {}",
                activity.start_date, activity.end_date
            ),
        ));
    }
    let daily_rate = activity_weight / f64::from(duration_business_days);
    if !activity_weight.is_finite() || !daily_rate.is_finite() {
        return Err(CurveError::computation(
            &activity.id,
            format!(
                "non-finite weight {activity_weight}: planned cost {} over project cost {}",
                activity.planned_cost, project_cost
            ),
        ));
    }

    debug!(
        activity = %activity.id,
        name = %activity.name,
        start = %activity.start_date,
        end = %activity.end_date,
        business_days = duration_business_days,
        daily_rate,
        "weighted activity"
    );

    Ok(WeightedActivity {
        activity: activity.clone(),
        activity_weight,
        duration_business_days,
        daily_rate,
    })
}

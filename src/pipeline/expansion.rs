//! Daily expansion.
//!
//! Materializes a weighted activity as one contribution per calendar day
//! of its span. Calendar-agnostic: non-business days are emitted with the
//! full rate and zeroed later by aggregation.

use chrono::NaiveDate;

use crate::models::{DailyContribution, DayRange, WeightedActivity};

/// Lazy per-day contributions of one activity, ascending by date.
///
/// Cloning an unconsumed expansion restarts the sequence.
#[derive(Debug, Clone)]
pub struct Expansion<'a> {
    activity_id: &'a str,
    daily_rate: f64,
    days: DayRange,
}

impl Iterator for Expansion<'_> {
    type Item = DailyContribution;

    fn next(&mut self) -> Option<DailyContribution> {
        let date = self.days.next()?;
        Some(DailyContribution::new(date, self.activity_id, self.daily_rate))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.days.size_hint()
    }
}

impl ExactSizeIterator for Expansion<'_> {}

impl Expansion<'_> {
    /// The remaining `(date, daily_rate)` pairs, without an activity ID per day.
    pub fn rates(self) -> impl ExactSizeIterator<Item = (NaiveDate, f64)> {
        let daily_rate = self.daily_rate;
        self.days.map(move |date| (date, daily_rate))
    }
}

/// Expands an activity into one contribution per day of its span.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_scurve::models::{Activity, CalendarDays};
/// use u_scurve::pipeline::{expand, weight};
///
/// let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
/// let activity = Activity::new("A", day(1), day(3)).with_planned_cost(30.0);
/// let weighted = weight(&activity, 100.0, &CalendarDays).unwrap();
///
/// let dates: Vec<_> = expand(&weighted).map(|c| c.date).collect();
/// assert_eq!(dates, vec![day(1), day(2), day(3)]);
/// ```
pub fn expand(weighted: &WeightedActivity) -> Expansion<'_> {
    Expansion {
        activity_id: weighted.id(),
        daily_rate: weighted.daily_rate,
        days: DayRange::new(weighted.start_date(), weighted.end_date()),
    }
}

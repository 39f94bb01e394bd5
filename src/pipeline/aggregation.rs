//! Business-day filter and per-day aggregation.
//!
//! Zeroes contributions on non-business days, then sums the remaining
//! rates of all activities sharing a day. Concurrent workstreams add up:
//! the merge is a sum, never an average or a max.
//!
//! The reduce is streaming. Memory is O(distinct dates), independent of
//! how many contributions flow through.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{BusinessCalendar, DailyAggregate, DailyContribution};

/// Streaming group-by-date sum of effective rates.
///
/// Every date pushed yields one output row, even when all of its
/// contributions were zeroed: a present-but-zero day is distinct from a
/// day no activity touches.
#[derive(Debug)]
pub struct Aggregator<'c, C: ?Sized> {
    calendar: &'c C,
    totals: BTreeMap<NaiveDate, f64>,
    contributions: usize,
}

impl<'c, C> Aggregator<'c, C>
where
    C: BusinessCalendar + ?Sized,
{
    /// Creates an empty aggregator filtering with `calendar`.
    pub fn new(calendar: &'c C) -> Self {
        Self {
            calendar,
            totals: BTreeMap::new(),
            contributions: 0,
        }
    }

    /// Adds one contribution.
    pub fn push(&mut self, contribution: &DailyContribution) {
        self.add(contribution.date, contribution.daily_rate);
    }

    /// Adds one day's rate without naming the activity.
    pub fn add(&mut self, date: NaiveDate, daily_rate: f64) {
        let effective_rate = if self.calendar.is_business_day(date) {
            daily_rate
        } else {
            0.0
        };
        *self.totals.entry(date).or_insert(0.0) += effective_rate;
        self.contributions += 1;
    }

    /// Number of contributions pushed so far.
    pub fn contribution_count(&self) -> usize {
        self.contributions
    }

    /// Number of distinct dates seen so far.
    pub fn date_count(&self) -> usize {
        self.totals.len()
    }

    /// Aggregate rows, ascending by date.
    pub fn finish(self) -> Vec<DailyAggregate> {
        self.totals
            .into_iter()
            .map(|(date, total_rate)| DailyAggregate::new(date, total_rate))
            .collect()
    }
}

impl<C> Extend<DailyContribution> for Aggregator<'_, C>
where
    C: BusinessCalendar + ?Sized,
{
    fn extend<I: IntoIterator<Item = DailyContribution>>(&mut self, iter: I) {
        for contribution in iter {
            self.push(&contribution);
        }
    }
}

impl<C> Extend<(NaiveDate, f64)> for Aggregator<'_, C>
where
    C: BusinessCalendar + ?Sized,
{
    fn extend<I: IntoIterator<Item = (NaiveDate, f64)>>(&mut self, iter: I) {
        for (date, daily_rate) in iter {
            self.add(date, daily_rate);
        }
    }
}

/// Filters and sums contributions per day.
///
/// Output has exactly one row per distinct contributed date, ascending.
pub fn aggregate<I, C>(contributions: I, calendar: &C) -> Vec<DailyAggregate>
where
    I: IntoIterator<Item = DailyContribution>,
    C: BusinessCalendar + ?Sized,
{
    let mut aggregator = Aggregator::new(calendar);
    aggregator.extend(contributions);
    aggregator.finish()
}

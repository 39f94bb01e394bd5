//! Business-day calendar models.
//!
//! Defines which calendar dates count as working days: a weekly
//! work pattern (weekday mask) minus a set of holidays.
//!
//! # Precedence
//! Holidays override the weekday mask. A date is a business day iff:
//! - its weekday is in the mask, AND
//! - it is NOT in the holiday set.
//!
//! # Weekmask Formats
//! - Day abbreviations separated by whitespace: `"Mon Tue Wed Thu Fri Sat"`
//! - Seven `0`/`1` characters, Monday first: `"1111110"`

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::DayRange;
use crate::error::{CurveError, Result};

/// Business-day membership test.
///
/// The weighting and aggregation stages only see a calendar through
/// this trait, so alternate strategies (regional calendars, shift
/// patterns) plug in without touching them.
pub trait BusinessCalendar {
    /// Whether `date` is a working day.
    fn is_business_day(&self, date: NaiveDate) -> bool;

    /// Business days in `[start, end]`, both inclusive.
    ///
    /// Zero for an inverted range. This is the authoritative duration
    /// function: it is the denominator of every daily rate.
    fn count_business_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        DayRange::new(start, end)
            .filter(|&date| self.is_business_day(date))
            .count() as u32
    }
}

impl<C: BusinessCalendar + ?Sized> BusinessCalendar for &C {
    fn is_business_day(&self, date: NaiveDate) -> bool {
        (**self).is_business_day(date)
    }

    fn count_business_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        (**self).count_business_days(start, end)
    }
}

/// Set of weekdays considered workdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekdayMask(u8);

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl WeekdayMask {
    /// Monday to Friday.
    pub const MON_FRI: Self = Self(0b0011111);
    /// Monday to Saturday.
    pub const MON_SAT: Self = Self(0b0111111);
    /// Every day of the week.
    pub const ALL: Self = Self(0b1111111);

    /// A mask with no workdays.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Adds a workday.
    pub fn with(mut self, day: Weekday) -> Self {
        self.0 |= 1 << day.num_days_from_monday();
        self
    }

    /// Whether `day` is a workday.
    #[inline]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    /// Number of workdays per week.
    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    /// Whether no weekday is a workday.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Workdays, Monday first.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(|&d| self.contains(d))
    }
}

impl FromIterator<Weekday> for WeekdayMask {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl FromStr for WeekdayMask {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() == 7 && s.chars().all(|c| c == '0' || c == '1') {
            return Ok(WEEK
                .into_iter()
                .zip(s.chars())
                .filter(|&(_, c)| c == '1')
                .map(|(d, _)| d)
                .collect());
        }
        s.split_whitespace()
            .map(|token| {
                token.parse::<Weekday>().map_err(|_| {
                    CurveError::config("calendar", format!("unknown weekday '{token}' in weekmask"))
                })
            })
            .collect()
    }
}

impl fmt::Display for WeekdayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.days().map(|d| d.to_string()).collect();
        write!(f, "{}", names.join(" "))
    }
}

impl TryFrom<String> for WeekdayMask {
    type Error = CurveError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<WeekdayMask> for String {
    fn from(mask: WeekdayMask) -> Self {
        mask.to_string()
    }
}

/// Weekly work pattern plus holidays.
///
/// Immutable after construction; share it read-only across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCalendar {
    weekday_mask: WeekdayMask,
    holidays: BTreeSet<NaiveDate>,
}

impl WorkCalendar {
    /// Creates a calendar.
    ///
    /// # Errors
    /// `CurveError::Config` if the mask has no workdays: every duration
    /// would be zero.
    pub fn new(
        weekday_mask: WeekdayMask,
        holidays: impl IntoIterator<Item = NaiveDate>,
    ) -> Result<Self> {
        if weekday_mask.is_empty() {
            return Err(CurveError::config(
                "calendar",
                "weekday mask is empty, no date could ever be a business day",
            ));
        }
        Ok(Self {
            weekday_mask,
            holidays: holidays.into_iter().collect(),
        })
    }

    /// The weekly work pattern.
    pub fn weekday_mask(&self) -> WeekdayMask {
        self.weekday_mask
    }

    /// Holidays, ascending.
    pub fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    /// Whether `date` is listed as a holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }
}

impl BusinessCalendar for WorkCalendar {
    fn is_business_day(&self, date: NaiveDate) -> bool {
        self.weekday_mask.contains(date.weekday()) && !self.holidays.contains(&date)
    }

    /// Counts whole weeks arithmetically, walks the remaining < 7 days,
    /// then subtracts holidays in range that fall on a workday.
    ///
    /// # Complexity
    /// O(log h + k) for h holidays, k of them inside the range.
    fn count_business_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if start > end {
            return 0;
        }
        let total = (end - start).num_days() + 1;
        let full_weeks = total / 7;
        let mut count = full_weeks * i64::from(self.weekday_mask.len());

        let tail_start = start + Duration::days(full_weeks * 7);
        count += DayRange::new(tail_start, end)
            .filter(|d| self.weekday_mask.contains(d.weekday()))
            .count() as i64;

        let closed = self
            .holidays
            .range(start..=end)
            .filter(|h| self.weekday_mask.contains(h.weekday()))
            .count() as i64;

        (count - closed) as u32
    }
}

/// Calendar where every date is a working day.
///
/// Durations become plain calendar-day counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarDays;

impl BusinessCalendar for CalendarDays {
    fn is_business_day(&self, _date: NaiveDate) -> bool {
        true
    }

    fn count_business_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        DayRange::new(start, end).len() as u32
    }
}

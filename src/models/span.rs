//! Inclusive day ranges.

use chrono::NaiveDate;

/// Every calendar day from `start` to `end`, both inclusive, ascending.
///
/// Lazy and finite. Cloning restarts from the clone's current position,
/// so keeping an unconsumed copy gives a restartable sequence.
/// An inverted range (`start > end`) is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DayRange {
    /// Creates the range `[start, end]`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }

    /// Number of days left in the range.
    pub fn days_left(&self) -> usize {
        match self.next {
            Some(next) => ((self.end - next).num_days() + 1) as usize,
            None => 0,
        }
    }
}

impl Iterator for DayRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = if current < self.end {
            current.succ_opt()
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.days_left();
        (n, Some(n))
    }
}

impl ExactSizeIterator for DayRange {}

impl std::iter::FusedIterator for DayRange {}

//! S-curve (terminal artifact) model.
//!
//! A curve is dense over its reporting range: every date appears exactly
//! once, ascending, and the cumulative column never decreases.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;

/// One reporting day on the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Calendar day.
    pub date: NaiveDate,
    /// Progress accrued on this day.
    pub daily_total: f64,
    /// Progress accrued from the start of the range through this day.
    pub cumulative_total: f64,
}

impl CurvePoint {
    /// Daily value for charting: `None` on days without progress.
    ///
    /// Presentation only. `daily_total` itself stays `0.0` on those days.
    pub fn chart_daily(&self) -> Option<f64> {
        (self.daily_total != 0.0).then_some(self.daily_total)
    }
}

/// Cumulative progress curve over a reporting range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    points: Vec<CurvePoint>,
}

impl Curve {
    /// Built only by curve assembly, which upholds density and ordering.
    pub(crate) fn from_points(points: Vec<CurvePoint>) -> Self {
        Self { points }
    }

    /// All points, ascending by date.
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Number of days in the reporting range.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First reporting day.
    pub fn start(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// Last reporting day.
    pub fn end(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// The point for `date`, if inside the reporting range.
    pub fn point_at(&self, date: NaiveDate) -> Option<&CurvePoint> {
        let start = self.start()?;
        let offset = usize::try_from((date - start).num_days()).ok()?;
        self.points.get(offset)
    }

    /// Cumulative progress at `date`.
    ///
    /// Before the range this is 0; after it, the final value.
    pub fn progress_at(&self, date: NaiveDate) -> f64 {
        match (self.start(), self.end()) {
            (Some(start), _) if date < start => 0.0,
            (_, Some(end)) if date > end => self.final_progress(),
            _ => self.point_at(date).map_or(0.0, |p| p.cumulative_total),
        }
    }

    /// Cumulative progress on the last day.
    pub fn final_progress(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.cumulative_total)
    }

    /// Reporting days, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Daily totals in date order.
    pub fn daily_totals(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.daily_total).collect()
    }

    /// Cumulative totals in date order.
    pub fn cumulative_totals(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.cumulative_total).collect()
    }
}

/// Output collaborator receiving a finished curve.
///
/// Serialization format is the sink's business.
pub trait CurveSink {
    /// Consumes one curve.
    fn accept(&mut self, curve: &Curve) -> Result<()>;
}

impl CurveSink for Vec<CurvePoint> {
    fn accept(&mut self, curve: &Curve) -> Result<()> {
        self.extend_from_slice(curve.points());
        Ok(())
    }
}

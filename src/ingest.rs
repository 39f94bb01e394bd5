//! Ingestion boundary.
//!
//! Raw rows arrive with every field nullable, as they come out of a CSV
//! export or a database query. [`ActivityRecord`] converts them into
//! [`Activity`] values or rejects them with a `DataError`, so the pipeline
//! never sees a malformed activity.
//!
//! Field names follow the planned-cost sheet (`SubTaskID`, `SubTasks`,
//! `Start_date`, `End_date`, `Planned_Cost`) as serde aliases, next to the
//! snake_case names.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CurveError, Result};
use crate::models::Activity;
use crate::validation::{check_activity, validate_activities, ValidationError, ValidationErrorKind};

/// A raw activity row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Activity identifier.
    #[serde(default, alias = "SubTaskID")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, alias = "SubTasks")]
    pub name: Option<String>,
    /// Start day, `YYYY-MM-DD` or a date-time.
    #[serde(default, alias = "Start_date")]
    pub start_date: Option<String>,
    /// End day, `YYYY-MM-DD` or a date-time.
    #[serde(default, alias = "End_date")]
    pub end_date: Option<String>,
    /// Planned cost.
    #[serde(default, alias = "Planned_Cost")]
    pub planned_cost: Option<f64>,
}

impl ActivityRecord {
    /// Converts the record into an activity.
    ///
    /// `row` names the record in errors when its ID is missing.
    ///
    /// # Errors
    /// Every problem with the record, not just the first.
    pub fn to_activity(&self, row: usize) -> std::result::Result<Activity, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let entity = match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingField,
                    format!("#{row}"),
                    format!("Record #{row} has no activity ID"),
                ));
                format!("#{row}")
            }
        };

        let mut field = |value: &Option<String>, label: &str| -> Option<NaiveDate> {
            let Some(raw) = value.as_deref() else {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MissingField,
                    &entity,
                    format!("Activity '{entity}' has no {label}"),
                ));
                return None;
            };
            let parsed = parse_day(raw);
            if parsed.is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDate,
                    &entity,
                    format!("Activity '{entity}' has unparsable {label} '{raw}'"),
                ));
            }
            parsed
        };
        let start_date = field(&self.start_date, "start date");
        let end_date = field(&self.end_date, "end date");

        if self.planned_cost.is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                &entity,
                format!("Activity '{entity}' has no planned cost"),
            ));
        }

        let (Some(start_date), Some(end_date), Some(planned_cost), true) =
            (start_date, end_date, self.planned_cost, errors.is_empty())
        else {
            return Err(errors);
        };

        let activity = Activity::new(entity, start_date, end_date)
            .with_name(self.name.clone().unwrap_or_default())
            .with_planned_cost(planned_cost);
        check_activity(&activity, &mut errors);
        if errors.is_empty() {
            Ok(activity)
        } else {
            Err(errors)
        }
    }
}

/// Parses a day, dropping any time-of-day component.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.f]` and `YYYY-MM-DD HH:MM:SS`.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.parse::<NaiveDate>()
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|ts| ts.date()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|ts| ts.date())
        })
}

/// Ingestion collaborator supplying validated activities.
pub trait ActivitySource {
    /// Returns every activity, or all the reasons some could not be accepted.
    fn activities(&self) -> Result<Vec<Activity>>;
}

impl ActivitySource for [ActivityRecord] {
    fn activities(&self) -> Result<Vec<Activity>> {
        let mut errors = Vec::new();
        let mut activities = Vec::with_capacity(self.len());
        for (row, record) in self.iter().enumerate() {
            match record.to_activity(row) {
                Ok(activity) => activities.push(activity),
                Err(mut rejected) => errors.append(&mut rejected),
            }
        }
        if let Err(mut duplicates) = validate_activities(&activities) {
            errors.append(&mut duplicates);
        }
        if !errors.is_empty() {
            return Err(CurveError::Data(errors));
        }
        debug!(count = activities.len(), "ingested activity records");
        Ok(activities)
    }
}

impl ActivitySource for Vec<ActivityRecord> {
    fn activities(&self) -> Result<Vec<Activity>> {
        self.as_slice().activities()
    }
}

impl ActivitySource for [Activity] {
    fn activities(&self) -> Result<Vec<Activity>> {
        validate_activities(self)?;
        Ok(self.to_vec())
    }
}

impl ActivitySource for Vec<Activity> {
    fn activities(&self) -> Result<Vec<Activity>> {
        self.as_slice().activities()
    }
}

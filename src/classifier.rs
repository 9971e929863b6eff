use crate::date_field::{self, CalibrationField, MonthResolution};
use crate::status::CalibrationStatus;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DUE_SOON_DAYS: i64 = 30;

/// Result of classifying one calibration field against "now".
///
/// Day counts are `None` when the status came from a keyword such as
/// "overdue" typed in place of a date: there is no number to report,
/// and zero would claim otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationClassification {
    pub status: CalibrationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_until_due: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_date: Option<NaiveDate>,
}

impl CalibrationClassification {
    pub fn unknown() -> Self {
        Self::from_keyword(CalibrationStatus::Unknown)
    }

    pub fn from_keyword(status: CalibrationStatus) -> Self {
        Self {
            status,
            days_overdue: None,
            days_until_due: None,
            resolved_date: None,
        }
    }

    /// Classify a signed whole-day distance from now to `resolved_date`.
    pub fn from_delta(resolved_date: NaiveDate, delta_days: i64, due_soon_days: i64) -> Self {
        if delta_days < 0 {
            Self {
                status: CalibrationStatus::Overdue,
                days_overdue: Some(delta_days.abs()),
                days_until_due: None,
                resolved_date: Some(resolved_date),
            }
        } else {
            let status = if delta_days <= due_soon_days {
                CalibrationStatus::DueSoon
            } else {
                CalibrationStatus::Current
            };
            Self {
                status,
                days_overdue: None,
                days_until_due: Some(delta_days),
                resolved_date: Some(resolved_date),
            }
        }
    }

    /// Signed days until due, negative once overdue. `None` without a date.
    pub fn days_left(&self) -> Option<i64> {
        match (self.days_until_due, self.days_overdue) {
            (Some(days), _) => Some(days),
            (None, Some(days)) => Some(-days),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationClassifier {
    due_soon_days: i64,
    month_resolution: MonthResolution,
}

impl Default for CalibrationClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DUE_SOON_DAYS)
    }
}

impl CalibrationClassifier {
    /// `due_soon_days` must be non-negative. The classifier does not check
    /// it: `BatchClassifier::with_threshold` and `TrackerConfig::validate`
    /// reject negative windows before they get here.
    pub fn new(due_soon_days: i64) -> Self {
        Self {
            due_soon_days,
            month_resolution: MonthResolution::default(),
        }
    }

    pub fn with_month_resolution(mut self, month_resolution: MonthResolution) -> Self {
        self.month_resolution = month_resolution;
        self
    }

    pub fn due_soon_days(&self) -> i64 {
        self.due_soon_days
    }

    pub fn month_resolution(&self) -> MonthResolution {
        self.month_resolution
    }

    /// The date a field is compared against, if it holds one.
    pub fn resolve_date(&self, raw: Option<&str>) -> Option<NaiveDate> {
        match date_field::interpret(raw) {
            CalibrationField::Date(parsed) => Some(parsed.resolve(self.month_resolution)),
            _ => None,
        }
    }

    pub fn classify(&self, raw: Option<&str>, now: NaiveDateTime) -> CalibrationClassification {
        match date_field::interpret(raw) {
            CalibrationField::Missing | CalibrationField::Unparseable(_) => {
                CalibrationClassification::unknown()
            }
            CalibrationField::Keyword(status) => CalibrationClassification::from_keyword(status),
            CalibrationField::Date(parsed) => {
                let resolved = parsed.resolve(self.month_resolution);
                let delta_days = (resolved.and_time(NaiveTime::MIN) - now).num_days();
                CalibrationClassification::from_delta(resolved, delta_days, self.due_soon_days)
            }
        }
    }
}

/// Classify with the default month policy and the given due-soon window.
pub fn classify(
    raw: Option<&str>,
    now: NaiveDateTime,
    due_soon_days: i64,
) -> CalibrationClassification {
    CalibrationClassifier::new(due_soon_days).classify(raw, now)
}

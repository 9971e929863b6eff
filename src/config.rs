use crate::batch::BatchClassifier;
use crate::calendar::{CalibrationCalendar, DEFAULT_CALENDAR_WINDOW_DAYS};
use crate::classifier::{CalibrationClassifier, DEFAULT_DUE_SOON_DAYS};
use crate::date_field::MonthResolution;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Settings for the services wrapping the classifier. Missing keys in a
/// config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub due_soon_threshold: i64,
    pub calendar_window_days: i64,
    pub month_resolution: MonthResolution,
    /// Days-before-due on which reminders go out.
    pub reminder_intervals: Vec<i64>,
    pub send_due_soon_emails: bool,
    pub send_overdue_emails: bool,
    pub notify_roles: Vec<String>,
    pub email_subject_prefix: String,
    /// Log notifications instead of handing them to a sink.
    pub debug_mode: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            due_soon_threshold: DEFAULT_DUE_SOON_DAYS,
            calendar_window_days: DEFAULT_CALENDAR_WINDOW_DAYS,
            month_resolution: MonthResolution::default(),
            reminder_intervals: vec![30, 14, 7, 3, 1],
            send_due_soon_emails: true,
            send_overdue_emails: true,
            notify_roles: vec!["admin".to_string(), "physicist".to_string()],
            email_subject_prefix: "[Equipment Tracker] ".to_string(),
            debug_mode: false,
        }
    }
}

impl TrackerConfig {
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: TrackerConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.due_soon_threshold < 0 {
            return Err(ConfigError::Invalid(format!(
                "due_soon_threshold must be non-negative (got {})",
                self.due_soon_threshold
            )));
        }
        if self.calendar_window_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "calendar_window_days must be non-negative (got {})",
                self.calendar_window_days
            )));
        }
        if let Some(bad) = self.reminder_intervals.iter().find(|days| **days <= 0) {
            return Err(ConfigError::Invalid(format!(
                "reminder_intervals must be positive (got {bad})"
            )));
        }
        Ok(())
    }

    pub fn classifier(&self) -> CalibrationClassifier {
        CalibrationClassifier::new(self.due_soon_threshold)
            .with_month_resolution(self.month_resolution)
    }

    pub fn batch(&self) -> BatchClassifier {
        BatchClassifier::new(self.classifier())
    }

    pub fn calendar(&self) -> CalibrationCalendar {
        CalibrationCalendar::new(self.classifier(), self.calendar_window_days)
    }
}

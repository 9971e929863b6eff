use serde::{Deserialize, Serialize};
use std::fmt;

/// Calibration state of a piece of equipment relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStatus {
    Current,
    DueSoon,
    Overdue,
    Unknown,
}

impl CalibrationStatus {
    pub const ALL: [CalibrationStatus; 4] = [
        CalibrationStatus::Current,
        CalibrationStatus::DueSoon,
        CalibrationStatus::Overdue,
        CalibrationStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalibrationStatus::Current => "current",
            CalibrationStatus::DueSoon => "due_soon",
            CalibrationStatus::Overdue => "overdue",
            CalibrationStatus::Unknown => "unknown",
        }
    }

    /// Accepts the wire names plus the human spellings used in the UI
    /// ("due soon", "Due-Soon").
    pub fn from_str(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "current" => Some(CalibrationStatus::Current),
            "due_soon" => Some(CalibrationStatus::DueSoon),
            "overdue" => Some(CalibrationStatus::Overdue),
            "unknown" => Some(CalibrationStatus::Unknown),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CalibrationStatus::Current => "Current",
            CalibrationStatus::DueSoon => "Due Soon",
            CalibrationStatus::Overdue => "Overdue",
            CalibrationStatus::Unknown => "Unknown",
        }
    }

    /// Whether the status warrants an alert (due soon or already overdue).
    pub fn needs_attention(&self) -> bool {
        matches!(self, CalibrationStatus::DueSoon | CalibrationStatus::Overdue)
    }
}

impl fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use crate::classifier::{CalibrationClassification, CalibrationClassifier};
use crate::equipment::{ClassifiedEquipment, EquipmentRecord};
use crate::error::CalibrationError;
use crate::status::CalibrationStatus;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Dashboard filter: optional resolved-date range plus optional status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CalibrationStatus>,
}

impl CalibrationFilter {
    pub fn by_status(status: CalibrationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn between(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
            status: None,
        }
    }

    pub fn validate(&self) -> Result<(), CalibrationError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(CalibrationError::InvalidDateRange { start, end });
            }
        }
        Ok(())
    }

    pub fn has_date_range(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Without a status filter, records with no usable due date stay hidden;
    /// asking for `unknown` is the only way to list them.
    pub fn matches_status(&self, classification: &CalibrationClassification) -> bool {
        match self.status {
            Some(status) => classification.status == status,
            None => classification.status != CalibrationStatus::Unknown,
        }
    }

    /// Undated records pass a range only when no status filter narrows the
    /// query, or when that filter is `unknown`.
    pub fn matches_date_range(&self, classification: &CalibrationClassification) -> bool {
        if !self.has_date_range() {
            return true;
        }
        match classification.resolved_date {
            Some(date) => {
                self.start_date.is_none_or(|start| date >= start)
                    && self.end_date.is_none_or(|end| date <= end)
            }
            None => matches!(self.status, None | Some(CalibrationStatus::Unknown)),
        }
    }

    pub fn matches(&self, classification: &CalibrationClassification) -> bool {
        self.matches_status(classification) && self.matches_date_range(classification)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub generated_at: NaiveDateTime,
    pub due_soon_days: i64,
    pub current: Vec<ClassifiedEquipment>,
    pub due_soon: Vec<ClassifiedEquipment>,
    pub overdue: Vec<ClassifiedEquipment>,
    pub unknown: Vec<ClassifiedEquipment>,
}

impl CalibrationReport {
    pub fn bucket(&self, status: CalibrationStatus) -> &[ClassifiedEquipment] {
        match status {
            CalibrationStatus::Current => &self.current,
            CalibrationStatus::DueSoon => &self.due_soon,
            CalibrationStatus::Overdue => &self.overdue,
            CalibrationStatus::Unknown => &self.unknown,
        }
    }

    pub fn count(&self, status: CalibrationStatus) -> usize {
        self.bucket(status).len()
    }

    pub fn total(&self) -> usize {
        CalibrationStatus::ALL.iter().map(|status| self.count(*status)).sum()
    }

    fn push(&mut self, item: ClassifiedEquipment) {
        let bucket = match item.calibration.status {
            CalibrationStatus::Current => &mut self.current,
            CalibrationStatus::DueSoon => &mut self.due_soon,
            CalibrationStatus::Overdue => &mut self.overdue,
            CalibrationStatus::Unknown => &mut self.unknown,
        };
        bucket.push(item);
    }
}

/// Applies one classifier across a set of equipment records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchClassifier {
    classifier: CalibrationClassifier,
}

impl BatchClassifier {
    pub fn new(classifier: CalibrationClassifier) -> Self {
        Self { classifier }
    }

    pub fn with_threshold(due_soon_days: i64) -> Result<Self, CalibrationError> {
        if due_soon_days < 0 {
            return Err(CalibrationError::InvalidThreshold(due_soon_days));
        }
        Ok(Self::new(CalibrationClassifier::new(due_soon_days)))
    }

    pub fn classifier(&self) -> &CalibrationClassifier {
        &self.classifier
    }

    pub fn classify_one(&self, record: &EquipmentRecord, now: NaiveDateTime) -> ClassifiedEquipment {
        let calibration = record.classify(&self.classifier, now);
        if calibration.status == CalibrationStatus::Unknown {
            if let Some(raw) = record.calibration_due_date.as_deref() {
                debug!(equipment_id = %record.id, raw, "calibration due date not recognised");
            }
        }
        ClassifiedEquipment::new(record.clone(), calibration)
    }

    pub fn classify_all(
        &self,
        records: &[EquipmentRecord],
        now: NaiveDateTime,
    ) -> Vec<ClassifiedEquipment> {
        records
            .iter()
            .map(|record| self.classify_one(record, now))
            .collect()
    }

    /// Records passing `filter`, in input order.
    pub fn filter(
        &self,
        records: &[EquipmentRecord],
        filter: &CalibrationFilter,
        now: NaiveDateTime,
    ) -> Vec<ClassifiedEquipment> {
        records
            .iter()
            .map(|record| self.classify_one(record, now))
            .filter(|item| filter.matches(&item.calibration))
            .collect()
    }

    /// Everything due soon or already overdue.
    pub fn due_soon(
        &self,
        records: &[EquipmentRecord],
        now: NaiveDateTime,
    ) -> Vec<ClassifiedEquipment> {
        records
            .iter()
            .map(|record| self.classify_one(record, now))
            .filter(|item| item.calibration.status.needs_attention())
            .collect()
    }

    pub fn report(&self, records: &[EquipmentRecord], now: NaiveDateTime) -> CalibrationReport {
        let mut report = CalibrationReport {
            generated_at: now,
            due_soon_days: self.classifier.due_soon_days(),
            current: Vec::new(),
            due_soon: Vec::new(),
            overdue: Vec::new(),
            unknown: Vec::new(),
        };
        for record in records {
            report.push(self.classify_one(record, now));
        }
        debug!(
            total = report.total(),
            overdue = report.overdue.len(),
            due_soon = report.due_soon.len(),
            "calibration report built"
        );
        report
    }
}

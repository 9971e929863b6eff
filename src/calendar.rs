use crate::classifier::CalibrationClassifier;
use crate::equipment::EquipmentRecord;
use crate::status::CalibrationStatus;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use icalendar::{Alarm, Calendar, Component, Event, EventLike};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CALENDAR_WINDOW_DAYS: i64 = 90;

/// Reminder offset for subscribed calendar clients.
pub const ICAL_ALARM_DAYS: i64 = 7;

const ICAL_NAME: &str = "Equipment Calibration Deadlines";
const ICAL_DESCRIPTION: &str = "Calendar for equipment calibration deadlines";

/// Last calendar day of `month` in `year`.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(first_of_next - Duration::days(1))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingCalibration {
    pub equipment_id: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    /// The operator's text, for display.
    pub calibration_due_date: String,
    pub due_date: NaiveDate,
    /// Negative once overdue.
    pub days_left: i64,
    pub status: CalibrationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDate,
    pub all_day: bool,
    pub class_name: String,
    pub extended_props: CalendarEventDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub equipment: String,
    pub equipment_id: String,
    pub status: String,
    pub details: String,
}

/// Calendar view: calibrations due inside a forward window, soonest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationCalendar {
    classifier: CalibrationClassifier,
    window_days: i64,
}

impl Default for CalibrationCalendar {
    fn default() -> Self {
        Self::new(CalibrationClassifier::default(), DEFAULT_CALENDAR_WINDOW_DAYS)
    }
}

impl CalibrationCalendar {
    pub fn new(classifier: CalibrationClassifier, window_days: i64) -> Self {
        Self {
            classifier,
            window_days,
        }
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    /// Dated calibrations that are overdue or due within the window.
    pub fn upcoming(
        &self,
        records: &[EquipmentRecord],
        now: NaiveDateTime,
    ) -> Vec<UpcomingCalibration> {
        let mut upcoming: Vec<UpcomingCalibration> = records
            .iter()
            .filter_map(|record| {
                let calibration = record.classify(&self.classifier, now);
                let due_date = calibration.resolved_date?;
                let days_left = calibration.days_left()?;
                if days_left > self.window_days {
                    return None;
                }
                Some(UpcomingCalibration {
                    equipment_id: record.id.clone(),
                    manufacturer: record.manufacturer.clone(),
                    model: record.model.clone(),
                    serial_number: record.serial_number.clone(),
                    calibration_due_date: record.calibration_due_date.clone().unwrap_or_default(),
                    due_date,
                    days_left,
                    status: calibration.status,
                })
            })
            .collect();

        upcoming.sort_by(|a, b| {
            a.days_left
                .cmp(&b.days_left)
                .then_with(|| a.equipment_id.cmp(&b.equipment_id))
        });
        upcoming
    }

    /// Dated calibrations falling in `[start, end]`, ignoring the window.
    pub fn due_in_range(
        &self,
        records: &[EquipmentRecord],
        start: NaiveDate,
        end: NaiveDate,
        now: NaiveDateTime,
    ) -> Vec<UpcomingCalibration> {
        let unbounded = Self::new(self.classifier, i64::MAX);
        unbounded
            .upcoming(records, now)
            .into_iter()
            .filter(|item| item.due_date >= start && item.due_date <= end)
            .collect()
    }

    pub fn events(&self, upcoming: &[UpcomingCalibration]) -> Vec<CalendarEvent> {
        upcoming.iter().map(calendar_event).collect()
    }

    /// Subscription feed: one all-day event per calibration on its resolved
    /// due date, each with a display alarm a week ahead.
    pub fn to_ical(&self, upcoming: &[UpcomingCalibration], now: NaiveDateTime) -> Calendar {
        let mut calendar = Calendar::new();
        calendar
            .name(ICAL_NAME)
            .description(ICAL_DESCRIPTION)
            .append_property(("METHOD", "PUBLISH"));
        for item in upcoming {
            calendar.push(ical_event(item, now));
        }
        calendar.done()
    }
}

fn ical_event(item: &UpcomingCalibration, now: NaiveDateTime) -> Event {
    let equipment = format!("{} {}", item.manufacturer, item.model);
    let description = format!(
        "Equipment: {equipment} ({})\nSerial Number: {}\nCalibration Due: {}",
        item.equipment_id, item.serial_number, item.calibration_due_date
    );

    // Stable per item and due date so feed refreshes update in place.
    Event::new()
        .uid(&format!(
            "cal-{}-{}",
            item.equipment_id,
            item.due_date.format("%Y%m%d")
        ))
        .summary(&format!("Calibration Due: {equipment}"))
        .description(&description)
        .all_day(item.due_date)
        .timestamp(now.and_utc())
        .alarm(Alarm::display(
            &format!("Calibration due soon for {equipment}"),
            -Duration::days(ICAL_ALARM_DAYS),
        ))
        .done()
}

fn calendar_event(item: &UpcomingCalibration) -> CalendarEvent {
    let (label, class_name) = match item.status {
        CalibrationStatus::Overdue => ("Overdue", "event-calibration bg-danger"),
        CalibrationStatus::DueSoon => ("Due Soon", "event-calibration bg-warning"),
        _ => ("Upcoming", "event-calibration"),
    };
    let direction = if item.days_left < 0 { "overdue" } else { "remaining" };

    CalendarEvent {
        id: format!("cal-{}", item.equipment_id),
        title: format!("Calibration: {} {}", item.manufacturer, item.model),
        start: item.due_date,
        all_day: true,
        class_name: class_name.to_string(),
        extended_props: CalendarEventDetails {
            kind: "calibration".to_string(),
            equipment: format!(
                "{} {} ({})",
                item.manufacturer, item.model, item.serial_number
            ),
            equipment_id: item.equipment_id.clone(),
            status: label.to_string(),
            details: format!(
                "Calibration due on {}. {} days {}.",
                item.calibration_due_date,
                item.days_left.abs(),
                direction
            ),
        },
    }
}

//! Interpretation of free-form calibration due-date fields.
//!
//! Operators type anything into the due-date column: `05/2025`,
//! `May 2025`, `7/2023 - water damage`, or just `overdue`. This module
//! turns that text into either a calendar date or an explicit status
//! keyword, without ever failing.

use crate::calendar::last_day_of_month;
use crate::status::CalibrationStatus;
use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// Separator between the date and trailing annotation text.
pub const ANNOTATION_SEPARATOR: &str = " - ";

const OVERDUE_KEYWORD: &str = "overdue";
const DUE_SOON_KEYWORD: &str = "due soon";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `05/2025`
    MonthSlashYear,
    /// `05/15/2025`
    MonthDaySlashYear,
    /// `May 2025`, `September 2025`
    FullMonthNameYear,
    /// `Dec 2025`
    AbbrevMonthNameYear,
    /// `2025-05-15`
    IsoDate,
    /// `15-05-2025`
    DayMonthDashYear,
    /// `05-15-2025`
    MonthDayDashYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePrecision {
    Day,
    Month,
}

impl DateFormat {
    /// Formats are tried in this order; the first match wins. Ambiguous
    /// numeric inputs such as `05-06-2025` resolve to day-month because
    /// `DayMonthDashYear` comes first.
    pub const TRIAL_ORDER: [DateFormat; 7] = [
        DateFormat::MonthSlashYear,
        DateFormat::MonthDaySlashYear,
        DateFormat::FullMonthNameYear,
        DateFormat::AbbrevMonthNameYear,
        DateFormat::IsoDate,
        DateFormat::DayMonthDashYear,
        DateFormat::MonthDayDashYear,
    ];

    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::MonthSlashYear => "MM/YYYY",
            DateFormat::MonthDaySlashYear => "MM/DD/YYYY",
            DateFormat::FullMonthNameYear => "Month YYYY",
            DateFormat::AbbrevMonthNameYear => "Mon YYYY",
            DateFormat::IsoDate => "YYYY-MM-DD",
            DateFormat::DayMonthDashYear => "DD-MM-YYYY",
            DateFormat::MonthDayDashYear => "MM-DD-YYYY",
        }
    }

    pub fn precision(&self) -> DatePrecision {
        match self {
            DateFormat::MonthSlashYear
            | DateFormat::FullMonthNameYear
            | DateFormat::AbbrevMonthNameYear => DatePrecision::Month,
            _ => DatePrecision::Day,
        }
    }

    /// Parse `text` strictly in this format. Month-precision formats
    /// return the first day of the month.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        match self {
            DateFormat::MonthSlashYear => {
                let [month, year] = split_fields::<2>(text, '/')?;
                NaiveDate::from_ymd_opt(year_field(year)?, day_or_month_field(month)?, 1)
            }
            DateFormat::MonthDaySlashYear => {
                let [month, day, year] = split_fields::<3>(text, '/')?;
                ymd(year, month, day)
            }
            DateFormat::FullMonthNameYear => {
                let (name, year) = month_name_and_year(text)?;
                let month = full_month_number(name)?;
                NaiveDate::from_ymd_opt(year_field(year)?, month, 1)
            }
            DateFormat::AbbrevMonthNameYear => {
                let (name, year) = month_name_and_year(text)?;
                let month = abbrev_month_number(name)?;
                NaiveDate::from_ymd_opt(year_field(year)?, month, 1)
            }
            DateFormat::IsoDate => {
                let [year, month, day] = split_fields::<3>(text, '-')?;
                ymd(year, month, day)
            }
            DateFormat::DayMonthDashYear => {
                let [day, month, year] = split_fields::<3>(text, '-')?;
                ymd(year, month, day)
            }
            DateFormat::MonthDayDashYear => {
                let [month, day, year] = split_fields::<3>(text, '-')?;
                ymd(year, month, day)
            }
        }
    }
}

/// How month-precision dates (`05/2025`, `May 2025`) map onto a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthResolution {
    FirstOfMonth,
    /// Calibration stays valid through the stated month.
    #[default]
    LastOfMonth,
}

impl MonthResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonthResolution::FirstOfMonth => "first_of_month",
            MonthResolution::LastOfMonth => "last_of_month",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" | "first_of_month" => Some(MonthResolution::FirstOfMonth),
            "last" | "last_of_month" => Some(MonthResolution::LastOfMonth),
            _ => None,
        }
    }

    pub fn resolve(&self, first_of_month: NaiveDate) -> NaiveDate {
        match self {
            MonthResolution::FirstOfMonth => first_of_month,
            MonthResolution::LastOfMonth => {
                last_day_of_month(first_of_month.year(), first_of_month.month())
                    .unwrap_or(first_of_month)
            }
        }
    }
}

/// A date pulled out of a calibration field, before month resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDate {
    pub date: NaiveDate,
    pub format: DateFormat,
}

impl ParsedDate {
    pub fn precision(&self) -> DatePrecision {
        self.format.precision()
    }

    pub fn resolve(&self, policy: MonthResolution) -> NaiveDate {
        match self.precision() {
            DatePrecision::Day => self.date,
            DatePrecision::Month => policy.resolve(self.date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationField<'a> {
    /// No value, or an empty string.
    Missing,
    /// Text carrying an authoritative status word.
    Keyword(CalibrationStatus),
    Date(ParsedDate),
    /// Text that matched no keyword and no accepted format.
    Unparseable(&'a str),
}

/// Keyword overrides take precedence over any date in the same text.
pub fn interpret(raw: Option<&str>) -> CalibrationField<'_> {
    let Some(raw) = raw.filter(|value| !value.is_empty()) else {
        return CalibrationField::Missing;
    };

    if let Some(status) = status_keyword(raw) {
        return CalibrationField::Keyword(status);
    }

    match parse_date_portion(extract_date_portion(raw)) {
        Some(parsed) => CalibrationField::Date(parsed),
        None => CalibrationField::Unparseable(raw),
    }
}

pub fn status_keyword(raw: &str) -> Option<CalibrationStatus> {
    let lowered = raw.to_lowercase();
    if lowered.contains(OVERDUE_KEYWORD) {
        Some(CalibrationStatus::Overdue)
    } else if lowered.contains(DUE_SOON_KEYWORD) {
        Some(CalibrationStatus::DueSoon)
    } else {
        None
    }
}

/// Drop everything from the first `" - "` onwards.
pub fn extract_date_portion(raw: &str) -> &str {
    match raw.split_once(ANNOTATION_SEPARATOR) {
        Some((date, _annotation)) => date.trim(),
        None => raw.trim(),
    }
}

pub fn parse_date_portion(text: &str) -> Option<ParsedDate> {
    DateFormat::TRIAL_ORDER
        .iter()
        .find_map(|format| format.parse(text).map(|date| ParsedDate { date, format: *format }))
}

fn split_fields<const N: usize>(text: &str, separator: char) -> Option<[&str; N]> {
    let mut fields = [""; N];
    let mut parts = text.split(separator);
    for slot in fields.iter_mut() {
        *slot = parts.next()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}

fn all_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

fn day_or_month_field(field: &str) -> Option<u32> {
    if field.len() > 2 || !all_digits(field) {
        return None;
    }
    field.parse().ok()
}

fn year_field(field: &str) -> Option<i32> {
    if field.len() != 4 || !all_digits(field) {
        return None;
    }
    field.parse().ok()
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year_field(year)?, day_or_month_field(month)?, day_or_month_field(day)?)
}

fn month_name_and_year(text: &str) -> Option<(&str, &str)> {
    let mut tokens = text.split_whitespace();
    let name = tokens.next()?;
    let year = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((name, year))
}

fn full_month_number(name: &str) -> Option<u32> {
    let month: Month = name.parse().ok()?;
    month
        .name()
        .eq_ignore_ascii_case(name)
        .then_some(month.number_from_month())
}

/// Exactly three letters; `Sept` is not an abbreviation.
fn abbrev_month_number(name: &str) -> Option<u32> {
    if name.len() != 3 {
        return None;
    }
    name.parse::<Month>().ok().map(|month| month.number_from_month())
}

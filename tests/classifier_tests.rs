use calibration_tracker::{
    CalibrationClassification, CalibrationClassifier, CalibrationStatus, MonthResolution, classify,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, day: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(0, 0, 0).unwrap()
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[test]
fn missing_and_empty_fields_are_unknown() {
    let now = at(2025, 5, 1);
    assert_eq!(classify(None, now, 30), CalibrationClassification::unknown());
    assert_eq!(classify(Some(""), now, 30), CalibrationClassification::unknown());
}

#[test]
fn unparseable_text_is_unknown_without_numbers() {
    let result = classify(Some("N/A"), at(2025, 5, 1), 30);
    assert_eq!(result.status, CalibrationStatus::Unknown);
    assert_eq!(result.resolved_date, None);
    assert_eq!(result.days_overdue, None);
    assert_eq!(result.days_until_due, None);
}

#[test]
fn overdue_keyword_overrides_a_parseable_date() {
    let result = classify(Some("05/2025 - overdue due to repair"), at(2025, 1, 1), 30);
    assert_eq!(result.status, CalibrationStatus::Overdue);
    assert_eq!(result.resolved_date, None);
    assert_eq!(result.days_overdue, None);
    assert_eq!(result.days_until_due, None);
}

#[test]
fn due_soon_keyword_carries_no_numeric_fields() {
    let result = classify(Some("Due Soon"), at(2031, 7, 19), 30);
    assert_eq!(result.status, CalibrationStatus::DueSoon);
    assert_eq!(result.resolved_date, None);
    assert_eq!(result.days_overdue, None);
    assert_eq!(result.days_until_due, None);
    assert_eq!(result.days_left(), None);
}

#[test]
fn annotation_is_ignored_and_month_date_resolves_to_month_end() {
    let result = classify(Some("05/2025 - repaired"), at(2025, 4, 1), 30);
    assert_eq!(result.resolved_date, Some(d(2025, 5, 31)));
    assert_eq!(result.status, CalibrationStatus::Current);
    assert_eq!(result.days_until_due, Some(60));
}

#[test]
fn iso_date_two_weeks_out_is_due_soon() {
    let result = classify(Some("2025-05-15"), at(2025, 5, 1), 30);
    assert_eq!(result.status, CalibrationStatus::DueSoon);
    assert_eq!(result.days_until_due, Some(14));
    assert_eq!(result.days_overdue, None);
}

#[test]
fn every_format_classifies_against_now() {
    let now = at(2025, 5, 1);
    let inputs = [
        ("05/2025", d(2025, 5, 31)),
        ("05/15/2025", d(2025, 5, 15)),
        ("May 2025", d(2025, 5, 31)),
        ("Dec 2025", d(2025, 12, 31)),
        ("2025-05-15", d(2025, 5, 15)),
        ("15-05-2025", d(2025, 5, 15)),
        ("05-15-2025", d(2025, 5, 15)),
    ];
    for (raw, expected) in inputs {
        let result = classify(Some(raw), now, 30);
        assert_eq!(result.resolved_date, Some(expected), "resolved date for {raw}");
        assert!(result.days_until_due.is_some(), "days_until_due for {raw}");
    }
}

#[test]
fn threshold_boundary_is_inclusive() {
    let now = at(2025, 3, 1);
    let thirty = iso(now.date() + Duration::days(30));
    let thirty_one = iso(now.date() + Duration::days(31));

    let at_threshold = classify(Some(&thirty), now, 30);
    assert_eq!(at_threshold.status, CalibrationStatus::DueSoon);
    assert_eq!(at_threshold.days_until_due, Some(30));

    let past_threshold = classify(Some(&thirty_one), now, 30);
    assert_eq!(past_threshold.status, CalibrationStatus::Current);
    assert_eq!(past_threshold.days_until_due, Some(31));
}

#[test]
fn due_today_is_due_soon_and_yesterday_is_overdue() {
    let now = at(2025, 3, 10);

    let today = classify(Some("2025-03-10"), now, 30);
    assert_eq!(today.status, CalibrationStatus::DueSoon);
    assert_eq!(today.days_until_due, Some(0));

    let yesterday = classify(Some("2025-03-09"), now, 30);
    assert_eq!(yesterday.status, CalibrationStatus::Overdue);
    assert_eq!(yesterday.days_overdue, Some(1));
    assert_eq!(yesterday.days_until_due, None);
    assert_eq!(yesterday.days_left(), Some(-1));
}

#[test]
fn partial_days_truncate_toward_zero() {
    let afternoon = d(2025, 3, 10).and_hms_opt(15, 30, 0).unwrap();

    // Midnight earlier the same day is 15.5 hours back: still day zero.
    let same_day = classify(Some("2025-03-10"), afternoon, 30);
    assert_eq!(same_day.status, CalibrationStatus::DueSoon);
    assert_eq!(same_day.days_until_due, Some(0));

    // 2.35 days ahead truncates to 2.
    let ahead = classify(Some("2025-03-13"), afternoon, 30);
    assert_eq!(ahead.days_until_due, Some(2));

    // 1.65 days back truncates to 1.
    let behind = classify(Some("2025-03-09"), afternoon, 30);
    assert_eq!(behind.status, CalibrationStatus::Overdue);
    assert_eq!(behind.days_overdue, Some(1));
}

#[test]
fn caller_supplied_thresholds_change_the_window() {
    let now = at(2025, 1, 1);
    let raw = Some("2025-03-02"); // 60 days out
    assert_eq!(classify(raw, now, 30).status, CalibrationStatus::Current);
    assert_eq!(classify(raw, now, 60).status, CalibrationStatus::DueSoon);
    assert_eq!(classify(raw, now, 90).status, CalibrationStatus::DueSoon);
    assert_eq!(classify(raw, now, 0).status, CalibrationStatus::Current);
}

#[test]
fn negative_threshold_classifies_without_panicking() {
    let result = std::panic::catch_unwind(|| classify(Some("2025-05-01"), at(2025, 5, 1), -1));
    let classification = result.expect("negative window must not panic");
    // A non-negative delta never falls inside a negative window.
    assert_eq!(classification.status, CalibrationStatus::Current);
    assert_eq!(classification.days_until_due, Some(0));
    assert_eq!(
        classify(Some("2025-04-30"), at(2025, 5, 1), -1).status,
        CalibrationStatus::Overdue
    );
}

#[test]
fn first_of_month_policy_is_applied_consistently() {
    let classifier =
        CalibrationClassifier::new(30).with_month_resolution(MonthResolution::FirstOfMonth);
    let now = at(2025, 5, 15);

    let result = classifier.classify(Some("05/2025"), now);
    assert_eq!(result.resolved_date, Some(d(2025, 5, 1)));
    assert_eq!(result.status, CalibrationStatus::Overdue);
    assert_eq!(result.days_overdue, Some(14));

    let named = classifier.classify(Some("May 2025"), now);
    assert_eq!(named, result);
    assert_eq!(classifier.resolve_date(Some("Dec 2025")), Some(d(2025, 12, 1)));
}

#[test]
fn classification_is_pure() {
    let classifier = CalibrationClassifier::default();
    let now = at(2025, 6, 30);
    for raw in [None, Some("07/2025"), Some("overdue"), Some("junk"), Some("2025-06-01")] {
        assert_eq!(classifier.classify(raw, now), classifier.classify(raw, now));
    }
}

#[test]
fn serialized_classification_omits_absent_fields() {
    let result = classify(Some("due soon"), at(2025, 1, 1), 30);
    let json = serde_json::to_value(result).unwrap();
    assert_eq!(json, serde_json::json!({ "status": "due_soon" }));

    let dated = classify(Some("2025-01-11"), at(2025, 1, 1), 30);
    let json = serde_json::to_value(dated).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "status": "due_soon",
            "days_until_due": 10,
            "resolved_date": "2025-01-11"
        })
    );
}

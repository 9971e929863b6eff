use calibration_tracker::{
    BatchClassifier, CalibrationError, CalibrationFilter, CalibrationStatus, EquipmentRecord,
};
use chrono::{NaiveDate, NaiveDateTime};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> NaiveDateTime {
    d(2025, 5, 1).and_hms_opt(9, 0, 0).unwrap()
}

fn record(id: &str, due: Option<&str>) -> EquipmentRecord {
    let record = EquipmentRecord::new(id).with_description("PTW", "Farmer 30013", format!("SN-{id}"));
    match due {
        Some(due) => record.with_due_date(due),
        None => record,
    }
}

fn sample_inventory() -> Vec<EquipmentRecord> {
    vec![
        record("chamber-1", Some("2025-03-01")),        // overdue
        record("chamber-2", Some("2025-05-20")),        // due soon
        record("electrometer-1", Some("12/2025")),      // current
        record("survey-1", None),                       // unknown, missing
        record("survey-2", Some("ask physics")),        // unknown, unparseable
        record("chamber-3", Some("OVERDUE - at vendor")), // overdue keyword
        record("chamber-4", Some("due soon")),          // due soon keyword
    ]
}

fn ids(items: &[calibration_tracker::ClassifiedEquipment]) -> Vec<&str> {
    items.iter().map(|item| item.id()).collect()
}

#[test]
fn status_unknown_filter_returns_only_the_unknown_record() {
    let records = vec![
        record("a", Some("2025-04-01")),
        record("b", Some("2025-05-10")),
        record("c", None),
    ];
    let batch = BatchClassifier::default();
    let filtered = batch.filter(&records, &CalibrationFilter::by_status(CalibrationStatus::Unknown), now());
    assert_eq!(ids(&filtered), vec!["c"]);
    assert_eq!(filtered[0].calibration.status, CalibrationStatus::Unknown);
}

#[test]
fn no_filter_hides_unknown_records() {
    let batch = BatchClassifier::default();
    let filtered = batch.filter(&sample_inventory(), &CalibrationFilter::default(), now());
    assert_eq!(
        ids(&filtered),
        vec!["chamber-1", "chamber-2", "electrometer-1", "chamber-3", "chamber-4"]
    );
}

#[test]
fn status_filter_matches_keyword_and_dated_records() {
    let batch = BatchClassifier::default();
    let overdue = batch.filter(
        &sample_inventory(),
        &CalibrationFilter::by_status(CalibrationStatus::Overdue),
        now(),
    );
    assert_eq!(ids(&overdue), vec!["chamber-1", "chamber-3"]);
    assert_eq!(overdue[0].calibration.days_overdue, Some(61));
    assert_eq!(overdue[1].calibration.days_overdue, None);
}

#[test]
fn date_range_applies_to_resolved_dates_and_keeps_undated_keywords() {
    let batch = BatchClassifier::default();
    let filter = CalibrationFilter::between(Some(d(2025, 5, 1)), Some(d(2025, 6, 30)));
    let filtered = batch.filter(&sample_inventory(), &filter, now());
    // chamber-2 is in range; keyword records have no date and no status
    // filter is active, so they pass the range.
    assert_eq!(ids(&filtered), vec!["chamber-2", "chamber-3", "chamber-4"]);
}

#[test]
fn date_range_with_status_filter_drops_undated_records() {
    let batch = BatchClassifier::default();
    let filter = CalibrationFilter {
        start_date: Some(d(2025, 1, 1)),
        end_date: Some(d(2025, 12, 31)),
        status: Some(CalibrationStatus::Overdue),
    };
    let filtered = batch.filter(&sample_inventory(), &filter, now());
    assert_eq!(ids(&filtered), vec!["chamber-1"]);
}

#[test]
fn unknown_status_filter_ignores_date_range() {
    let batch = BatchClassifier::default();
    let filter = CalibrationFilter {
        start_date: Some(d(2025, 1, 1)),
        end_date: None,
        status: Some(CalibrationStatus::Unknown),
    };
    let filtered = batch.filter(&sample_inventory(), &filter, now());
    assert_eq!(ids(&filtered), vec!["survey-1", "survey-2"]);
}

#[test]
fn range_bounds_are_inclusive() {
    let batch = BatchClassifier::default();
    let filter = CalibrationFilter {
        start_date: Some(d(2025, 12, 31)),
        end_date: Some(d(2025, 12, 31)),
        status: Some(CalibrationStatus::Current),
    };
    let filtered = batch.filter(&sample_inventory(), &filter, now());
    assert_eq!(ids(&filtered), vec!["electrometer-1"]);
}

#[test]
fn filter_validation_rejects_inverted_range() {
    let filter = CalibrationFilter::between(Some(d(2025, 6, 1)), Some(d(2025, 5, 1)));
    assert!(matches!(
        filter.validate(),
        Err(CalibrationError::InvalidDateRange { .. })
    ));
    assert!(CalibrationFilter::default().validate().is_ok());
}

#[test]
fn due_soon_lists_due_soon_and_overdue() {
    let batch = BatchClassifier::default();
    let flagged = batch.due_soon(&sample_inventory(), now());
    assert_eq!(
        ids(&flagged),
        vec!["chamber-1", "chamber-2", "chamber-3", "chamber-4"]
    );
}

#[test]
fn report_buckets_every_record_once() {
    let batch = BatchClassifier::with_threshold(30).unwrap();
    let records = sample_inventory();
    let report = batch.report(&records, now());

    assert_eq!(report.total(), records.len());
    assert_eq!(report.count(CalibrationStatus::Overdue), 2);
    assert_eq!(report.count(CalibrationStatus::DueSoon), 2);
    assert_eq!(report.count(CalibrationStatus::Current), 1);
    assert_eq!(report.count(CalibrationStatus::Unknown), 2);
    assert_eq!(report.due_soon_days, 30);
    assert_eq!(report.generated_at, now());
}

#[test]
fn wider_threshold_moves_records_into_due_soon() {
    let records = vec![record("x", Some("2025-07-15"))];
    let default = BatchClassifier::default().report(&records, now());
    let wide = BatchClassifier::with_threshold(90).unwrap().report(&records, now());
    assert_eq!(default.count(CalibrationStatus::Current), 1);
    assert_eq!(wide.count(CalibrationStatus::DueSoon), 1);
}

#[test]
fn negative_threshold_is_rejected_at_the_boundary() {
    assert!(matches!(
        BatchClassifier::with_threshold(-1),
        Err(CalibrationError::InvalidThreshold(-1))
    ));
}

#[test]
fn classification_is_not_written_back_to_records() {
    let records = sample_inventory();
    let before = records.clone();
    let _ = BatchClassifier::default().classify_all(&records, now());
    assert_eq!(records, before);
}

#[test]
fn batch_results_are_repeatable() {
    let records = sample_inventory();
    let batch = BatchClassifier::default();
    assert_eq!(batch.report(&records, now()), batch.report(&records, now()));
}

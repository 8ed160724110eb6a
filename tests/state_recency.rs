use covid_testing_report::report::{REPORT_COLUMNS, StateReport};
use covid_testing_report::reshape::ReshapedRecord;
use time::{Date, Month};

fn day(d: u8) -> Date {
    Date::from_calendar_date(2021, Month::June, d).unwrap()
}

fn rec(state: &str, d: u8) -> ReshapedRecord {
    ReshapedRecord {
        date: day(d),
        state_name: state.into(),
        new_positive: Some(d as i64),
        total_positive: Some(100 + d as i64),
        new_negative: None,
        total_negative: Some(200 + d as i64),
    }
}

#[test]
fn keeps_latest_five_in_ascending_order() {
    // Shuffled on purpose; the report sorts.
    let records: Vec<_> = [9u8, 2, 7, 1, 5, 3, 8, 4, 6]
        .iter()
        .map(|d| rec("Ohio", *d))
        .chain([rec("Iowa", 20), rec("Iowa", 21)])
        .collect();

    let report = StateReport::select(&records, "Ohio", day(30), 5);
    let dates: Vec<_> = report.rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![day(5), day(6), day(7), day(8), day(9)]);
}

#[test]
fn fewer_than_five_keeps_all() {
    let records = vec![rec("Ohio", 3), rec("Ohio", 1), rec("Iowa", 2)];
    let report = StateReport::select(&records, "Ohio", day(30), 5);
    let dates: Vec<_> = report.rows.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![day(1), day(3)]);
}

#[test]
fn missing_state_is_empty_not_an_error() {
    let records = vec![rec("Ohio", 3)];
    let report = StateReport::select(&records, "Wyoming", day(30), 5);
    assert_eq!(report.state, "Wyoming");
    assert!(report.rows.is_empty());
    assert!(report.body("N/A").is_empty());
}

#[test]
fn cells_drop_state_and_mark_missing_values() {
    let report = StateReport::select(&[rec("Ohio", 3)], "Ohio", day(30), 5);
    let body = report.body("N/A");
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].len(), REPORT_COLUMNS.len());
    assert_eq!(body[0], vec!["2021-06-03", "3", "103", "N/A", "203"]);
    assert!(!REPORT_COLUMNS.contains(&"state_name"));
}

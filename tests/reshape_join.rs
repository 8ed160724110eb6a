use covid_testing_report::reshape::{ReshapedRecord, reshape};
use covid_testing_report::source::{Outcome, RawObservation};
use std::collections::HashSet;
use time::{Date, Month};

fn day(m: Month, d: u8) -> Date {
    Date::from_calendar_date(2021, m, d).unwrap()
}

fn obs(state: &str, outcome: &str, date: Date, new: i64, total: i64) -> RawObservation {
    RawObservation {
        state_name: state.into(),
        outcome: Outcome::classify(outcome),
        date,
        new_results_reported: new,
        total_results_reported: total,
    }
}

#[test]
fn one_sided_pair_keeps_nulls() {
    let rows = vec![obs("Ohio", "Positive", day(Month::January, 1), 10, 100)];
    let out = reshape(&rows);
    assert_eq!(
        out,
        vec![ReshapedRecord {
            date: day(Month::January, 1),
            state_name: "Ohio".into(),
            new_positive: Some(10),
            total_positive: Some(100),
            new_negative: None,
            total_negative: None,
        }]
    );
    assert_eq!(out[0].date_string(), "2021-01-01");
}

#[test]
fn both_sides_join_into_one_row() {
    let rows = vec![
        obs("Ohio", "Positive", day(Month::March, 1), 5, 50),
        obs("Ohio", "Negative", day(Month::March, 1), 2, 20),
    ];
    let out = reshape(&rows);
    assert_eq!(out.len(), 1);
    let r = &out[0];
    assert_eq!(r.date_string(), "2021-03-01");
    assert_eq!(r.state_name, "Ohio");
    assert_eq!(
        (r.new_positive, r.total_positive, r.new_negative, r.total_negative),
        (Some(5), Some(50), Some(2), Some(20))
    );
}

#[test]
fn negative_only_pair_has_null_positive_not_zero() {
    let rows = vec![obs("Texas", "Negative", day(Month::May, 2), 0, 7)];
    let out = reshape(&rows);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].new_positive, None);
    assert_eq!(out[0].total_positive, None);
    assert_eq!(out[0].new_negative, Some(0));
    assert_eq!(out[0].total_negative, Some(7));
}

#[test]
fn other_outcomes_never_appear() {
    let rows = vec![
        obs("Ohio", "Inconclusive", day(Month::March, 1), 1, 1),
        obs("Utah", "Inconclusive", day(Month::March, 2), 1, 1),
        obs("Utah", "Negative", day(Month::March, 2), 3, 30),
    ];
    let out = reshape(&rows);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].state_name, "Utah");
    assert!(out.iter().all(|r| r.state_name != "Ohio"));
}

#[test]
fn every_key_appears_exactly_once() {
    let states = ["Ohio", "Iowa", "Maine"];
    let mut rows = Vec::new();
    let mut expected = HashSet::new();
    for (i, state) in states.iter().enumerate() {
        for d in 1..=10u8 {
            let date = day(Month::April, d);
            // Vary which polarities are present per key.
            match (d as usize + i) % 3 {
                0 => rows.push(obs(state, "Positive", date, d as i64, 10 * d as i64)),
                1 => rows.push(obs(state, "Negative", date, d as i64, 10 * d as i64)),
                _ => {
                    rows.push(obs(state, "Positive", date, 1, 1));
                    rows.push(obs(state, "Negative", date, 2, 2));
                }
            }
            rows.push(obs(state, "Inconclusive", date, 9, 9));
            expected.insert((date, state.to_string()));
        }
    }

    let out = reshape(&rows);
    assert_eq!(out.len(), expected.len());
    let keys: HashSet<_> = out.iter().map(|r| (r.date, r.state_name.clone())).collect();
    assert_eq!(keys, expected);
    for r in &out {
        assert_eq!(r.new_positive.is_some(), r.total_positive.is_some());
        assert_eq!(r.new_negative.is_some(), r.total_negative.is_some());
        assert!(r.new_positive.is_some() || r.new_negative.is_some());
    }
}

#[test]
fn empty_input_gives_empty_table() {
    assert!(reshape(&[]).is_empty());
}

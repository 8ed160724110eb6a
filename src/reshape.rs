//! Long-to-wide reshaping of raw outcome rows.
//!
//! Raw rows carry one outcome per line. The reshaped table carries one line
//! per (date, state) with positive and negative counts side by side, joined
//! as a full outer join so a missing side stays `None` rather than zero.

use crate::source::{Outcome, RawObservation};
use crate::util::format_date;
use std::collections::BTreeMap;
use time::Date;
use tracing::{debug, info};

pub const COL_DATE: &str = "Date";
pub const COL_NEW_POSITIVE: &str = "New Positive Tests Reported";
pub const COL_TOTAL_POSITIVE: &str = "Total Positive Tests Reported";
pub const COL_NEW_NEGATIVE: &str = "New Negative Tests Reported";
pub const COL_TOTAL_NEGATIVE: &str = "Total Negative Tests Reported";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReshapedRecord {
    pub date: Date,
    pub state_name: String,
    pub new_positive: Option<i64>,
    pub total_positive: Option<i64>,
    pub new_negative: Option<i64>,
    pub total_negative: Option<i64>,
}

impl ReshapedRecord {
    fn empty(date: Date, state_name: &str) -> Self {
        Self {
            date,
            state_name: state_name.to_string(),
            new_positive: None,
            total_positive: None,
            new_negative: None,
            total_negative: None,
        }
    }

    /// ISO calendar date, no time component.
    pub fn date_string(&self) -> String {
        format_date(self.date)
    }
}

/// One polarity's projection of a raw row.
struct Projected<'a> {
    date: Date,
    state_name: &'a str,
    new: i64,
    total: i64,
}

fn project<'a>(rows: &'a [RawObservation], polarity: &Outcome) -> Vec<Projected<'a>> {
    rows.iter()
        .filter(|r| &r.outcome == polarity)
        .map(|r| Projected {
            date: r.date,
            state_name: &r.state_name,
            new: r.new_results_reported,
            total: r.total_results_reported,
        })
        .collect()
}

/// Outer-join positive and negative rows on (date, state_name).
///
/// Output is ordered by (date, state_name). Duplicate (date, state, outcome)
/// rows are not deduplicated; the last one read wins.
pub fn reshape(rows: &[RawObservation]) -> Vec<ReshapedRecord> {
    let positive = project(rows, &Outcome::Positive);
    let negative = project(rows, &Outcome::Negative);

    let dropped = rows.len() - positive.len() - negative.len();
    if dropped > 0 {
        debug!("dropped {dropped} rows with non-reportable outcomes");
    }

    let mut joined: BTreeMap<(Date, &str), ReshapedRecord> = BTreeMap::new();

    for p in positive {
        let rec = joined
            .entry((p.date, p.state_name))
            .or_insert_with(|| ReshapedRecord::empty(p.date, p.state_name));
        rec.new_positive = Some(p.new);
        rec.total_positive = Some(p.total);
    }
    for n in negative {
        let rec = joined
            .entry((n.date, n.state_name))
            .or_insert_with(|| ReshapedRecord::empty(n.date, n.state_name));
        rec.new_negative = Some(n.new);
        rec.total_negative = Some(n.total);
    }

    let out: Vec<ReshapedRecord> = joined.into_values().collect();
    info!("reshaped {} raw rows into {} records", rows.len(), out.len());
    out
}

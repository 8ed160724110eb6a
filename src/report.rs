use crate::reshape::{
    COL_DATE, COL_NEW_NEGATIVE, COL_NEW_POSITIVE, COL_TOTAL_NEGATIVE, COL_TOTAL_POSITIVE,
    ReshapedRecord,
};
use crate::util::format_date;
use serde::Serialize;
use time::Date;

/// Column order of a per-state table (`state_name` dropped).
pub const REPORT_COLUMNS: [&str; 5] = [
    COL_DATE,
    COL_NEW_POSITIVE,
    COL_TOTAL_POSITIVE,
    COL_NEW_NEGATIVE,
    COL_TOTAL_NEGATIVE,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub date: Date,
    pub new_positive: Option<i64>,
    pub total_positive: Option<i64>,
    pub new_negative: Option<i64>,
    pub total_negative: Option<i64>,
}

impl ReportRow {
    pub fn cells(&self, missing: &str) -> Vec<String> {
        let cell = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_else(|| missing.to_string());
        vec![
            format_date(self.date),
            cell(self.new_positive),
            cell(self.total_positive),
            cell(self.new_negative),
            cell(self.total_negative),
        ]
    }
}

impl From<&ReshapedRecord> for ReportRow {
    fn from(r: &ReshapedRecord) -> Self {
        Self {
            date: r.date,
            new_positive: r.new_positive,
            total_positive: r.total_positive,
            new_negative: r.new_negative,
            total_negative: r.total_negative,
        }
    }
}

/// The most recent rows for one state, ascending by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateReport {
    pub state: String,
    pub run_date: Date,
    pub rows: Vec<ReportRow>,
}

impl StateReport {
    /// Filter to `state`, sort by date and keep the last `recent_days` rows.
    /// A state with no rows yields an empty report.
    pub fn select(records: &[ReshapedRecord], state: &str, run_date: Date, recent_days: usize) -> Self {
        let mut rows: Vec<ReportRow> = records
            .iter()
            .filter(|r| r.state_name == state)
            .map(ReportRow::from)
            .collect();
        rows.sort_by_key(|r| r.date);
        let skip = rows.len().saturating_sub(recent_days);
        rows.drain(..skip);

        Self {
            state: state.to_string(),
            run_date,
            rows,
        }
    }

    pub fn body(&self, missing: &str) -> Vec<Vec<String>> {
        self.rows.iter().map(|r| r.cells(missing)).collect()
    }
}

/// Per-run summary printed when `global.print_summary` is set.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub status: String,
    pub run_date: String,
    pub archive: String,
    pub sha256: String,
    pub entries: usize,
    pub raw_rows: usize,
    pub reshaped_rows: usize,
}

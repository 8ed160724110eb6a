use crate::error::PipelineError;
use crate::util::parse_date;
use serde::Deserialize;
use time::Date;

/// Polarity of a test result row. Only `Positive` and `Negative` are
/// reportable; `Other` rows are dropped by the reshaper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Positive,
    Negative,
    Other(String),
}

impl Outcome {
    pub fn classify(raw: &str) -> Self {
        match raw {
            "Positive" => Outcome::Positive,
            "Negative" => Outcome::Negative,
            other => Outcome::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObservation {
    pub state_name: String,
    pub outcome: Outcome,
    pub date: Date,
    pub new_results_reported: i64,
    pub total_results_reported: i64,
}

/// One row as it appears on the wire. Socrata serialises every column as a
/// string; saved exports may carry plain numbers instead.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    pub state_name: Option<String>,
    pub overall_outcome: Option<String>,
    pub date: Option<String>,
    pub new_results_reported: Option<serde_json::Value>,
    pub total_results_reported: Option<serde_json::Value>,
}

impl RawRow {
    pub fn into_observation(self, index: usize) -> Result<RawObservation, PipelineError> {
        let missing = |field: &str| {
            PipelineError::SourceDataInvalid(format!("row {index}: missing field `{field}`"))
        };

        let state_name = self.state_name.ok_or_else(|| missing("state_name"))?;
        let outcome = self.overall_outcome.ok_or_else(|| missing("overall_outcome"))?;
        let raw_date = self.date.ok_or_else(|| missing("date"))?;
        let date = parse_date(&raw_date).ok_or_else(|| {
            PipelineError::SourceDataInvalid(format!("row {index}: invalid date '{raw_date}'"))
        })?;

        let new_results_reported =
            integer_field(index, "new_results_reported", self.new_results_reported)?;
        let total_results_reported =
            integer_field(index, "total_results_reported", self.total_results_reported)?;

        Ok(RawObservation {
            state_name,
            outcome: Outcome::classify(&outcome),
            date,
            new_results_reported,
            total_results_reported,
        })
    }
}

/// Decode a JSON array of rows into observations.
pub fn parse_rows(body: &[u8]) -> Result<Vec<RawObservation>, PipelineError> {
    let rows: Vec<RawRow> = serde_json::from_slice(body).map_err(|e| {
        PipelineError::SourceDataInvalid(format!("expected a JSON array of rows: {e}"))
    })?;
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| row.into_observation(i))
        .collect()
}

fn integer_field(
    index: usize,
    field: &str,
    value: Option<serde_json::Value>,
) -> Result<i64, PipelineError> {
    let value = value.ok_or_else(|| {
        PipelineError::SourceDataInvalid(format!("row {index}: missing field `{field}`"))
    })?;
    integer_like(&value).ok_or_else(|| {
        PipelineError::SourceDataInvalid(format!(
            "row {index}: `{field}` is not an integer: {value}"
        ))
    })
}

fn integer_like(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| whole(n.as_f64()?)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| whole(s.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

fn whole(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

use crate::{
    error::PipelineError,
    render::DocumentRenderer,
    reporter::{ReportArchive, Reporter},
    reshape::reshape,
    source::Source,
};
use std::time::Instant;
use time::Date;
use tracing::info;

/// Fetch -> reshape -> report, strictly in sequence.
pub struct Pipeline<S: Source, R: DocumentRenderer> {
    source: S,
    reporter: Reporter<R>,
}

pub struct RunOutput {
    pub archive: ReportArchive,
    pub raw_rows: usize,
    pub reshaped_rows: usize,
}

impl<S: Source, R: DocumentRenderer> Pipeline<S, R> {
    pub fn new(source: S, reporter: Reporter<R>) -> Self {
        Self { source, reporter }
    }

    pub fn run(&self, run_date: Date) -> Result<RunOutput, PipelineError> {
        let started = Instant::now();

        let raw = self.source.fetch()?;
        info!("fetched {} raw rows", raw.len());

        let records = reshape(&raw);

        let archive = self.reporter.build_reports(&records, run_date)?;

        info!(
            "run complete in {:.1}s: {} reports",
            started.elapsed().as_secs_f64(),
            archive.entries.len()
        );

        Ok(RunOutput {
            archive,
            raw_rows: raw.len(),
            reshaped_rows: records.len(),
        })
    }
}

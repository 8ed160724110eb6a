use thiserror::Error;

/// Failures that abort a report run.
///
/// Each variant maps to its own process exit code so callers can tell a
/// source problem from a rendering or packaging problem.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("invalid source data: {0}")]
    SourceDataInvalid(String),

    #[error("report generation failed for {state}")]
    ReportGenerationFailed {
        state: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("archive write failed")]
    ArchiveWriteFailed(#[source] anyhow::Error),
}

impl PipelineError {
    pub fn report_failed(state: &str, source: impl Into<anyhow::Error>) -> Self {
        Self::ReportGenerationFailed {
            state: state.to_string(),
            source: source.into(),
        }
    }

    pub fn archive_failed(source: impl Into<anyhow::Error>) -> Self {
        Self::ArchiveWriteFailed(source.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SourceUnavailable(_) => 3,
            Self::SourceDataInvalid(_) => 4,
            Self::ReportGenerationFailed { .. } => 5,
            Self::ArchiveWriteFailed(_) => 6,
        }
    }
}

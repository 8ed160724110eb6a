use super::{RawObservation, Source, parse_rows};
use crate::error::PipelineError;
use std::path::PathBuf;
use tracing::info;

/// Reads a saved JSON export (same shape as the API response).
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Source for FileSource {
    fn fetch(&self) -> Result<Vec<RawObservation>, PipelineError> {
        let body = std::fs::read(&self.path).map_err(|e| {
            PipelineError::SourceUnavailable(format!("reading {}: {e}", self.path.display()))
        })?;
        let rows = parse_rows(&body)?;
        info!("read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

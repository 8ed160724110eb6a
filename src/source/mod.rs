pub mod file;
pub mod socrata;
pub mod types;

use crate::error::PipelineError;

pub use file::FileSource;
pub use socrata::SocrataSource;
pub use types::{Outcome, RawObservation, parse_rows};

/// Bulk provider of raw testing rows. One call returns the whole data set.
pub trait Source {
    fn fetch(&self) -> Result<Vec<RawObservation>, PipelineError>;
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn fetch(&self) -> Result<Vec<RawObservation>, PipelineError> {
        (**self).fetch()
    }
}

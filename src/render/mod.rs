pub mod docx;

use crate::report::StateReport;
use anyhow::Result;

pub use docx::{DocxRenderer, DocxStyle};

/// Turns one state's table into a document file.
pub trait DocumentRenderer {
    /// File extension of the produced documents, without the dot.
    fn extension(&self) -> &str;
    fn render(&self, report: &StateReport) -> Result<Vec<u8>>;
}

impl<R: DocumentRenderer + ?Sized> DocumentRenderer for Box<R> {
    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn render(&self, report: &StateReport) -> Result<Vec<u8>> {
        (**self).render(report)
    }
}

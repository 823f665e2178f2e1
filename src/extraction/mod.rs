//! Statement extraction.
//!
//! An extractor turns a source document into [`PeriodRecords`]: the two
//! period collections and the identity fields of the statement holder.
//! Malformed rows are dropped here; the engine assumes every record it
//! receives has well-formed dates.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use inps_contributions::extraction::extractor_for;
//!
//! let path = Path::new("estratto.pdf");
//! let records = extractor_for(path)?.extract(path)?;
//! println!("{} periods", records.len());
//! # Ok::<(), inps_contributions::error::EngineError>(())
//! ```

mod json;
mod pdf;
mod text;

use std::path::Path;

use crate::error::EngineResult;
use crate::models::PeriodRecords;

pub use json::{JsonRecordsExtractor, write_records_dump};
pub use pdf::PdfStatementExtractor;
pub use text::{StatementTextParser, parse_statement_text};

/// A source of period records.
pub trait StatementExtractor {
    /// Extracts the period records of one document.
    fn extract(&self, path: &Path) -> EngineResult<PeriodRecords>;
}

/// Picks an extractor by file extension: `.json` dumps are reloaded, anything
/// else is read as a PDF statement.
pub fn extractor_for(path: &Path) -> EngineResult<Box<dyn StatementExtractor>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(Box::new(JsonRecordsExtractor))
    } else {
        Ok(Box::new(PdfStatementExtractor::new()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_extractor_for_json_dump() {
        let result = extractor_for(Path::new("/nonexistent/ROSSI MARIO.JSON"))
            .unwrap()
            .extract(Path::new("/nonexistent/ROSSI MARIO.JSON"));
        // The JSON extractor reports a missing dump as a missing document.
        assert!(matches!(result, Err(EngineError::DocumentNotFound { .. })));
    }

    #[test]
    fn test_extractor_for_pdf() {
        let extractor = extractor_for(Path::new("estratto.pdf"));
        assert!(extractor.is_ok());
    }
}

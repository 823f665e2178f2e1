//! PDF statement extraction.

use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::PeriodRecords;

use super::StatementExtractor;
use super::text::StatementTextParser;

/// Extracts period records from an INPS statement PDF.
///
/// The document text is read with `pdf-extract` and handed to a
/// [`StatementTextParser`].
#[derive(Debug, Clone)]
pub struct PdfStatementExtractor {
    parser: StatementTextParser,
}

impl PdfStatementExtractor {
    /// Creates an extractor with freshly compiled statement patterns.
    pub fn new() -> EngineResult<Self> {
        Ok(Self {
            parser: StatementTextParser::new()?,
        })
    }
}

impl StatementExtractor for PdfStatementExtractor {
    fn extract(&self, path: &Path) -> EngineResult<PeriodRecords> {
        let path_str = path.display().to_string();
        if !path.is_file() {
            return Err(EngineError::DocumentNotFound { path: path_str });
        }

        let text = pdf_extract::extract_text(path).map_err(|e| EngineError::ExtractionError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
        info!(path = %path_str, characters = text.len(), "Extracted statement text");

        let mut records = self.parser.parse(&text);
        records.identity.source = Some(path_str);
        Ok(records)
    }
}

//! Records dump reading and writing.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::PeriodRecords;

use super::StatementExtractor;

/// Reloads period records from a JSON dump written by [`write_records_dump`].
///
/// Dumps with the Italian field names (`regime_generale`, `spettacolo`,
/// `dal`, `al`, `settimane`, `giorni`, `gruppo`) are accepted as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordsExtractor;

impl StatementExtractor for JsonRecordsExtractor {
    fn extract(&self, path: &Path) -> EngineResult<PeriodRecords> {
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|_| EngineError::DocumentNotFound {
            path: path_str.clone(),
        })?;

        let records: PeriodRecords =
            serde_json::from_str(&content).map_err(|e| EngineError::ExtractionError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        debug!(path = %path_str, periods = records.len(), "Loaded records dump");
        Ok(records)
    }
}

/// Writes period records as pretty-printed JSON.
pub fn write_records_dump(records: &PeriodRecords, path: &Path) -> EngineResult<()> {
    let report_error = |message: String| EngineError::ReportError {
        path: path.display().to_string(),
        message,
    };

    let json = serde_json::to_string_pretty(records).map_err(|e| report_error(e.to_string()))?;
    fs::write(path, json).map_err(|e| report_error(e.to_string()))?;

    info!(path = %path.display(), periods = records.len(), "Wrote records dump");
    Ok(())
}

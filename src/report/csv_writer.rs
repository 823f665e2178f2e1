//! CSV report output.

use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::table::ReportTable;

/// Writes a [`ReportTable`] as CSV.
///
/// Spreadsheet applications evaluate the `=SUM` cells of the totals row when
/// the file is opened.
#[derive(Debug, Clone, Copy)]
pub struct CsvReportWriter {
    delimiter: u8,
}

impl Default for CsvReportWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvReportWriter {
    /// Creates a comma-separated writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a different field delimiter (e.g. `b';'` for Italian locales).
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Writes the table to any writer.
    pub fn write_to<W: Write>(&self, table: &ReportTable, writer: W) -> csv::Result<()> {
        let mut csv = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(false)
            .from_writer(writer);
        for record in table.records() {
            csv.write_record(&record)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Writes the table to a file, replacing it if present.
    pub fn write(&self, table: &ReportTable, path: &Path) -> EngineResult<()> {
        let report_error = |message: String| EngineError::ReportError {
            path: path.display().to_string(),
            message,
        };

        let file = std::fs::File::create(path).map_err(|e| report_error(e.to_string()))?;
        self.write_to(table, file).map_err(|e| report_error(e.to_string()))?;

        info!(path = %path.display(), rows = table.rows.len(), "Wrote report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::table::ReportRow;

    fn sample_table() -> ReportTable {
        ReportTable {
            rows: vec![ReportRow {
                year: 1990,
                actual_days: 220,
                theoretical_days: 60,
                theoretical_months: 12,
                cumulative: "1a 0m".to_string(),
            }],
            totals: Some(vec![
                "TOTALE".to_string(),
                "=SUM(B2:B2)".to_string(),
                String::new(),
                "TOTALE".to_string(),
                "=SUM(E2:E2)".to_string(),
                "=SUM(F2:F2)".to_string(),
                "42a 10m".to_string(),
            ]),
        }
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buffer = Vec::new();
        CsvReportWriter::new().write_to(&sample_table(), &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "Anno,Giorni REALI,,Anno,Giorni TEORICI,Mesi,Anni e Mesi Cumulativi"
        );
        assert_eq!(lines[1], "1990,220,,1990,60,12,1a 0m");
        assert_eq!(lines[2], "TOTALE,=SUM(B2:B2),,TOTALE,=SUM(E2:E2),=SUM(F2:F2),42a 10m");
    }

    #[test]
    fn test_semicolon_delimiter() {
        let mut buffer = Vec::new();
        CsvReportWriter::new()
            .with_delimiter(b';')
            .write_to(&sample_table(), &mut buffer)
            .unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.lines().nth(1).unwrap().starts_with("1990;220;;1990"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let result = CsvReportWriter::new().write(
            &sample_table(),
            Path::new("/nonexistent/dir/report.csv"),
        );
        assert!(matches!(result, Err(EngineError::ReportError { .. })));
    }
}

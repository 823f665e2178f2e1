//! Report output for computed ledgers.
//!
//! This module lays a [`Ledger`](crate::models::Ledger) out as a table
//! (actual days, theoretical days, months and cumulative "Ya Mm" per year,
//! with a totals row), writes it as CSV, and names the output files.

mod csv_writer;
mod summary;
mod table;

use std::path::{Path, PathBuf};

use crate::models::StatementIdentity;

pub use csv_writer::CsvReportWriter;
pub use summary::Summary;
pub use table::{REPORT_HEADER, ReportRow, ReportTable};

/// Paths of the files produced for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// The records dump.
    pub records_dump: PathBuf,
    /// The CSV report.
    pub report: PathBuf,
}

/// Names the output files of a document.
///
/// The file stem is "SURNAME NAME" when both are known, then the tax code,
/// then the document's own stem. Files go to `output_dir`, or next to the
/// document when no directory is given.
///
/// # Example
///
/// ```
/// use std::path::Path;
///
/// use inps_contributions::models::StatementIdentity;
/// use inps_contributions::report::output_paths;
///
/// let identity = StatementIdentity {
///     tax_code: Some("RSSMRA80A01H501U".to_string()),
///     ..Default::default()
/// };
/// let paths = output_paths(&identity, Path::new("docs/estratto.pdf"), None);
/// assert_eq!(paths.report, Path::new("docs/RSSMRA80A01H501U.csv"));
/// ```
pub fn output_paths(
    identity: &StatementIdentity,
    document: &Path,
    output_dir: Option<&Path>,
) -> OutputPaths {
    let stem = identity
        .full_name()
        .or_else(|| identity.tax_code.clone())
        .or_else(|| {
            document
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "estratto".to_string());

    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| document.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    OutputPaths {
        records_dump: dir.join(format!("{}.json", stem)),
        report: dir.join(format!("{}.csv", stem)),
    }
}

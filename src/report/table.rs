//! Report table layout.

use serde::Serialize;

use crate::models::{Ledger, format_years_months};

/// Column headers of the report.
pub const REPORT_HEADER: [&str; 7] = [
    "Anno",
    "Giorni REALI",
    "",
    "Anno",
    "Giorni TEORICI",
    "Mesi",
    "Anni e Mesi Cumulativi",
];

/// One year of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Calendar year.
    pub year: i32,
    /// Actual days.
    pub actual_days: u32,
    /// Theoretical days.
    pub theoretical_days: u32,
    /// Theoretical months.
    pub theoretical_months: u32,
    /// Running total of months as "Ya Mm".
    pub cumulative: String,
}

impl ReportRow {
    /// Returns the seven cells of the row.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.actual_days.to_string(),
            String::new(),
            self.year.to_string(),
            self.theoretical_days.to_string(),
            self.theoretical_months.to_string(),
            self.cumulative.clone(),
        ]
    }
}

/// The tabular report of a ledger.
///
/// Row 1 is the header; years follow in order from row 2; the last row holds
/// `=SUM` formulas over the year rows and the target label.
///
/// # Example
///
/// ```
/// use inps_contributions::calculation::compute;
/// use inps_contributions::models::{EngineConfig, GeneralRegimePeriod, PeriodRecords};
/// use inps_contributions::report::ReportTable;
///
/// let records = PeriodRecords {
///     general_regime: vec![GeneralRegimePeriod::new("01/01/2000", "31/12/2000", 52)],
///     ..Default::default()
/// };
/// let ledger = compute(&records, &EngineConfig::default())?;
/// let table = ReportTable::from_ledger(&ledger);
///
/// let totals = table.totals.unwrap();
/// assert_eq!(totals[1], format!("=SUM(B2:B{})", table.rows.len() + 1));
/// # Ok::<(), inps_contributions::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    /// One row per ledger year.
    pub rows: Vec<ReportRow>,
    /// The totals row; absent for an empty ledger.
    pub totals: Option<Vec<String>>,
}

impl ReportTable {
    /// Lays out a ledger.
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut cumulative = 0;
        let rows: Vec<ReportRow> = ledger
            .rows()
            .map(|entry| {
                cumulative += entry.theoretical_months;
                ReportRow {
                    year: entry.year,
                    actual_days: entry.actual_days,
                    theoretical_days: entry.theoretical_days,
                    theoretical_months: entry.theoretical_months,
                    cumulative: format_years_months(cumulative),
                }
            })
            .collect();

        let totals = (!rows.is_empty()).then(|| {
            let last_data_row = rows.len() + 1;
            vec![
                "TOTALE".to_string(),
                format!("=SUM(B2:B{})", last_data_row),
                String::new(),
                "TOTALE".to_string(),
                format!("=SUM(E2:E{})", last_data_row),
                format!("=SUM(F2:F{})", last_data_row),
                ledger.target.label.clone(),
            ]
        });

        Self { rows, totals }
    }

    /// Returns every line of the report, header first.
    pub fn records(&self) -> Vec<Vec<String>> {
        let mut records = Vec::with_capacity(self.rows.len() + 2);
        records.push(REPORT_HEADER.iter().map(|h| h.to_string()).collect());
        records.extend(self.rows.iter().map(ReportRow::cells));
        if let Some(totals) = &self.totals {
            records.push(totals.clone());
        }
        records
    }
}

//! Calculation summary.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::models::{Ledger, StatementIdentity, format_years_months};

/// A recap of one calculation, printed by the command-line front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// "SURNAME NAME", when known.
    pub full_name: Option<String>,
    /// Tax code, when known.
    pub tax_code: Option<String>,
    /// "Donna", "Uomo" or "Non determinato".
    pub sex_label: String,
    /// Target as "Ya Mm".
    pub target_label: String,
    /// First ledger year.
    pub min_year: Option<i32>,
    /// Last ledger year, projected years included.
    pub max_year: Option<i32>,
    /// Number of ledger years.
    pub years: usize,
    /// Sum of actual days.
    pub total_actual_days: u32,
    /// Sum of theoretical days.
    pub total_theoretical_days: u32,
    /// Sum of theoretical months.
    pub total_theoretical_months: u32,
    /// Files written by the run.
    pub outputs: Vec<PathBuf>,
}

impl Summary {
    /// Builds the summary of a ledger.
    pub fn new(identity: &StatementIdentity, ledger: &Ledger, outputs: Vec<PathBuf>) -> Self {
        Self {
            full_name: identity.full_name(),
            tax_code: identity.tax_code.clone(),
            sex_label: ledger.sex.label().to_string(),
            target_label: ledger.target.label.clone(),
            min_year: ledger.min_year,
            max_year: ledger.max_year,
            years: ledger.year_count(),
            total_actual_days: ledger.total_actual_days(),
            total_theoretical_days: ledger.total_theoretical_days(),
            total_theoretical_months: ledger.total_theoretical_months(),
            outputs,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "RIEPILOGO")?;
        writeln!(f, "{}", rule)?;
        if let Some(name) = &self.full_name {
            writeln!(f, "Cognome e Nome:        {}", name)?;
        }
        writeln!(f, "Codice Fiscale:        {}", self.tax_code.as_deref().unwrap_or("-"))?;
        writeln!(f, "Sesso:                 {}", self.sex_label)?;
        writeln!(f, "Obiettivo:             {}", self.target_label)?;
        match (self.min_year, self.max_year) {
            (Some(min), Some(max)) => {
                writeln!(f, "Anni elaborati:        {} ({} - {})", self.years, min, max)?
            }
            _ => writeln!(f, "Anni elaborati:        0")?,
        }
        writeln!(f, "Totale giorni REALI:   {}", self.total_actual_days)?;
        writeln!(f, "Totale giorni TEORICI: {}", self.total_theoretical_days)?;
        writeln!(
            f,
            "Totale mesi teorici:   {} ({})",
            self.total_theoretical_months,
            format_years_months(self.total_theoretical_months)
        )?;
        if !self.outputs.is_empty() {
            writeln!(f)?;
            writeln!(f, "File generati:")?;
            for path in &self.outputs {
                writeln!(f, "  - {}", path.display())?;
            }
        }
        write!(f, "{}", rule)
    }
}

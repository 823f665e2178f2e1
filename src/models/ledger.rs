//! Ledger models for the contribution engine.
//!
//! This module contains the [`Ledger`] type and its associated structures
//! that capture all outputs of one engine invocation: the year-by-year rows,
//! the contribution target, and an audit trace of every rule application.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::engine_config::{ContributionTarget, Sex, format_years_months};
use super::period::WorkerGroup;

/// Where a ledger row's figures come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearSource {
    /// Computed from recorded periods.
    #[default]
    Recorded,
    /// A year inside the recorded range with no periods at all.
    Uncovered,
    /// The last worked year, completed to twelve theoretical months.
    Completed,
    /// Synthesized by forward projection; carries no actual days.
    Projected,
}

/// The contribution scheme most recently seen while accumulating.
///
/// Drives how the final year is completed and how future years are projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Weekly-accounted general regime (26 days per month).
    General,
    /// Day-accounted entertainment sector with its worker group.
    Entertainment(WorkerGroup),
}

/// One calendar year of the ledger.
///
/// # Example
///
/// ```
/// use inps_contributions::models::{YearLedgerEntry, YearSource};
///
/// let entry = YearLedgerEntry {
///     year: 1981,
///     actual_days: 48,
///     theoretical_days: 52,
///     theoretical_months: 2,
///     source: YearSource::Recorded,
/// };
/// assert_eq!(entry.year, 1981);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearLedgerEntry {
    /// Calendar year.
    pub year: i32,
    /// Days evidenced by recorded periods, capped at the annual ceiling.
    pub actual_days: u32,
    /// Days obtained by applying the regulatory formulas.
    pub theoretical_days: u32,
    /// Distinct calendar months credited in this year (at most 12).
    pub theoretical_months: u32,
    /// Provenance of the row.
    pub source: YearSource,
}

impl YearLedgerEntry {
    /// Creates an empty row for the given year.
    pub fn empty(year: i32, source: YearSource) -> Self {
        Self {
            year,
            source,
            ..Default::default()
        }
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The ledger year the step affected, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag simplifications or unusual input that don't prevent
/// calculation but may deserve a second look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Appends a step, numbering it after the existing ones.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        year: Option<i32>,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            year,
            input,
            output,
            reasoning,
        });
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: String, severity: &str) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message,
            severity: severity.to_string(),
        });
    }

    /// Returns true if a warning with the given code was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Returns the steps produced by the given rule.
    pub fn steps_for<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a AuditStep> {
        self.steps.iter().filter(move |s| s.rule_id == rule_id)
    }
}

/// The year-indexed result of one engine invocation.
///
/// Rows cover every year from `min_year` to `max_year` with no gaps.
/// The ledger holds no timestamps or generated identifiers, so computing it
/// twice from the same input yields equal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Rows keyed by calendar year.
    pub entries: BTreeMap<i32, YearLedgerEntry>,
    /// First year of the ledger, `None` when nothing was recorded.
    pub min_year: Option<i32>,
    /// Last year of the ledger, including projected years.
    pub max_year: Option<i32>,
    /// The sex the target was selected for.
    pub sex: Sex,
    /// The contribution target.
    pub target: ContributionTarget,
    /// The last regime seen while accumulating recorded periods.
    pub last_regime: Option<Regime>,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl Ledger {
    /// Returns true if the ledger has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the row for a year.
    pub fn get(&self, year: i32) -> Option<&YearLedgerEntry> {
        self.entries.get(&year)
    }

    /// Iterates over the rows in year order.
    pub fn rows(&self) -> impl Iterator<Item = &YearLedgerEntry> {
        self.entries.values()
    }

    /// Number of years covered, projected ones included.
    pub fn year_count(&self) -> usize {
        match (self.min_year, self.max_year) {
            (Some(min), Some(max)) => (max - min + 1) as usize,
            _ => 0,
        }
    }

    /// Sum of actual days over all rows, saturating at `u32::MAX`.
    pub fn total_actual_days(&self) -> u32 {
        self.rows().map(|e| e.actual_days).fold(0, u32::saturating_add)
    }

    /// Sum of theoretical days over all rows, saturating at `u32::MAX`.
    pub fn total_theoretical_days(&self) -> u32 {
        self.rows().map(|e| e.theoretical_days).fold(0, u32::saturating_add)
    }

    /// Sum of theoretical months over all rows.
    pub fn total_theoretical_months(&self) -> u32 {
        self.rows().map(|e| e.theoretical_months).fold(0, u32::saturating_add)
    }

    /// Running "Ya Mm" totals of theoretical months, one per row.
    pub fn cumulative_labels(&self) -> Vec<(i32, String)> {
        let mut cumulative = 0;
        self.rows()
            .map(|entry| {
                cumulative += entry.theoretical_months;
                (entry.year, format_years_months(cumulative))
            })
            .collect()
    }
}

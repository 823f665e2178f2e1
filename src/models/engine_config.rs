//! Engine configuration inputs.
//!
//! This module defines the two per-invocation inputs of the contribution
//! engine: the insured person's sex (which selects the contribution target)
//! and the contract transition marker (which selects the entertainment rate
//! from August 1997 onward).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::period::STATEMENT_DATE_FORMAT;

/// Biological sex category, as decoded from the tax code or overridden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male; selects the 514-month target.
    Male,
    /// Female; selects the 502-month target.
    Female,
    /// Could not be determined; treated like [`Sex::Male`] for the target.
    #[default]
    Undetermined,
}

impl Sex {
    /// Returns the label used in summaries ("Uomo", "Donna", "Non determinato").
    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "Uomo",
            Sex::Female => "Donna",
            Sex::Undetermined => "Non determinato",
        }
    }
}

/// When the entertainment-sector contract became permanent.
///
/// Only months from August 1997 onward are affected; earlier eras have a
/// single rate per worker group.
///
/// # Example
///
/// ```
/// use inps_contributions::models::ContractTransition;
///
/// let transition = ContractTransition::parse(Some("15/03/2001")).unwrap();
/// assert!(!transition.is_permanent(2001, 2));
/// assert!(transition.is_permanent(2001, 3));
/// assert!(transition.is_permanent(2002, 1));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractTransition {
    /// Every month is worked under a fixed-term contract.
    #[default]
    AlwaysFixedTerm,
    /// Every month is worked under a permanent contract.
    AlwaysPermanent,
    /// Permanent from the month of the given date onward.
    PermanentFrom(NaiveDate),
}

impl ContractTransition {
    /// Parses the command-line marker.
    ///
    /// `None` means fixed-term throughout; an empty marker, `"always"` or
    /// `"sempre"` means permanent throughout; a `DD/MM/YYYY` date means
    /// permanent from that date. Anything else is rejected.
    pub fn parse(marker: Option<&str>) -> EngineResult<Self> {
        let Some(marker) = marker else {
            return Ok(ContractTransition::AlwaysFixedTerm);
        };

        let marker = marker.trim();
        if marker.is_empty()
            || marker.eq_ignore_ascii_case("always")
            || marker.eq_ignore_ascii_case("sempre")
        {
            return Ok(ContractTransition::AlwaysPermanent);
        }

        NaiveDate::parse_from_str(marker, STATEMENT_DATE_FORMAT)
            .map(ContractTransition::PermanentFrom)
            .map_err(|_| EngineError::InvalidContractTransition {
                value: marker.to_string(),
            })
    }

    /// Returns true if the given month is worked under a permanent contract.
    ///
    /// The day of the transition date is ignored: a transition on any day of
    /// a month makes that whole month permanent.
    pub fn is_permanent(&self, year: i32, month: u32) -> bool {
        match self {
            ContractTransition::AlwaysFixedTerm => false,
            ContractTransition::AlwaysPermanent => true,
            ContractTransition::PermanentFrom(date) => {
                if year != date.year() {
                    year > date.year()
                } else {
                    month >= date.month()
                }
            }
        }
    }

    /// Returns a short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            ContractTransition::AlwaysFixedTerm => "Tempo determinato".to_string(),
            ContractTransition::AlwaysPermanent => "Tempo indeterminato (sempre)".to_string(),
            ContractTransition::PermanentFrom(date) => format!(
                "Tempo indeterminato dal {}",
                date.format(STATEMENT_DATE_FORMAT)
            ),
        }
    }
}

/// The per-invocation configuration of the contribution engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Selects the contribution target.
    pub sex: Sex,
    /// Selects the post-July-1997 entertainment rate.
    #[serde(default)]
    pub contract_transition: ContractTransition,
}

impl EngineConfig {
    /// Creates a new engine configuration.
    pub fn new(sex: Sex, contract_transition: ContractTransition) -> Self {
        Self {
            sex,
            contract_transition,
        }
    }
}

/// The number of theoretical months required for eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionTarget {
    /// Target expressed in months.
    pub months: u32,
    /// Target expressed as "Ya Mm".
    pub label: String,
}

impl ContributionTarget {
    /// Creates a target from a month count, deriving its label.
    pub fn from_months(months: u32) -> Self {
        Self {
            months,
            label: format_years_months(months),
        }
    }
}

/// Formats a month count as "Ya Mm" (e.g. 514 → "42a 10m").
///
/// # Example
///
/// ```
/// use inps_contributions::models::format_years_months;
///
/// assert_eq!(format_years_months(502), "41a 10m");
/// assert_eq!(format_years_months(0), "0a 0m");
/// ```
pub fn format_years_months(months: u32) -> String {
    format!("{}a {}m", months / 12, months % 12)
}

//! Period records produced by statement extraction.
//!
//! This module defines the general-regime and entertainment-sector periods,
//! the worker group classification, and the [`PeriodRecords`] bundle that
//! the extractor hands to the contribution engine.
//!
//! Dates are kept as the raw `DD/MM/YYYY` text found in the statement. They
//! are parsed by the engine, which treats an unparseable date as a fatal
//! extraction defect.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The date format used throughout INPS statements.
pub const STATEMENT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parses a statement date in `DD/MM/YYYY` form.
///
/// # Arguments
///
/// * `value` - The raw date text (surrounding whitespace is ignored)
/// * `context` - Where the date was found, used in the error message
///
/// # Example
///
/// ```
/// use inps_contributions::models::parse_statement_date;
/// use chrono::NaiveDate;
///
/// let date = parse_statement_date("01/11/1981", "example").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(1981, 11, 1).unwrap());
///
/// assert!(parse_statement_date("1981-11-01", "example").is_err());
/// ```
pub fn parse_statement_date(value: &str, context: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), STATEMENT_DATE_FORMAT).map_err(|_| {
        EngineError::InvalidDate {
            value: value.to_string(),
            context: context.to_string(),
        }
    })
}

/// Parses both ends of a period and checks that the end does not precede the start.
fn parse_span(start: &str, end: &str, context: &str) -> EngineResult<(NaiveDate, NaiveDate)> {
    let start_date = parse_statement_date(start, &format!("{} start", context))?;
    let end_date = parse_statement_date(end, &format!("{} end", context))?;

    if end_date < start_date {
        return Err(EngineError::InvalidPeriod {
            context: context.to_string(),
            message: format!("end {} precedes start {}", end.trim(), start.trim()),
        });
    }

    Ok((start_date, end_date))
}

/// Classification of entertainment-sector workers.
///
/// The group selects the annual day rate used by the theoretical formula.
/// It is serialized as the integer printed on the statement (`1` or `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WorkerGroup {
    /// Group 1 workers (lower annual rates).
    One,
    /// Group 2 workers (higher annual rates).
    Two,
}

impl WorkerGroup {
    /// Returns the group for a statement code, or `None` for anything but 1 or 2.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(WorkerGroup::One),
            2 => Some(WorkerGroup::Two),
            _ => None,
        }
    }

    /// Returns the numeric code of the group.
    pub fn code(self) -> u8 {
        match self {
            WorkerGroup::One => 1,
            WorkerGroup::Two => 2,
        }
    }
}

impl TryFrom<u8> for WorkerGroup {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        WorkerGroup::from_code(code).ok_or_else(|| format!("unknown worker group {}", code))
    }
}

impl From<WorkerGroup> for u8 {
    fn from(group: WorkerGroup) -> Self {
        group.code()
    }
}

impl std::fmt::Display for WorkerGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A span of weekly-accounted employment under the general regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralRegimePeriod {
    /// Start date as printed (`DD/MM/YYYY`).
    #[serde(alias = "dal")]
    pub start: String,
    /// End date as printed (`DD/MM/YYYY`).
    #[serde(alias = "al")]
    pub end: String,
    /// The record type column (e.g. "Lavoro dipendente", "Disoccupazione").
    #[serde(default, alias = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Number of contribution weeks.
    #[serde(alias = "settimane")]
    pub weeks: u32,
    /// Raw remuneration cell, when present.
    #[serde(default, alias = "retribuzione", skip_serializing_if = "Option::is_none")]
    pub pay: Option<String>,
}

impl GeneralRegimePeriod {
    /// Creates a period with only the fields the engine reads.
    pub fn new(start: impl Into<String>, end: impl Into<String>, weeks: u32) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            kind: None,
            weeks,
            pay: None,
        }
    }

    /// Parses the start and end dates.
    ///
    /// Fails with [`EngineError::InvalidDate`] for malformed dates and
    /// [`EngineError::InvalidPeriod`] when the end precedes the start.
    pub fn span(&self, context: &str) -> EngineResult<(NaiveDate, NaiveDate)> {
        parse_span(&self.start, &self.end, context)
    }
}

/// A span of day-accounted activity in the entertainment sector.
///
/// Periods with a [`WorkerGroup`] are subject to the entertainment formula;
/// periods without one (military service, some benefits) are credited with
/// their day count in both the actual and the theoretical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntertainmentPeriod {
    /// Start date as printed (`DD/MM/YYYY`).
    #[serde(alias = "dal")]
    pub start: String,
    /// End date as printed (`DD/MM/YYYY`).
    #[serde(alias = "al")]
    pub end: String,
    /// The record type column (e.g. "P.A.L.S. Obbligatoria", "Malattia").
    #[serde(default, alias = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Number of contribution days, when printed.
    #[serde(default, alias = "giorni")]
    pub days: Option<u32>,
    /// Worker group, when printed.
    #[serde(default, alias = "gruppo", skip_serializing_if = "Option::is_none")]
    pub group: Option<WorkerGroup>,
    /// Professional qualification code.
    #[serde(
        default,
        alias = "codice_qualifica",
        skip_serializing_if = "Option::is_none"
    )]
    pub qualification_code: Option<String>,
    /// Raw remuneration cell, when present.
    #[serde(default, alias = "retribuzione", skip_serializing_if = "Option::is_none")]
    pub pay: Option<String>,
}

impl EntertainmentPeriod {
    /// Creates a period with only the fields the engine reads.
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        days: Option<u32>,
        group: Option<WorkerGroup>,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            kind: None,
            days,
            group,
            qualification_code: None,
            pay: None,
        }
    }

    /// Returns true if the period is subject to the entertainment formula.
    pub fn is_groupable(&self) -> bool {
        self.group.is_some()
    }

    /// Returns the day count when it is present and non-zero.
    pub fn credited_days(&self) -> Option<u32> {
        self.days.filter(|days| *days > 0)
    }

    /// Parses the start and end dates.
    pub fn span(&self, context: &str) -> EngineResult<(NaiveDate, NaiveDate)> {
        parse_span(&self.start, &self.end, context)
    }
}

/// Identity fields read from the statement header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementIdentity {
    /// The document the records were extracted from.
    #[serde(default, alias = "file", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// The national tax code (codice fiscale).
    #[serde(default, alias = "codice_fiscale")]
    pub tax_code: Option<String>,
    /// Surname of the insured person.
    #[serde(default, alias = "cognome")]
    pub surname: Option<String>,
    /// Given name(s) of the insured person.
    #[serde(default, alias = "nome")]
    pub given_name: Option<String>,
}

impl StatementIdentity {
    /// Returns "SURNAME NAME" when both parts are known.
    pub fn full_name(&self) -> Option<String> {
        match (&self.surname, &self.given_name) {
            (Some(surname), Some(given_name)) => Some(format!("{} {}", surname, given_name)),
            _ => None,
        }
    }
}

/// The complete output of statement extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecords {
    /// General-regime (weekly) periods, in statement order.
    #[serde(default, alias = "regime_generale")]
    pub general_regime: Vec<GeneralRegimePeriod>,
    /// Entertainment-sector (daily) periods, in statement order.
    #[serde(default, alias = "spettacolo")]
    pub entertainment: Vec<EntertainmentPeriod>,
    /// Identity fields from the statement header.
    #[serde(default, alias = "metadata")]
    pub identity: StatementIdentity,
}

impl PeriodRecords {
    /// Returns true if no period of either kind was extracted.
    pub fn is_empty(&self) -> bool {
        self.general_regime.is_empty() && self.entertainment.is_empty()
    }

    /// Total number of periods of both kinds.
    pub fn len(&self) -> usize {
        self.general_regime.len() + self.entertainment.len()
    }
}

/// A calendar month within a specific year.
///
/// Ordered chronologically, so era boundaries can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1 through 12.
    pub month: u32,
}

impl YearMonth {
    /// Creates a new year/month pair.
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Returns the year/month of a date.
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

//! Statement text parsing.
//!
//! The statement text is read line by line. A line starting with two
//! `DD/MM/YYYY` dates is a period row; any other line may be a table header
//! that switches between the week-accounted and day-accounted sections.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    EntertainmentPeriod, GeneralRegimePeriod, PeriodRecords, StatementIdentity, WorkerGroup,
};

const TAX_CODE_PATTERN: &str = r"[A-Z]{6}\d{2}[A-Z]\d{2}[A-Z]\d{3}[A-Z]";

/// Remuneration cells at or below this amount are not taken as pay.
const MIN_PAY_AMOUNT: i64 = 100;

/// Parses the text of an INPS contribution statement.
///
/// # Example
///
/// ```
/// use inps_contributions::extraction::StatementTextParser;
///
/// let parser = StatementTextParser::new()?;
/// let records = parser.parse(
///     "Estratto conto di ROSSI MARIA RSSMRA80A41H501U\n\
///      01/11/1981 31/12/1981 Lavoro dipendente sett. 8 1.234,56\n",
/// );
/// assert_eq!(records.general_regime[0].weeks, 8);
/// assert_eq!(records.identity.surname.as_deref(), Some("ROSSI"));
/// # Ok::<(), inps_contributions::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StatementTextParser {
    tax_code: Regex,
    holder: Regex,
    row: Regex,
    integer: Regex,
    amount: Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Unknown,
    Weeks,
    Days,
}

impl StatementTextParser {
    /// Compiles the statement patterns.
    pub fn new() -> EngineResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| EngineError::ExtractionError {
                path: "<statement patterns>".to_string(),
                message: e.to_string(),
            })
        };

        Ok(Self {
            tax_code: compile(&format!("({})", TAX_CODE_PATTERN))?,
            holder: compile(&format!(
                r"Estratto\s+conto\s+di\s+([A-Z][A-Z\s]+?)\s+({})",
                TAX_CODE_PATTERN
            ))?,
            row: compile(r"^\s*(\d{2}/\d{2}/\d{4})\s+(\d{2}/\d{2}/\d{4})\s*(.*)$")?,
            integer: compile(r"^\d+$")?,
            amount: compile(r"^\d{1,3}(?:\.\d{3})*,\d{2}$")?,
        })
    }

    /// Parses statement text into period records.
    ///
    /// Lines that are neither headers nor rows with two leading dates are
    /// ignored, as are rows that fit neither section.
    pub fn parse(&self, text: &str) -> PeriodRecords {
        let mut records = PeriodRecords {
            identity: self.parse_identity(text),
            ..Default::default()
        };

        let mut section = Section::Unknown;
        for line in text.lines() {
            let Some(captures) = self.row.captures(line) else {
                section = Self::header_section(line).unwrap_or(section);
                continue;
            };

            let start = captures[1].to_string();
            let end = captures[2].to_string();
            let tokens: Vec<&str> = captures[3].split_whitespace().collect();

            if tokens.iter().any(|t| t.eq_ignore_ascii_case("sett.")) {
                if let Some(period) = self.general_row(start, end, &tokens) {
                    records.general_regime.push(period);
                }
                continue;
            }

            let kind = Self::kind_of(&tokens);
            let day_accounted = section == Section::Days
                || kind.contains("P.A.L.S.")
                || kind.contains("Malattia");
            if day_accounted {
                records.entertainment.push(self.entertainment_row(start, end, &tokens));
            } else {
                debug!(line, "Row outside any known section dropped");
            }
        }

        debug!(
            general_regime = records.general_regime.len(),
            entertainment = records.entertainment.len(),
            tax_code_found = records.identity.tax_code.is_some(),
            "Statement text parsed"
        );

        records
    }

    fn parse_identity(&self, text: &str) -> StatementIdentity {
        let mut identity = StatementIdentity {
            tax_code: self.tax_code.captures(text).map(|c| c[1].to_string()),
            ..Default::default()
        };

        if let Some(captures) = self.holder.captures(text) {
            let parts: Vec<&str> = captures[1].split_whitespace().collect();
            if let [surname, given @ ..] = parts.as_slice() {
                if !given.is_empty() {
                    identity.surname = Some(surname.to_string());
                    identity.given_name = Some(given.join(" "));
                }
            }
        }

        identity
    }

    fn header_section(line: &str) -> Option<Section> {
        if line.contains("Giorni") {
            Some(Section::Days)
        } else if line.contains("Settimane") {
            Some(Section::Weeks)
        } else {
            None
        }
    }

    /// Number of leading tokens that form the record type column.
    fn kind_len(tokens: &[&str]) -> usize {
        tokens
            .iter()
            .position(|t| {
                t.starts_with(|c: char| c.is_ascii_digit()) || t.eq_ignore_ascii_case("sett.")
            })
            .unwrap_or(tokens.len())
    }

    fn kind_of(tokens: &[&str]) -> String {
        tokens[..Self::kind_len(tokens)].join(" ")
    }

    fn non_empty(value: String) -> Option<String> {
        (!value.is_empty()).then_some(value)
    }

    fn is_pay(&self, token: &str) -> bool {
        if !self.amount.is_match(token) {
            return false;
        }
        let normalized = token.replace('.', "").replace(',', ".");
        Decimal::from_str(&normalized).is_ok_and(|value| value > Decimal::from(MIN_PAY_AMOUNT))
    }

    fn general_row(
        &self,
        start: String,
        end: String,
        tokens: &[&str],
    ) -> Option<GeneralRegimePeriod> {
        let kind_len = Self::kind_len(tokens);
        let weeks = tokens[kind_len..]
            .iter()
            .find(|t| self.integer.is_match(t))
            .and_then(|t| t.parse::<u32>().ok())
            .filter(|weeks| *weeks > 0);

        let Some(weeks) = weeks else {
            debug!(start = %start, end = %end, "Week row without a week count dropped");
            return None;
        };

        Some(GeneralRegimePeriod {
            start,
            end,
            kind: Self::non_empty(Self::kind_of(tokens)),
            weeks,
            pay: tokens.iter().find(|t| self.is_pay(t)).map(|t| t.to_string()),
        })
    }

    fn entertainment_row(
        &self,
        start: String,
        end: String,
        tokens: &[&str],
    ) -> EntertainmentPeriod {
        let kind_len = Self::kind_len(tokens);
        let rest = &tokens[kind_len..];
        let pay_index = rest.iter().position(|t| self.is_pay(t));

        let days = rest
            .first()
            .filter(|t| pay_index != Some(0) && self.integer.is_match(t))
            .and_then(|t| t.parse::<u32>().ok());

        let tail_start = match (pay_index, days) {
            (Some(index), _) => index + 1,
            (None, Some(_)) => 1,
            (None, None) => 0,
        };
        let mut tail: Vec<&str> = rest[tail_start.min(rest.len())..].to_vec();

        let mut qualification_code = None;
        if let Some(last) = tail.last() {
            let is_group_cell = last.len() == 1 && self.integer.is_match(last);
            if !is_group_cell && last.chars().all(|c| c.is_ascii_alphanumeric()) {
                qualification_code = Some(last.to_string());
                tail.pop();
            }
        }

        let mut group = None;
        if let Some(last) = tail.last().filter(|t| t.len() == 1 && self.integer.is_match(t)) {
            let code = last.parse::<u8>().unwrap_or_default();
            group = WorkerGroup::from_code(code);
            if group.is_none() {
                warn!(start = %start, end = %end, code, "Unknown worker group dropped");
            }
        }

        EntertainmentPeriod {
            start,
            end,
            kind: Self::non_empty(Self::kind_of(tokens)),
            days,
            group,
            qualification_code,
            pay: pay_index.map(|index| rest[index].to_string()),
        }
    }
}

/// Parses statement text with a freshly compiled [`StatementTextParser`].
pub fn parse_statement_text(text: &str) -> EngineResult<PeriodRecords> {
    Ok(StatementTextParser::new()?.parse(text))
}

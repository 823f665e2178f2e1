//! Core data models for the contribution engine.
//!
//! This module contains the period records produced by extraction, the
//! per-invocation engine configuration, and the ledger the engine returns.

mod engine_config;
mod ledger;
mod period;

pub use engine_config::{
    ContractTransition, ContributionTarget, EngineConfig, Sex, format_years_months,
};
pub use ledger::{AuditStep, AuditTrace, AuditWarning, Ledger, Regime, YearLedgerEntry, YearSource};
pub use period::{
    EntertainmentPeriod, GeneralRegimePeriod, PeriodRecords, STATEMENT_DATE_FORMAT,
    StatementIdentity, WorkerGroup, YearMonth, parse_statement_date,
};

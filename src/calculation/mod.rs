//! Calculation logic for the contribution engine.
//!
//! This module contains the sex decoder, the month-coverage set, the
//! entertainment-sector formula, and the staged [`ContributionEngine`] that
//! builds a year-by-year [`Ledger`](crate::models::Ledger) from extracted
//! period records: general-regime and entertainment accumulation, annual
//! caps, ledger range, final-year completion and forward projection.

mod accumulator;
mod engine;
mod entertainment;
mod entertainment_formula;
mod general_regime;
mod identity;
mod month_set;
mod projection;
mod year_range;

pub use accumulator::{YearSpan, split_by_year};
pub use engine::{ContributionEngine, compute};
pub use entertainment::{ENTERTAINMENT_RULE_ID, UNGROUPED_RULE_ID};
pub use entertainment_formula::{EntertainmentDaysResult, entertainment_theoretical_days};
pub use general_regime::GENERAL_REGIME_RULE_ID;
pub use identity::decode_sex;
pub use month_set::MonthSet;
pub use projection::{COMPLETION_RULE_ID, PROJECTION_RULE_ID};
pub use year_range::{ANNUAL_CAP_RULE_ID, YEAR_RANGE_RULE_ID};

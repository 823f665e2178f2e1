//! Entertainment-sector theoretical days.
//!
//! This module converts a set of covered months into theoretical days using
//! the rate era of each month, the worker group, and the contract status.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::EntertainmentRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{ContractTransition, WorkerGroup, YearMonth};

use super::month_set::MonthSet;

/// The result of the entertainment formula for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntertainmentDaysResult {
    /// Theoretical days, rounded half-to-even.
    pub theoretical_days: u32,
    /// Sum of the annual rates of every covered month, before dividing by 12.
    pub annual_rate_sum: u32,
    /// Number of covered months per rate era id.
    pub months_by_era: BTreeMap<String, u32>,
    /// Number of covered months that used the permanent-contract rate.
    pub permanent_months: u32,
}

/// Computes the theoretical days credited for a set of months in one year.
///
/// Each month contributes one twelfth of the annual rate of its era. The
/// twelfths are summed exactly and rounded once, half-to-even, so that a
/// year split across eras is not rounded per era.
///
/// # Arguments
///
/// * `rules` - The entertainment-sector rate history
/// * `year` - The calendar year the months belong to
/// * `months` - The covered months
/// * `group` - The worker group of the year
/// * `transition` - When the contract became permanent
///
/// # Returns
///
/// Returns the rounded day count with its breakdown, or a
/// `CalculationError` if a month falls outside every configured era.
///
/// # Example
///
/// ```
/// use inps_contributions::calculation::{MonthSet, entertainment_theoretical_days};
/// use inps_contributions::config::EntertainmentRules;
/// use inps_contributions::models::{ContractTransition, WorkerGroup};
///
/// let rules = EntertainmentRules::default();
/// let result = entertainment_theoretical_days(
///     &rules,
///     1987,
///     MonthSet::range(9, 12),
///     WorkerGroup::Two,
///     &ContractTransition::AlwaysFixedTerm,
/// )?;
/// assert_eq!(result.theoretical_days, 60);
/// # Ok::<(), inps_contributions::error::EngineError>(())
/// ```
pub fn entertainment_theoretical_days(
    rules: &EntertainmentRules,
    year: i32,
    months: MonthSet,
    group: WorkerGroup,
    transition: &ContractTransition,
) -> EngineResult<EntertainmentDaysResult> {
    let mut annual_rate_sum = 0;
    let mut months_by_era: BTreeMap<String, u32> = BTreeMap::new();
    let mut permanent_months = 0;

    for month in months.iter() {
        let era = rules.era_for(YearMonth::new(year, month))?;
        let permanent = transition.is_permanent(year, month);
        if permanent && era.permanent_days.is_some() {
            permanent_months += 1;
        }
        annual_rate_sum += era.annual_days(group, permanent);
        *months_by_era.entry(era.id.clone()).or_default() += 1;
    }

    let days = (Decimal::from(annual_rate_sum) / Decimal::from(12))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let theoretical_days = days.to_u32().ok_or_else(|| EngineError::CalculationError {
        message: format!("theoretical days for {} out of range: {}", year, days),
    })?;

    Ok(EntertainmentDaysResult {
        theoretical_days,
        annual_rate_sum,
        months_by_era,
        permanent_months,
    })
}

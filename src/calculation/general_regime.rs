//! General-regime accumulation.
//!
//! Weekly-accounted periods credit six actual days per week and twenty-six
//! theoretical days per covered month. Everything is attributed to the year
//! the period starts in.

use chrono::Datelike;
use tracing::debug;

use crate::config::GeneralRegimeRules;
use crate::error::EngineResult;
use crate::models::{GeneralRegimePeriod, Regime};

use super::accumulator::{Accumulator, out_of_range};

/// Rule id recorded for every general-regime period.
pub const GENERAL_REGIME_RULE_ID: &str = "general_regime_accumulation";

/// Accumulates all general-regime periods, in input order.
///
/// Returns an `InvalidDate` or `InvalidPeriod` error for the first period
/// whose dates cannot be parsed or are inverted, and `CalculationError` when
/// a theoretical total overflows. Actual days saturate instead, since the
/// annual cap bounds them anyway.
pub(crate) fn accumulate_general_regime(
    periods: &[GeneralRegimePeriod],
    rules: &GeneralRegimeRules,
    acc: &mut Accumulator,
) -> EngineResult<()> {
    for (index, period) in periods.iter().enumerate() {
        let context = format!("general regime period #{}", index + 1);
        let (start, end) = period.span(&context)?;

        let year = start.year();
        let months = ((end.year() - year) * 12 + end.month() as i32 - start.month() as i32 + 1)
            as u32;
        let actual = period.weeks.saturating_mul(rules.days_per_week);
        let theoretical = months
            .checked_mul(rules.days_per_month)
            .ok_or_else(|| out_of_range(year, "theoretical days"))?;

        let totals = acc.year_mut(year);
        totals.add_actual_days(actual);
        totals.add_theoretical(year, theoretical, months)?;
        acc.last_regime = Some(Regime::General);

        if end.year() != year {
            acc.trace.warn(
                "GENERAL_PERIOD_CROSSES_YEAR",
                format!(
                    "{} spans {} to {}; all {} months credited to {}",
                    context, start, end, months, year
                ),
                "medium",
            );
        }

        debug!(year, weeks = period.weeks, months, "General regime period accumulated");

        acc.trace.record(
            GENERAL_REGIME_RULE_ID,
            "General Regime Accumulation",
            Some(year),
            serde_json::json!({
                "period": index + 1,
                "start": start.to_string(),
                "end": end.to_string(),
                "weeks": period.weeks
            }),
            serde_json::json!({
                "actual_days": actual,
                "theoretical_days": theoretical,
                "theoretical_months": months
            }),
            format!(
                "{} weeks × {} = {} actual days; {} months × {} = {} theoretical days",
                period.weeks,
                rules.days_per_week,
                actual,
                months,
                rules.days_per_month,
                theoretical
            ),
        );
    }

    Ok(())
}

//! Final-year completion and forward projection.
//!
//! Both steps credit months under the last regime seen while accumulating.
//! When no regime was seen (only ungrouped periods) entertainment group 2 is
//! assumed.

use tracing::{debug, info};

use crate::config::RuleBook;
use crate::error::EngineResult;
use crate::models::{ContractTransition, Ledger, Regime, WorkerGroup, YearLedgerEntry, YearSource};

use super::entertainment_formula::entertainment_theoretical_days;
use super::month_set::MonthSet;

/// Rule id recorded when the last worked year is completed.
pub const COMPLETION_RULE_ID: &str = "final_year_completion";
/// Rule id recorded for each projected year.
pub const PROJECTION_RULE_ID: &str = "forward_projection";

const FALLBACK_REGIME: Regime = Regime::Entertainment(WorkerGroup::Two);

/// Theoretical days for a set of months under a regime.
fn regime_theoretical_days(
    rules: &RuleBook,
    regime: Regime,
    year: i32,
    months: MonthSet,
    transition: &ContractTransition,
) -> EngineResult<u32> {
    match regime {
        Regime::General => Ok(months.len() * rules.general_regime.days_per_month),
        Regime::Entertainment(group) => Ok(entertainment_theoretical_days(
            &rules.entertainment,
            year,
            months,
            group,
            transition,
        )?
        .theoretical_days),
    }
}

/// Completes the last recorded year to twelve months.
///
/// Applies only when that year holds between one and eleven months. Its
/// theoretical days are recomputed as a full year under the last regime;
/// actual days are left untouched.
pub(crate) fn complete_final_year(
    ledger: &mut Ledger,
    rules: &RuleBook,
    transition: &ContractTransition,
) -> EngineResult<()> {
    let Some(year) = ledger.max_year else {
        return Ok(());
    };
    let regime = ledger.last_regime.unwrap_or(FALLBACK_REGIME);

    let Some(entry) = ledger.entries.get_mut(&year) else {
        return Ok(());
    };
    if entry.theoretical_months == 0 || entry.theoretical_months >= 12 {
        return Ok(());
    }

    let months_before = entry.theoretical_months;
    let days_before = entry.theoretical_days;
    let theoretical = regime_theoretical_days(rules, regime, year, MonthSet::full(), transition)?;

    entry.theoretical_months = 12;
    entry.theoretical_days = theoretical;
    entry.source = YearSource::Completed;

    debug!(year, months_before, theoretical, "Final year completed");

    ledger.audit_trace.record(
        COMPLETION_RULE_ID,
        "Final Year Completion",
        Some(year),
        serde_json::json!({
            "theoretical_months": months_before,
            "theoretical_days": days_before,
            "regime": regime,
            "regime_assumed": ledger.last_regime.is_none()
        }),
        serde_json::json!({
            "theoretical_months": 12,
            "theoretical_days": theoretical
        }),
        format!(
            "Last worked year {} had {} months; completed to 12 under the last regime",
            year, months_before
        ),
    );

    Ok(())
}

/// Appends projected years until the months reach the target.
///
/// Each projected year holds `min(12, remaining)` months, credited from
/// January, with no actual days. Nothing happens for an empty ledger or a
/// target already reached.
pub(crate) fn project_to_target(
    ledger: &mut Ledger,
    rules: &RuleBook,
    transition: &ContractTransition,
) -> EngineResult<()> {
    let Some(max_year) = ledger.max_year else {
        return Ok(());
    };

    let accumulated = ledger.total_theoretical_months();
    let target = ledger.target.months;
    if accumulated >= target {
        return Ok(());
    }

    let regime = ledger.last_regime.unwrap_or(FALLBACK_REGIME);
    let mut remaining = target - accumulated;
    let mut year = max_year;

    while remaining > 0 {
        year += 1;
        let months = remaining.min(12);
        let theoretical =
            regime_theoretical_days(rules, regime, year, MonthSet::first_n(months), transition)?;

        ledger.entries.insert(
            year,
            YearLedgerEntry {
                year,
                actual_days: 0,
                theoretical_days: theoretical,
                theoretical_months: months,
                source: YearSource::Projected,
            },
        );
        ledger.audit_trace.record(
            PROJECTION_RULE_ID,
            "Forward Projection",
            Some(year),
            serde_json::json!({
                "remaining_months": remaining,
                "regime": regime
            }),
            serde_json::json!({
                "theoretical_months": months,
                "theoretical_days": theoretical
            }),
            format!("{} months projected under the last regime", months),
        );

        remaining -= months;
    }

    ledger.max_year = Some(year);

    info!(
        accumulated,
        target,
        projected_years = year - max_year,
        "Projected ledger to contribution target"
    );

    Ok(())
}

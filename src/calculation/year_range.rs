//! Annual caps and ledger range.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::GeneralRegimeRules;
use crate::models::{ContributionTarget, Ledger, Sex, YearLedgerEntry, YearSource};

use super::accumulator::Accumulator;

/// Rule id recorded when a year is capped.
pub const ANNUAL_CAP_RULE_ID: &str = "annual_cap";
/// Rule id recorded once the ledger range is fixed.
pub const YEAR_RANGE_RULE_ID: &str = "year_range";

const MONTHS_PER_YEAR: u32 = 12;

/// Caps actual days at the annual ceiling and months at twelve.
pub(crate) fn apply_annual_caps(rules: &GeneralRegimeRules, acc: &mut Accumulator) {
    for (year, totals) in acc.years.iter_mut() {
        let actual_before = totals.actual_days;
        let months_before = totals.theoretical_months;
        if actual_before <= rules.annual_day_cap && months_before <= MONTHS_PER_YEAR {
            continue;
        }

        if actual_before > rules.annual_day_cap {
            totals.actual_days = rules.annual_day_cap;
            acc.trace.warn(
                "ACTUAL_DAYS_CAPPED",
                format!(
                    "{}: {} actual days reduced to {}",
                    year, actual_before, rules.annual_day_cap
                ),
                "low",
            );
        }
        if months_before > MONTHS_PER_YEAR {
            totals.theoretical_months = MONTHS_PER_YEAR;
            acc.trace.warn(
                "MONTHS_CAPPED",
                format!(
                    "{}: {} theoretical months from different regimes reduced to {}; \
                     {} months discarded, {} theoretical days kept uncapped",
                    year,
                    months_before,
                    MONTHS_PER_YEAR,
                    months_before - MONTHS_PER_YEAR,
                    totals.theoretical_days
                ),
                "medium",
            );
        }

        acc.trace.record(
            ANNUAL_CAP_RULE_ID,
            "Annual Cap",
            Some(*year),
            serde_json::json!({
                "actual_days": actual_before,
                "theoretical_months": months_before
            }),
            serde_json::json!({
                "actual_days": totals.actual_days,
                "theoretical_months": totals.theoretical_months,
                "theoretical_days": totals.theoretical_days,
                "discarded_months": months_before.saturating_sub(MONTHS_PER_YEAR)
            }),
            format!(
                "A year holds at most {} actual days and {} months",
                rules.annual_day_cap, MONTHS_PER_YEAR
            ),
        );
    }
}

/// Builds the ledger over the contiguous range of recorded years.
///
/// Years between the first and last recorded year with no periods become
/// zero rows marked [`YearSource::Uncovered`].
pub(crate) fn build_ledger(acc: Accumulator, sex: Sex, target: ContributionTarget) -> Ledger {
    let Accumulator {
        years,
        last_regime,
        mut trace,
    } = acc;

    let min_year = years.keys().next().copied();
    let max_year = years.keys().next_back().copied();

    let mut entries = BTreeMap::new();
    if let (Some(min), Some(max)) = (min_year, max_year) {
        let mut uncovered = Vec::new();
        for year in min..=max {
            let entry = match years.get(&year) {
                Some(totals) => YearLedgerEntry {
                    year,
                    actual_days: totals.actual_days,
                    theoretical_days: totals.theoretical_days,
                    theoretical_months: totals.theoretical_months,
                    source: YearSource::Recorded,
                },
                None => {
                    uncovered.push(year);
                    YearLedgerEntry::empty(year, YearSource::Uncovered)
                }
            };
            entries.insert(year, entry);
        }

        debug!(min_year = min, max_year = max, uncovered = uncovered.len(), "Ledger range fixed");

        trace.record(
            YEAR_RANGE_RULE_ID,
            "Ledger Year Range",
            None,
            serde_json::json!({ "recorded_years": years.len() }),
            serde_json::json!({
                "min_year": min,
                "max_year": max,
                "uncovered_years": uncovered
            }),
            format!("Ledger covers {} to {} without gaps", min, max),
        );
    }

    Ledger {
        entries,
        min_year,
        max_year,
        sex,
        target,
        last_regime,
        audit_trace: trace,
    }
}

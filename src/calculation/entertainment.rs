//! Entertainment-sector accumulation.
//!
//! Actual days go to the year a period starts in. Theoretical credit is
//! computed per year from the union of covered months, so overlapping
//! periods never credit a month twice.
//!
//! Periods without a worker group are handled in two ways:
//!
//! - in a year that also has grouped periods, their months join the grouped
//!   union and their days are not credited as theoretical days;
//! - in a year with no grouped periods, their days are credited as
//!   theoretical days in the start year and their months are counted.

use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::debug;

use crate::config::EntertainmentRules;
use crate::error::EngineResult;
use crate::models::{ContractTransition, EntertainmentPeriod, Regime, WorkerGroup};

use super::accumulator::{Accumulator, out_of_range, split_by_year};
use super::entertainment_formula::entertainment_theoretical_days;
use super::month_set::MonthSet;

/// Rule id recorded for each year credited through the formula.
pub const ENTERTAINMENT_RULE_ID: &str = "entertainment_theoretical_days";
/// Rule id recorded for each year credited only with ungrouped days.
pub const UNGROUPED_RULE_ID: &str = "ungrouped_credit";

#[derive(Debug)]
struct GroupedYear {
    months: MonthSet,
    group: WorkerGroup,
}

#[derive(Debug, Default)]
struct UngroupedYear {
    months: MonthSet,
    days: u32,
}

/// Accumulates all entertainment-sector periods.
///
/// The representative group of a year is the group of the last grouped
/// period, in input order, that touches the year.
pub(crate) fn accumulate_entertainment(
    periods: &[EntertainmentPeriod],
    rules: &EntertainmentRules,
    transition: &ContractTransition,
    acc: &mut Accumulator,
) -> EngineResult<()> {
    let mut grouped: BTreeMap<i32, GroupedYear> = BTreeMap::new();
    let mut ungrouped: BTreeMap<i32, UngroupedYear> = BTreeMap::new();

    for (index, period) in periods.iter().enumerate() {
        let context = format!("entertainment period #{}", index + 1);
        let (start, end) = period.span(&context)?;

        if let Some(days) = period.credited_days() {
            acc.year_mut(start.year()).add_actual_days(days);
        }

        if let Some(group) = period.group {
            for span in split_by_year(start, end) {
                let year = grouped.entry(span.year).or_insert(GroupedYear {
                    months: MonthSet::empty(),
                    group,
                });
                year.months.insert_range(span.from_month, span.to_month);
                year.group = group;
            }
        } else if let Some(days) = period.credited_days() {
            for span in split_by_year(start, end) {
                ungrouped
                    .entry(span.year)
                    .or_default()
                    .months
                    .insert_range(span.from_month, span.to_month);
            }
            let start_year = ungrouped.entry(start.year()).or_default();
            start_year.days = start_year
                .days
                .checked_add(days)
                .ok_or_else(|| out_of_range(start.year(), "ungrouped days"))?;

            if end.year() != start.year() {
                acc.trace.warn(
                    "UNGROUPED_DAYS_NOT_PRORATED",
                    format!(
                        "{} spans {} to {}; all {} days credited to {}",
                        context,
                        start,
                        end,
                        days,
                        start.year()
                    ),
                    "low",
                );
            }
        }
    }

    for (year, grouped_year) in grouped {
        let mut months = grouped_year.months;
        let folded = ungrouped.remove(&year);
        if let Some(folded) = &folded {
            months = months.union(folded.months);
        }
        if months.is_empty() {
            continue;
        }

        let result =
            entertainment_theoretical_days(rules, year, months, grouped_year.group, transition)?;

        acc.year_mut(year)
            .add_theoretical(year, result.theoretical_days, months.len())?;
        acc.last_regime = Some(Regime::Entertainment(grouped_year.group));

        debug!(
            year,
            group = %grouped_year.group,
            months = months.len(),
            theoretical_days = result.theoretical_days,
            "Entertainment year credited"
        );

        acc.trace.record(
            ENTERTAINMENT_RULE_ID,
            "Entertainment Theoretical Days",
            Some(year),
            serde_json::json!({
                "group": grouped_year.group,
                "grouped_months": grouped_year.months,
                "folded_ungrouped_months": folded.as_ref().map(|f| f.months),
                "folded_ungrouped_days": folded.as_ref().map(|f| f.days),
                "months_by_era": result.months_by_era,
                "permanent_months": result.permanent_months
            }),
            serde_json::json!({
                "theoretical_days": result.theoretical_days,
                "theoretical_months": months.len()
            }),
            format!(
                "{} months, annual rates summing to {}; {} / 12 = {} theoretical days",
                months.len(),
                result.annual_rate_sum,
                result.annual_rate_sum,
                result.theoretical_days
            ),
        );
    }

    for (year, ungrouped_year) in ungrouped {
        if ungrouped_year.months.is_empty() {
            continue;
        }

        acc.year_mut(year)
            .add_theoretical(year, ungrouped_year.days, ungrouped_year.months.len())?;

        acc.trace.record(
            UNGROUPED_RULE_ID,
            "Ungrouped Period Credit",
            Some(year),
            serde_json::json!({
                "months": ungrouped_year.months,
                "days": ungrouped_year.days
            }),
            serde_json::json!({
                "theoretical_days": ungrouped_year.days,
                "theoretical_months": ungrouped_year.months.len()
            }),
            format!(
                "No grouped period in {}; {} recorded days credited as theoretical days",
                year, ungrouped_year.days
            ),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn run(periods: &[EntertainmentPeriod], transition: ContractTransition) -> Accumulator {
        let mut acc = Accumulator::default();
        accumulate_entertainment(periods, &EntertainmentRules::default(), &transition, &mut acc)
            .unwrap();
        acc
    }

    fn grouped(start: &str, end: &str, days: u32, group: WorkerGroup) -> EntertainmentPeriod {
        EntertainmentPeriod::new(start, end, Some(days), Some(group))
    }

    fn ungrouped(start: &str, end: &str, days: Option<u32>) -> EntertainmentPeriod {
        EntertainmentPeriod::new(start, end, days, None)
    }

    // ==========================================================================
    // ENT-010: grouped periods
    // ==========================================================================
    #[test]
    fn test_grouped_years() {
        let acc = run(
            &[
                grouped("01/09/1987", "31/12/1987", 90, WorkerGroup::Two),
                grouped("01/01/1988", "31/12/1988", 312, WorkerGroup::Two),
            ],
            ContractTransition::AlwaysFixedTerm,
        );

        assert_eq!(acc.years[&1987].theoretical_days, 60);
        assert_eq!(acc.years[&1987].theoretical_months, 4);
        assert_eq!(acc.years[&1987].actual_days, 90);
        assert_eq!(acc.years[&1988].theoretical_days, 180);
        assert_eq!(acc.years[&1988].actual_days, 312);
        assert_eq!(acc.last_regime, Some(Regime::Entertainment(WorkerGroup::Two)));
    }

    #[test]
    fn test_overlapping_periods_counted_once() {
        let acc = run(
            &[
                grouped("01/01/1990", "30/06/1990", 100, WorkerGroup::One),
                grouped("01/04/1990", "31/12/1990", 120, WorkerGroup::One),
            ],
            ContractTransition::AlwaysFixedTerm,
        );

        let totals = acc.years[&1990];
        assert_eq!(totals.theoretical_months, 12);
        assert_eq!(totals.theoretical_days, 60);
        assert_eq!(totals.actual_days, 220);
    }

    #[test]
    fn test_cross_year_grouped_period_splits_months() {
        let acc = run(
            &[grouped("01/10/1995", "31/03/1997", 200, WorkerGroup::One)],
            ContractTransition::AlwaysFixedTerm,
        );

        assert_eq!(acc.years[&1995].theoretical_months, 3);
        assert_eq!(acc.years[&1996].theoretical_months, 12);
        assert_eq!(acc.years[&1997].theoretical_months, 3);
        assert_eq!(acc.years[&1995].actual_days, 200);
        assert_eq!(acc.years[&1996].actual_days, 0);
        assert_eq!(acc.years[&1996].theoretical_days, 120);
    }

    #[test]
    fn test_last_group_in_input_order_represents_year() {
        let acc = run(
            &[
                grouped("01/01/1991", "31/12/1991", 50, WorkerGroup::Two),
                grouped("01/03/1991", "31/03/1991", 5, WorkerGroup::One),
            ],
            ContractTransition::AlwaysFixedTerm,
        );
        assert_eq!(acc.years[&1991].theoretical_days, 60);
        assert_eq!(acc.last_regime, Some(Regime::Entertainment(WorkerGroup::One)));
    }

    #[test]
    fn test_zero_days_not_credited_as_actual() {
        let acc = run(
            &[grouped("01/01/1989", "31/03/1989", 0, WorkerGroup::Two)],
            ContractTransition::AlwaysFixedTerm,
        );
        assert_eq!(acc.years[&1989].actual_days, 0);
        assert_eq!(acc.years[&1989].theoretical_months, 3);
    }

    // ==========================================================================
    // ENT-011: ungrouped periods
    // ==========================================================================
    #[test]
    fn test_ungrouped_only_year_credits_days() {
        let acc = run(
            &[ungrouped("01/02/1984", "31/05/1984", Some(100))],
            ContractTransition::AlwaysFixedTerm,
        );
        let totals = acc.years[&1984];
        assert_eq!(totals.actual_days, 100);
        assert_eq!(totals.theoretical_days, 100);
        assert_eq!(totals.theoretical_months, 4);
        assert_eq!(acc.last_regime, None);
        assert_eq!(acc.trace.steps_for(UNGROUPED_RULE_ID).count(), 1);
    }

    #[test]
    fn test_ungrouped_months_fold_into_grouped_year() {
        let acc = run(
            &[
                grouped("01/01/1986", "30/06/1986", 80, WorkerGroup::Two),
                ungrouped("01/07/1986", "31/12/1986", Some(150)),
            ],
            ContractTransition::AlwaysFixedTerm,
        );
        let totals = acc.years[&1986];
        assert_eq!(totals.theoretical_months, 12);
        assert_eq!(totals.theoretical_days, 180);
        assert_eq!(totals.actual_days, 230);
        assert_eq!(acc.trace.steps_for(UNGROUPED_RULE_ID).count(), 0);
    }

    #[test]
    fn test_ungrouped_without_days_is_ignored() {
        let acc = run(
            &[
                ungrouped("01/01/1983", "31/12/1983", None),
                ungrouped("01/01/1984", "31/12/1984", Some(0)),
            ],
            ContractTransition::AlwaysFixedTerm,
        );
        assert!(acc.years.is_empty());
    }

    #[test]
    fn test_ungrouped_cross_year_days_stay_in_start_year() {
        let acc = run(
            &[ungrouped("01/11/2000", "28/02/2002", Some(90))],
            ContractTransition::AlwaysFixedTerm,
        );

        assert_eq!(acc.years[&2000].theoretical_days, 90);
        assert_eq!(acc.years[&2000].theoretical_months, 2);
        assert_eq!(acc.years[&2001].theoretical_days, 0);
        assert_eq!(acc.years[&2001].theoretical_months, 12);
        assert_eq!(acc.years[&2002].theoretical_days, 0);
        assert_eq!(acc.years[&2002].theoretical_months, 2);
        assert!(acc.trace.has_warning("UNGROUPED_DAYS_NOT_PRORATED"));
    }

    // ==========================================================================
    // ENT-012: contract transition
    // ==========================================================================
    #[test]
    fn test_1997_permanent_mixed_statement() {
        let acc = run(
            &[
                grouped("01/01/1996", "31/12/1996", 312, WorkerGroup::One),
                grouped("01/01/1997", "31/07/1997", 182, WorkerGroup::One),
                ungrouped("01/01/1997", "31/12/1997", None),
                EntertainmentPeriod::new("01/01/1997", "30/06/1998", None, Some(WorkerGroup::One)),
                grouped("01/08/1997", "30/09/1997", 52, WorkerGroup::One),
                grouped("01/10/1997", "31/12/1997", 78, WorkerGroup::Two),
            ],
            ContractTransition::AlwaysPermanent,
        );

        assert_eq!(acc.years[&1996].theoretical_days, 120);
        assert_eq!(acc.years[&1996].theoretical_months, 12);
        assert_eq!(acc.years[&1996].actual_days, 312);

        assert_eq!(acc.years[&1997].theoretical_days, 282);
        assert_eq!(acc.years[&1997].theoretical_months, 12);
        assert_eq!(acc.years[&1997].actual_days, 312);

        assert_eq!(acc.years[&1998].theoretical_days, 156);
        assert_eq!(acc.years[&1998].theoretical_months, 6);
        assert_eq!(acc.last_regime, Some(Regime::Entertainment(WorkerGroup::One)));
    }

    #[test]
    fn test_inverted_period_is_rejected() {
        let mut acc = Accumulator::default();
        let result = accumulate_entertainment(
            &[grouped("01/06/1990", "01/01/1990", 10, WorkerGroup::One)],
            &EntertainmentRules::default(),
            &ContractTransition::AlwaysFixedTerm,
            &mut acc,
        );
        assert!(matches!(result, Err(EngineError::InvalidPeriod { .. })));
    }

    // ==========================================================================
    // ENT-013: out-of-range counts
    // ==========================================================================
    #[test]
    fn test_huge_day_counts_saturate_actual_days() {
        let acc = run(
            &[
                grouped("01/01/2000", "30/06/2000", u32::MAX - 1, WorkerGroup::Two),
                grouped("01/07/2000", "31/12/2000", 10, WorkerGroup::Two),
            ],
            ContractTransition::AlwaysFixedTerm,
        );
        let totals = acc.years[&2000];
        assert_eq!(totals.actual_days, u32::MAX);
        assert_eq!(totals.theoretical_days, 260);
        assert_eq!(totals.theoretical_months, 12);
    }

    #[test]
    fn test_ungrouped_day_overflow_is_an_error() {
        let mut acc = Accumulator::default();
        let result = accumulate_entertainment(
            &[
                ungrouped("01/01/2000", "30/06/2000", Some(u32::MAX - 1)),
                ungrouped("01/07/2000", "31/12/2000", Some(10)),
            ],
            &EntertainmentRules::default(),
            &ContractTransition::AlwaysFixedTerm,
            &mut acc,
        );
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }
}

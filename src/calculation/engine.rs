//! The contribution engine.
//!
//! [`ContributionEngine::compute`] turns extracted period records into a
//! year-indexed [`Ledger`]:
//!
//! 1. general-regime periods are accumulated into their start year;
//! 2. entertainment periods are accumulated, with theoretical days from the
//!    union of covered months in each year;
//! 3. actual days and months are capped per year;
//! 4. the ledger range is fixed and gap years are filled with zero rows;
//! 5. the last worked year is completed to twelve months;
//! 6. future years are projected until the contribution target is reached.

use std::time::Instant;

use tracing::{info, warn};

use crate::config::{ConfigLoader, RuleBook};
use crate::error::EngineResult;
use crate::models::{EngineConfig, Ledger, PeriodRecords, Sex};

use super::accumulator::Accumulator;
use super::entertainment::accumulate_entertainment;
use super::general_regime::accumulate_general_regime;
use super::projection::{complete_final_year, project_to_target};
use super::year_range::{apply_annual_caps, build_ledger};

/// Computes contribution ledgers against a rule book.
///
/// The engine holds no per-invocation state; one instance can serve any
/// number of calculations.
///
/// # Example
///
/// ```
/// use inps_contributions::calculation::ContributionEngine;
/// use inps_contributions::models::{EngineConfig, GeneralRegimePeriod, PeriodRecords, Sex};
///
/// let records = PeriodRecords {
///     general_regime: vec![GeneralRegimePeriod::new("01/11/1981", "31/12/1981", 8)],
///     ..Default::default()
/// };
/// let config = EngineConfig { sex: Sex::Female, ..Default::default() };
///
/// let ledger = ContributionEngine::statutory().compute(&records, &config)?;
/// assert_eq!(ledger.get(1981).unwrap().actual_days, 48);
/// assert_eq!(ledger.total_theoretical_months(), 502);
/// # Ok::<(), inps_contributions::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContributionEngine {
    rules: RuleBook,
}

impl ContributionEngine {
    /// Creates an engine over the given rule book.
    pub fn new(rules: RuleBook) -> Self {
        Self { rules }
    }

    /// Creates an engine over the statutory rule book.
    pub fn statutory() -> Self {
        Self::default()
    }

    /// Returns the rule book in use.
    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Computes the ledger for one set of records.
    ///
    /// The result depends only on its inputs: two calls with equal records
    /// and configuration produce equal ledgers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDate` or `InvalidPeriod` for the first period with a
    /// malformed or inverted date range, and `CalculationError` if a month
    /// falls outside every configured rate era. No partial ledger is
    /// returned.
    pub fn compute(&self, records: &PeriodRecords, config: &EngineConfig) -> EngineResult<Ledger> {
        let start_time = Instant::now();
        let target = self.rules.targets.for_sex(config.sex);

        let mut acc = Accumulator::default();
        if config.sex == Sex::Undetermined {
            warn!("Sex undetermined; using the {} target", target.label);
            acc.trace.warn(
                "SEX_UNDETERMINED",
                format!("Sex could not be determined; using the {} target", target.label),
                "medium",
            );
        }

        accumulate_general_regime(&records.general_regime, &self.rules.general_regime, &mut acc)?;
        accumulate_entertainment(
            &records.entertainment,
            &self.rules.entertainment,
            &config.contract_transition,
            &mut acc,
        )?;
        apply_annual_caps(&self.rules.general_regime, &mut acc);

        let mut ledger = build_ledger(acc, config.sex, target);
        complete_final_year(&mut ledger, &self.rules, &config.contract_transition)?;
        project_to_target(&mut ledger, &self.rules, &config.contract_transition)?;

        info!(
            periods = records.len(),
            years = ledger.year_count(),
            theoretical_months = ledger.total_theoretical_months(),
            warnings = ledger.audit_trace.warnings.len(),
            duration_us = start_time.elapsed().as_micros(),
            "Contribution ledger computed"
        );

        Ok(ledger)
    }
}

impl From<&ConfigLoader> for ContributionEngine {
    fn from(loader: &ConfigLoader) -> Self {
        Self::new(loader.rules().clone())
    }
}

/// Computes a ledger with the statutory rule book.
///
/// Shorthand for `ContributionEngine::statutory().compute(records, config)`.
pub fn compute(records: &PeriodRecords, config: &EngineConfig) -> EngineResult<Ledger> {
    ContributionEngine::statutory().compute(records, config)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::calculation::{COMPLETION_RULE_ID, PROJECTION_RULE_ID};
    use crate::config::TargetRules;
    use crate::error::EngineError;
    use crate::models::{
        ContractTransition, EntertainmentPeriod, GeneralRegimePeriod, Regime, WorkerGroup,
        YearSource,
    };

    /// An engine with zero targets, so no year is projected.
    fn engine_without_projection() -> ContributionEngine {
        ContributionEngine::new(RuleBook {
            targets: TargetRules {
                female_months: 0,
                male_months: 0,
            },
            ..RuleBook::statutory()
        })
    }

    fn male() -> EngineConfig {
        EngineConfig::new(Sex::Male, ContractTransition::AlwaysFixedTerm)
    }

    fn general(start: &str, end: &str, weeks: u32) -> GeneralRegimePeriod {
        GeneralRegimePeriod::new(start, end, weeks)
    }

    fn grouped(start: &str, end: &str, days: u32, group: WorkerGroup) -> EntertainmentPeriod {
        EntertainmentPeriod::new(start, end, Some(days), Some(group))
    }

    // ==========================================================================
    // ENG-001: general regime only
    // ==========================================================================
    #[test]
    fn test_general_regime_statement() {
        let records = PeriodRecords {
            general_regime: vec![
                general("01/11/1981", "31/12/1981", 8),
                general("01/01/1982", "31/03/1982", 12),
                general("01/07/1983", "31/12/1983", 10),
            ],
            ..Default::default()
        };

        let ledger = engine_without_projection().compute(&records, &male()).unwrap();

        let y1981 = ledger.get(1981).unwrap();
        assert_eq!(
            (y1981.actual_days, y1981.theoretical_days, y1981.theoretical_months),
            (48, 52, 2)
        );
        let y1982 = ledger.get(1982).unwrap();
        assert_eq!(
            (y1982.actual_days, y1982.theoretical_days, y1982.theoretical_months),
            (72, 78, 3)
        );

        let y1983 = ledger.get(1983).unwrap();
        assert_eq!(y1983.actual_days, 60);
        assert_eq!(y1983.theoretical_days, 312);
        assert_eq!(y1983.theoretical_months, 12);
        assert_eq!(y1983.source, YearSource::Completed);
        assert_eq!(ledger.last_regime, Some(Regime::General));
    }

    // ==========================================================================
    // ENG-002: entertainment only
    // ==========================================================================
    #[test]
    fn test_entertainment_statement() {
        let records = PeriodRecords {
            entertainment: vec![
                grouped("01/09/1987", "31/12/1987", 90, WorkerGroup::Two),
                grouped("01/01/1988", "31/12/1988", 312, WorkerGroup::Two),
            ],
            ..Default::default()
        };

        let ledger = engine_without_projection().compute(&records, &male()).unwrap();

        assert_eq!(ledger.get(1987).unwrap().theoretical_days, 60);
        assert_eq!(ledger.get(1987).unwrap().theoretical_months, 4);
        assert_eq!(ledger.get(1988).unwrap().theoretical_days, 180);
        assert_eq!(ledger.get(1988).unwrap().source, YearSource::Recorded);
        assert_eq!(ledger.audit_trace.steps_for(COMPLETION_RULE_ID).count(), 0);
    }

    #[test]
    fn test_overlapping_entertainment_periods() {
        let records = PeriodRecords {
            entertainment: vec![
                grouped("01/01/1990", "30/06/1990", 100, WorkerGroup::One),
                grouped("01/04/1990", "31/12/1990", 120, WorkerGroup::One),
            ],
            ..Default::default()
        };

        let ledger = engine_without_projection().compute(&records, &male()).unwrap();
        let entry = ledger.get(1990).unwrap();
        assert_eq!(entry.theoretical_months, 12);
        assert_eq!(entry.theoretical_days, 60);
        assert_eq!(entry.actual_days, 220);
    }

    // ==========================================================================
    // ENG-003: both regimes in one year
    // ==========================================================================
    #[test]
    fn test_combined_regimes_same_year() {
        let records = PeriodRecords {
            general_regime: vec![general("01/01/1982", "31/03/1982", 10)],
            entertainment: vec![
                grouped("01/07/1982", "31/12/1982", 120, WorkerGroup::Two),
                grouped("01/01/1983", "30/06/1983", 130, WorkerGroup::Two),
            ],
            ..Default::default()
        };

        let ledger = engine_without_projection().compute(&records, &male()).unwrap();
        let entry = ledger.get(1982).unwrap();
        assert_eq!(entry.actual_days, 180);
        assert_eq!(entry.theoretical_days, 168);
        assert_eq!(entry.theoretical_months, 9);

        // Entertainment was seen last, so 1983 is completed with its formula.
        let last = ledger.get(1983).unwrap();
        assert_eq!(last.theoretical_days, 180);
        assert_eq!(last.theoretical_months, 12);
    }

    #[test]
    fn test_months_capped_when_regimes_overlap() {
        let records = PeriodRecords {
            general_regime: vec![general("01/01/1992", "31/12/1992", 52)],
            entertainment: vec![grouped("01/06/1992", "31/12/1992", 100, WorkerGroup::One)],
            ..Default::default()
        };

        let ledger = engine_without_projection().compute(&records, &male()).unwrap();
        let entry = ledger.get(1992).unwrap();
        assert_eq!(entry.theoretical_months, 12);
        assert_eq!(entry.actual_days, 312);
        assert!(ledger.audit_trace.has_warning("MONTHS_CAPPED"));
        assert!(ledger.audit_trace.has_warning("ACTUAL_DAYS_CAPPED"));
    }

    // ==========================================================================
    // ENG-004: permanent contract
    // ==========================================================================
    #[test]
    fn test_permanent_contract_full_year_after_1997() {
        let records = PeriodRecords {
            entertainment: vec![grouped("01/01/1998", "31/12/1998", 312, WorkerGroup::One)],
            ..Default::default()
        };
        let config = EngineConfig::new(Sex::Male, ContractTransition::AlwaysPermanent);

        let ledger = engine_without_projection().compute(&records, &config).unwrap();
        assert_eq!(ledger.get(1998).unwrap().theoretical_days, 312);
    }

    // ==========================================================================
    // ENG-005: ledger range and projection
    // ==========================================================================
    #[test]
    fn test_gap_years_filled() {
        let records = PeriodRecords {
            general_regime: vec![
                general("01/01/1981", "31/12/1981", 52),
                general("01/01/1985", "31/12/1985", 52),
            ],
            ..Default::default()
        };

        let ledger = engine_without_projection().compute(&records, &male()).unwrap();
        assert_eq!(ledger.entries.len(), 5);
        for year in 1982..=1984 {
            let entry = ledger.get(year).unwrap();
            assert_eq!(entry.source, YearSource::Uncovered);
            assert_eq!(entry.theoretical_months, 0);
        }
    }

    #[test]
    fn test_projection_to_female_target() {
        let records = PeriodRecords {
            general_regime: vec![
                general("01/11/1981", "31/12/1981", 8),
                general("01/01/1982", "31/03/1982", 12),
                general("01/07/1983", "31/12/1983", 10),
            ],
            ..Default::default()
        };
        let config = EngineConfig::new(Sex::Female, ContractTransition::AlwaysFixedTerm);

        let ledger = compute(&records, &config).unwrap();

        // 17 recorded months; 485 projected = 40 full years + 5 months.
        assert_eq!(ledger.total_theoretical_months(), 502);
        assert_eq!(ledger.max_year, Some(2024));
        assert_eq!(ledger.get(2023).unwrap().theoretical_days, 312);
        assert_eq!(ledger.get(2024).unwrap().theoretical_months, 5);
        assert_eq!(ledger.get(2024).unwrap().theoretical_days, 130);
        assert_eq!(ledger.audit_trace.steps_for(PROJECTION_RULE_ID).count(), 41);
        assert!(
            ledger
                .rows()
                .filter(|e| e.source == YearSource::Projected)
                .all(|e| e.actual_days == 0)
        );
    }

    #[test]
    fn test_undetermined_sex_uses_male_target_and_warns() {
        let records = PeriodRecords {
            general_regime: vec![general("01/01/2000", "31/12/2000", 52)],
            ..Default::default()
        };
        let config = EngineConfig::new(Sex::Undetermined, ContractTransition::AlwaysFixedTerm);

        let ledger = compute(&records, &config).unwrap();
        assert_eq!(ledger.target.months, 514);
        assert_eq!(ledger.total_theoretical_months(), 514);
        assert!(ledger.audit_trace.has_warning("SEX_UNDETERMINED"));
    }

    #[test]
    fn test_empty_records_give_empty_ledger() {
        let ledger = compute(&PeriodRecords::default(), &male()).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.min_year, None);
        assert_eq!(ledger.max_year, None);
    }

    #[test]
    fn test_invalid_period_aborts() {
        let records = PeriodRecords {
            general_regime: vec![
                general("01/01/1981", "31/12/1981", 52),
                general("31/12/1982", "01/01/1982", 52),
            ],
            ..Default::default()
        };
        let result = compute(&records, &male());
        assert!(matches!(result, Err(EngineError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_huge_counts_are_capped_not_wrapped() {
        let records = PeriodRecords {
            general_regime: vec![general("01/01/2000", "31/12/2000", u32::MAX / 2)],
            entertainment: vec![
                grouped("01/01/2001", "30/06/2001", u32::MAX - 1, WorkerGroup::Two),
                grouped("01/07/2001", "31/12/2001", 10, WorkerGroup::Two),
            ],
            ..Default::default()
        };

        let ledger = engine_without_projection().compute(&records, &male()).unwrap();
        assert_eq!(ledger.get(2000).unwrap().actual_days, 312);
        assert_eq!(ledger.get(2001).unwrap().actual_days, 312);
        assert!(ledger.audit_trace.has_warning("ACTUAL_DAYS_CAPPED"));
    }

    #[test]
    fn test_ungrouped_day_overflow_aborts() {
        let records = PeriodRecords {
            entertainment: vec![
                EntertainmentPeriod::new("01/01/2000", "30/06/2000", Some(u32::MAX - 1), None),
                EntertainmentPeriod::new("01/07/2000", "31/12/2000", Some(10), None),
            ],
            ..Default::default()
        };
        let result = compute(&records, &male());
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_engine_from_loader() {
        let loader = ConfigLoader::statutory();
        let engine = ContributionEngine::from(&loader);
        assert_eq!(engine.rules(), &RuleBook::statutory());
    }

    // ==========================================================================
    // ENG-100: properties
    // ==========================================================================

    fn date(year: i32, month: u32) -> String {
        format!("01/{:02}/{}", month, year)
    }

    prop_compose! {
        fn arb_general()(
            year in 1975i32..2020,
            from in 1u32..=12,
            len in 0u32..18,
            weeks in 0u32..80,
        ) -> GeneralRegimePeriod {
            let end_index = (from - 1 + len) as i32;
            let end_year = year + end_index / 12;
            let end_month = (end_index % 12) as u32 + 1;
            GeneralRegimePeriod::new(date(year, from), date(end_year, end_month), weeks)
        }
    }

    prop_compose! {
        fn arb_entertainment()(
            year in 1975i32..2020,
            from in 1u32..=12,
            len in 0u32..30,
            days in proptest::option::of(0u32..400),
            group in proptest::option::of(
                prop_oneof![Just(WorkerGroup::One), Just(WorkerGroup::Two)]
            ),
        ) -> EntertainmentPeriod {
            let end_index = (from - 1 + len) as i32;
            let end_year = year + end_index / 12;
            let end_month = (end_index % 12) as u32 + 1;
            EntertainmentPeriod::new(date(year, from), date(end_year, end_month), days, group)
        }
    }

    prop_compose! {
        fn arb_records()(
            general_regime in proptest::collection::vec(arb_general(), 0..6),
            entertainment in proptest::collection::vec(arb_entertainment(), 0..8),
        ) -> PeriodRecords {
            PeriodRecords { general_regime, entertainment, ..Default::default() }
        }
    }

    fn arb_sex() -> impl Strategy<Value = Sex> {
        prop_oneof![Just(Sex::Male), Just(Sex::Female), Just(Sex::Undetermined)]
    }

    proptest! {
        #[test]
        fn prop_rows_respect_annual_caps(records in arb_records(), sex in arb_sex()) {
            let config = EngineConfig::new(sex, ContractTransition::AlwaysFixedTerm);
            let ledger = compute(&records, &config).unwrap();
            for entry in ledger.rows() {
                prop_assert!(entry.theoretical_months <= 12);
                prop_assert!(entry.actual_days <= 312);
            }
        }

        #[test]
        fn prop_ledger_has_no_gaps(records in arb_records()) {
            let ledger = compute(&records, &male()).unwrap();
            if let (Some(min), Some(max)) = (ledger.min_year, ledger.max_year) {
                let years: Vec<i32> = ledger.entries.keys().copied().collect();
                prop_assert_eq!(years, (min..=max).collect::<Vec<_>>());
            } else {
                prop_assert!(ledger.is_empty());
            }
        }

        #[test]
        fn prop_projection_reaches_target(records in arb_records(), sex in arb_sex()) {
            let config = EngineConfig::new(sex, ContractTransition::AlwaysPermanent);
            let ledger = compute(&records, &config).unwrap();
            if !ledger.is_empty() {
                let total = ledger.total_theoretical_months();
                prop_assert!(total >= ledger.target.months);
                let projected = ledger
                    .rows()
                    .filter(|e| e.source == YearSource::Projected)
                    .count() as u32;
                prop_assert!(projected <= ledger.target.months.div_ceil(12));
                if projected > 0 {
                    prop_assert_eq!(total, ledger.target.months);
                }
            }
        }

        #[test]
        fn prop_compute_is_deterministic(records in arb_records(), sex in arb_sex()) {
            let config = EngineConfig::new(sex, ContractTransition::AlwaysFixedTerm);
            let first = compute(&records, &config).unwrap();
            let second = compute(&records, &config).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}

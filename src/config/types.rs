//! Configuration types for the contribution rules.
//!
//! This module contains the strongly-typed rule structures that are
//! deserialized from the YAML rule book, together with the statutory
//! values compiled into the crate.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{ContributionTarget, Sex, WorkerGroup, YearMonth};

/// Constants of the weekly-accounted general regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralRegimeRules {
    /// Contribution days credited per recorded week.
    pub days_per_week: u32,
    /// Theoretical days credited per covered month.
    pub days_per_month: u32,
    /// Maximum actual days a contribution year can hold.
    pub annual_day_cap: u32,
}

impl Default for GeneralRegimeRules {
    fn default() -> Self {
        Self {
            days_per_week: 6,
            days_per_month: 26,
            annual_day_cap: 312,
        }
    }
}

/// One era of the entertainment-sector rate history.
///
/// An era covers an inclusive range of months. `from: None` means "since
/// the beginning" and `until: None` means "still in force".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntertainmentEra {
    /// Stable identifier used in audit steps.
    pub id: String,
    /// Human-readable description of the era.
    pub name: String,
    /// First month of the era.
    #[serde(default)]
    pub from: Option<YearMonth>,
    /// Last month of the era.
    #[serde(default)]
    pub until: Option<YearMonth>,
    /// Annual days for group 1 workers.
    pub group_one_days: u32,
    /// Annual days for group 2 workers.
    pub group_two_days: u32,
    /// Annual days under a permanent contract, regardless of group.
    #[serde(default)]
    pub permanent_days: Option<u32>,
}

impl EntertainmentEra {
    /// Returns true if the month falls inside this era.
    pub fn covers(&self, month: YearMonth) -> bool {
        self.from.is_none_or(|from| month >= from) && self.until.is_none_or(|until| month <= until)
    }

    /// Returns the annual rate for a group and contract status within this era.
    pub fn annual_days(&self, group: WorkerGroup, permanent: bool) -> u32 {
        match (permanent, self.permanent_days) {
            (true, Some(days)) => days,
            _ => match group {
                WorkerGroup::One => self.group_one_days,
                WorkerGroup::Two => self.group_two_days,
            },
        }
    }
}

/// The entertainment-sector rate history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntertainmentRules {
    /// Eras in chronological order, contiguous, covering all time.
    pub eras: Vec<EntertainmentEra>,
}

impl Default for EntertainmentRules {
    fn default() -> Self {
        Self {
            eras: vec![
                EntertainmentEra {
                    id: "pre_1993".to_string(),
                    name: "Fino al 1992".to_string(),
                    from: None,
                    until: Some(YearMonth::new(1992, 12)),
                    group_one_days: 60,
                    group_two_days: 180,
                    permanent_days: None,
                },
                EntertainmentEra {
                    id: "from_1993".to_string(),
                    name: "Gennaio 1993 - luglio 1997".to_string(),
                    from: Some(YearMonth::new(1993, 1)),
                    until: Some(YearMonth::new(1997, 7)),
                    group_one_days: 120,
                    group_two_days: 260,
                    permanent_days: None,
                },
                EntertainmentEra {
                    id: "from_aug_1997".to_string(),
                    name: "Dal 1 agosto 1997".to_string(),
                    from: Some(YearMonth::new(1997, 8)),
                    until: None,
                    group_one_days: 120,
                    group_two_days: 260,
                    permanent_days: Some(312),
                },
            ],
        }
    }
}

impl EntertainmentRules {
    /// Returns the era a month falls in.
    pub fn era_for(&self, month: YearMonth) -> EngineResult<&EntertainmentEra> {
        self.eras
            .iter()
            .find(|era| era.covers(month))
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("no entertainment era covers {}", month),
            })
    }

    /// Returns the annual day rate for a month, group and contract status.
    pub fn annual_rate(
        &self,
        month: YearMonth,
        group: WorkerGroup,
        permanent: bool,
    ) -> EngineResult<u32> {
        Ok(self.era_for(month)?.annual_days(group, permanent))
    }

    /// Checks that the eras are contiguous and cover every month.
    fn validate(&self) -> Result<(), String> {
        let (Some(first), Some(last)) = (self.eras.first(), self.eras.last()) else {
            return Err("entertainment era table is empty".to_string());
        };
        if first.from.is_some() {
            return Err(format!("first era '{}' must not have a start month", first.id));
        }
        if last.until.is_some() {
            return Err(format!("last era '{}' must not have an end month", last.id));
        }

        for era in &self.eras {
            for bound in [era.from, era.until].into_iter().flatten() {
                if !(1..=12).contains(&bound.month) {
                    return Err(format!("era '{}' has invalid month {}", era.id, bound));
                }
            }
            if let (Some(from), Some(until)) = (era.from, era.until) {
                if until < from {
                    return Err(format!("era '{}' ends before it starts", era.id));
                }
            }
        }

        for pair in self.eras.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            let (Some(until), Some(from)) = (previous.until, next.from) else {
                return Err(format!(
                    "eras '{}' and '{}' are not bounded against each other",
                    previous.id, next.id
                ));
            };
            let expected = if until.month == 12 {
                YearMonth::new(until.year + 1, 1)
            } else {
                YearMonth::new(until.year, until.month + 1)
            };
            if from != expected {
                return Err(format!(
                    "era '{}' must start at {} right after '{}'",
                    next.id, expected, previous.id
                ));
            }
        }

        Ok(())
    }
}

/// Contribution targets by sex, in months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRules {
    /// Target for women (41 years and 10 months).
    pub female_months: u32,
    /// Target for men and for undetermined sex (42 years and 10 months).
    pub male_months: u32,
}

impl Default for TargetRules {
    fn default() -> Self {
        Self {
            female_months: 41 * 12 + 10,
            male_months: 42 * 12 + 10,
        }
    }
}

impl TargetRules {
    /// Returns the target for the given sex.
    pub fn for_sex(&self, sex: Sex) -> ContributionTarget {
        match sex {
            Sex::Female => ContributionTarget::from_months(self.female_months),
            Sex::Male | Sex::Undetermined => ContributionTarget::from_months(self.male_months),
        }
    }
}

/// The complete rule book used by the contribution engine.
///
/// [`RuleBook::default`] carries the statutory values; a YAML rule book can
/// be loaded with [`ConfigLoader`](super::ConfigLoader).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBook {
    /// General-regime constants.
    pub general_regime: GeneralRegimeRules,
    /// Entertainment-sector rate history.
    pub entertainment: EntertainmentRules,
    /// Contribution targets.
    pub targets: TargetRules,
}

impl RuleBook {
    /// Returns the statutory rule book.
    pub fn statutory() -> Self {
        Self::default()
    }

    /// Checks the rule book for inconsistencies.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let general = &self.general_regime;
        if general.days_per_week == 0 || general.days_per_month == 0 || general.annual_day_cap == 0
        {
            return Err("general regime constants must be positive".to_string());
        }
        self.entertainment.validate()
    }
}

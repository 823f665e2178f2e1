//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the
//! contribution rule book from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{ContributionTarget, Sex, WorkerGroup, YearMonth};

use super::types::{EntertainmentRules, GeneralRegimeRules, RuleBook, TargetRules};

/// Loads and provides access to the contribution rule book.
///
/// The `ConfigLoader` reads YAML files from a directory and validates the
/// resulting [`RuleBook`]. When no directory is given the statutory rule
/// book compiled into the crate is used.
///
/// # Directory Structure
///
/// ```text
/// config/inps/
/// ├── general_regime.yaml  # Week/month day conversions and annual cap
/// ├── entertainment.yaml   # Entertainment-sector rate eras
/// └── targets.yaml         # Contribution targets by sex
/// ```
///
/// # Example
///
/// ```no_run
/// use inps_contributions::config::ConfigLoader;
/// use inps_contributions::models::Sex;
///
/// let loader = ConfigLoader::load("./config/inps").unwrap();
/// println!("Target: {}", loader.target_for(Sex::Female).label);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    rules: RuleBook,
}

impl ConfigLoader {
    /// Loads the rule book from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/inps")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The era table is not contiguous or does not cover every month
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let general_regime =
            Self::load_yaml::<GeneralRegimeRules>(&path.join("general_regime.yaml"))?;

        let entertainment_path = path.join("entertainment.yaml");
        let entertainment = Self::load_yaml::<EntertainmentRules>(&entertainment_path)?;

        let targets = Self::load_yaml::<TargetRules>(&path.join("targets.yaml"))?;

        let rules = RuleBook {
            general_regime,
            entertainment,
            targets,
        };

        rules
            .validate()
            .map_err(|message| EngineError::ConfigParseError {
                path: path.display().to_string(),
                message,
            })?;

        tracing::debug!(
            path = %path.display(),
            eras = rules.entertainment.eras.len(),
            "Loaded contribution rule book"
        );

        Ok(Self { rules })
    }

    /// Returns a loader holding the statutory rule book.
    pub fn statutory() -> Self {
        Self::default()
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying rule book.
    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Returns the contribution target for the given sex.
    pub fn target_for(&self, sex: Sex) -> ContributionTarget {
        self.rules.targets.for_sex(sex)
    }

    /// Gets the entertainment-sector annual rate for a month.
    ///
    /// # Example
    ///
    /// ```
    /// use inps_contributions::config::ConfigLoader;
    /// use inps_contributions::models::{WorkerGroup, YearMonth};
    ///
    /// let loader = ConfigLoader::statutory();
    /// let rate = loader.rate_for(YearMonth::new(1987, 9), WorkerGroup::Two, false)?;
    /// assert_eq!(rate, 180);
    /// # Ok::<(), inps_contributions::error::EngineError>(())
    /// ```
    pub fn rate_for(
        &self,
        month: YearMonth,
        group: WorkerGroup,
        permanent: bool,
    ) -> EngineResult<u32> {
        self.rules.entertainment.annual_rate(month, group, permanent)
    }
}

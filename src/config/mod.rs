//! Configuration loading and management for the contribution engine.
//!
//! This module provides the regulatory rule book (general-regime constants,
//! the entertainment-sector rate eras, and the contribution targets) and
//! the functionality to load it from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use inps_contributions::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/inps").unwrap();
//! println!("Eras: {}", config.rules().entertainment.eras.len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EntertainmentEra, EntertainmentRules, GeneralRegimeRules, RuleBook, TargetRules};

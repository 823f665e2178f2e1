//! Error types for the contribution engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while extracting, computing and
//! reporting contributions.

use thiserror::Error;

/// The main error type for the contribution engine.
///
/// All library operations return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use inps_contributions::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/entertainment.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/entertainment.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A period date could not be parsed as `DD/MM/YYYY`.
    #[error("Invalid date '{value}' in {context}")]
    InvalidDate {
        /// The raw date text.
        value: String,
        /// Where the date was found (e.g. "entertainment period #3 start").
        context: String,
    },

    /// A period whose dates are individually valid but inconsistent.
    #[error("Invalid period {context}: {message}")]
    InvalidPeriod {
        /// Which period was rejected.
        context: String,
        /// What made the period invalid.
        message: String,
    },

    /// The permanent-contract marker is neither "always" nor a `DD/MM/YYYY` date.
    #[error("Invalid contract transition '{value}': expected DD/MM/YYYY")]
    InvalidContractTransition {
        /// The rejected marker.
        value: String,
    },

    /// The source document does not exist or cannot be read.
    #[error("Source document not found: {path}")]
    DocumentNotFound {
        /// The path of the missing document.
        path: String,
    },

    /// The source document was read but could not be decoded.
    #[error("Failed to extract records from '{path}': {message}")]
    ExtractionError {
        /// The path of the document.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// Writing a report or dump artifact failed.
    #[error("Failed to write report '{path}': {message}")]
    ReportError {
        /// The output path.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

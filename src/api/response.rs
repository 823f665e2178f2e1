//! Response types for the contribution engine API.
//!
//! This module defines the success envelope, the error response structures
//! and the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::Ledger;

/// Successful response of the `/calculate` endpoint.
///
/// The identifier and timestamp live here rather than in the [`Ledger`], so
/// the ledger itself stays deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Unique identifier of this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the ledger.
    pub engine_version: String,
    /// The computed ledger.
    pub ledger: Ledger,
}

impl CalculationResponse {
    /// Wraps a ledger with a fresh identifier and the current time.
    pub fn new(ledger: Ledger) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            ledger,
        }
    }
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn bad_request(code: &str, message: String, details: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::with_details(code, message, details),
        }
    }

    fn internal(code: &str, message: &str, details: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::with_details(code, message, details),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } => {
                Self::internal("CONFIG_ERROR", "Configuration error", message)
            }
            EngineError::ConfigParseError { .. } => {
                Self::internal("CONFIG_ERROR", "Configuration parse error", message)
            }
            EngineError::InvalidDate { .. } => Self::bad_request(
                "INVALID_DATE",
                message,
                "Period dates must be formatted as DD/MM/YYYY",
            ),
            EngineError::InvalidPeriod { .. } => Self::bad_request(
                "INVALID_PERIOD",
                message,
                "A period must not end before it starts",
            ),
            EngineError::InvalidContractTransition { .. } => Self::bad_request(
                "INVALID_CONTRACT_TRANSITION",
                message,
                "Use \"always\" or a DD/MM/YYYY date",
            ),
            EngineError::DocumentNotFound { .. } | EngineError::ExtractionError { .. } => {
                Self::bad_request(
                    "EXTRACTION_ERROR",
                    message,
                    "The source document could not be read",
                )
            }
            EngineError::ReportError { .. } => {
                Self::internal("REPORT_ERROR", "Report output failed", message)
            }
            EngineError::CalculationError { .. } => {
                Self::internal("CALCULATION_ERROR", "Calculation failed", message)
            }
        }
    }
}

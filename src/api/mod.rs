//! HTTP API module for the contribution engine.
//!
//! This module provides the REST endpoint that computes a contribution
//! ledger from period records.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::CalculationRequest;
pub use response::{ApiError, CalculationResponse};
pub use state::AppState;

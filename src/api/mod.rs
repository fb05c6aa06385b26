//! HTTP API for the payroll engine.
//!
//! This module provides the axum router, request/response types and shared
//! application state for the `/calculate` and `/calculate/batch` endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchCalculationRequest, CalculationRequest, SchemeParamsRequest};
pub use response::{ApiError, ApiErrorResponse, BatchResponse, SkippedRecordResponse};
pub use state::AppState;

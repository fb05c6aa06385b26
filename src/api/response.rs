//! Response types for the payroll engine API.
//!
//! This module defines the batch response shape and the error response
//! structures mapping engine errors to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{BatchOutcome, BatchTotals, SkippedRecord};
use crate::error::EngineError;
use crate::models::PayrollRecord;

/// One skipped record as reported to API clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRecordResponse {
    /// The index of the record in the input list.
    pub index: usize,
    /// The declared salary of the skipped record.
    pub salary: Decimal,
    /// Why the record was skipped.
    pub reason: String,
}

impl From<SkippedRecord> for SkippedRecordResponse {
    fn from(skipped: SkippedRecord) -> Self {
        Self {
            index: skipped.index,
            salary: skipped.salary,
            reason: skipped.reason,
        }
    }
}

/// Response body for `POST /calculate/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Successfully computed records, in input order.
    pub records: Vec<PayrollRecord>,
    /// Records that were skipped, with reasons.
    pub skipped: Vec<SkippedRecordResponse>,
    /// Aggregated totals when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<BatchTotals>,
}

impl From<BatchOutcome> for BatchResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            records: outcome.records,
            skipped: outcome.skipped.into_iter().map(Into::into).collect(),
            totals: outcome.totals,
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

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::InvalidRiskClass { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_RISK_CLASS", message),
            },
            EngineError::UnsupportedPeriod { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("UNSUPPORTED_PERIOD", message),
            },
            EngineError::UnsupportedYear { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("UNSUPPORTED_YEAR", message),
            },
            EngineError::InvalidSalary { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("INVALID_SALARY", message),
            },
            EngineError::SalaryBelowMinimum { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("SALARY_BELOW_MINIMUM", message),
            },
            EngineError::BatchShapeMismatch { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new("BATCH_SHAPE_MISMATCH", message),
            },
            EngineError::NoApplicableBracket { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CALCULATION_ERROR",
                    "Calculation failed",
                    message,
                ),
            },
            EngineError::TableParse { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let error = EngineError::InvalidRiskClass {
            value: "VIII".to_string(),
        };
        let response: ApiErrorResponse = error.into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_RISK_CLASS");

        let error = EngineError::UnsupportedPeriod { days: 14 };
        let response: ApiErrorResponse = error.into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "UNSUPPORTED_PERIOD");
    }

    #[test]
    fn test_defensive_errors_map_to_internal_error() {
        let error = EngineError::NoApplicableBracket {
            amount: Decimal::ZERO,
        };
        let response: ApiErrorResponse = error.into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

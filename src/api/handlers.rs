//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{BatchOptions, calculate_record, process_batch};

use super::request::{BatchCalculationRequest, CalculationRequest};
use super::response::{ApiError, ApiErrorResponse, BatchResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/calculate/batch", post(batch_handler))
        .with_state(state)
}

/// Handler for the POST /calculate endpoint.
///
/// Accepts one declared salary with its configuration and returns the
/// computed payroll record.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let input = match request.into_input() {
        Ok(input) => input,
        Err(error) => {
            warn!(correlation_id = %correlation_id, %error, "Invalid request");
            let api_error: ApiErrorResponse = error.into();
            return api_error.into_response();
        }
    };

    match calculate_record(&input, state.tables()) {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                declared_salary = %record.declared_salary,
                saving_amount = %record.saving_amount,
                "Calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(record),
            )
                .into_response()
        }
        Err(error) => {
            warn!(correlation_id = %correlation_id, %error, "Calculation failed");
            let api_error: ApiErrorResponse = error.into();
            api_error.into_response()
        }
    }
}

/// Handler for the POST /calculate/batch endpoint.
///
/// Accepts a salary list with shared configuration and returns the computed
/// records, any skipped records, and optional aggregated totals.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchCalculationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch calculation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let options = BatchOptions {
        strict: request.strict,
        enforce_minimum_wage: request.enforce_minimum_wage,
        include_totals: request.include_totals,
    };

    let input = match request.into_input() {
        Ok(input) => input,
        Err(error) => {
            warn!(correlation_id = %correlation_id, %error, "Invalid batch request");
            let api_error: ApiErrorResponse = error.into();
            return api_error.into_response();
        }
    };

    match process_batch(&input, options, state.tables()) {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                records = outcome.records.len(),
                skipped = outcome.skipped.len(),
                "Batch calculation completed"
            );
            let response: BatchResponse = outcome.into();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(response),
            )
                .into_response()
        }
        Err(error) => {
            warn!(correlation_id = %correlation_id, %error, "Batch calculation failed");
            let api_error: ApiErrorResponse = error.into();
            api_error.into_response()
        }
    }
}

/// Maps a JSON extraction rejection to an error response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> axum::response::Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaxTables;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn router() -> Router {
        create_router(AppState::new(TaxTables::embedded().unwrap()))
    }

    async fn post(router: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_calculate_returns_record() {
        let body = serde_json::json!({"declared_salary": "5710.64"});
        let (status, json) = post(router(), "/calculate", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["declared_salary"].as_str().unwrap(), "5710.64");
        assert_eq!(json["suggested_total_social_cost"].as_str().unwrap(), "1740");
    }

    #[tokio::test]
    async fn test_invalid_risk_class_returns_bad_request() {
        let body = serde_json::json!({"declared_salary": "5710.64", "risk_class": "IX"});
        let (status, json) = post(router(), "/calculate", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"].as_str().unwrap(), "INVALID_RISK_CLASS");
    }

    #[tokio::test]
    async fn test_missing_salary_returns_validation_error() {
        let body = serde_json::json!({"pay_period_days": 15});
        let (status, json) = post(router(), "/calculate", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"].as_str().unwrap(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_batch_returns_records_and_totals() {
        let body = serde_json::json!({"salaries": ["10000", "15000", "20000"]});
        let (status, json) = post(router(), "/calculate/batch", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["records"].as_array().unwrap().len(), 3);
        assert_eq!(
            json["totals"]["total_salary"].as_str().unwrap(),
            "45000"
        );
    }
}

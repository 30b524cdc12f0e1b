use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::info;

use super::audit::EvaluationAuditSink;
use super::clock::Clock;
use super::domain::ApplicantSubmission;
use super::evaluation::EvaluationOutcome;
use super::intake::{FieldViolation, IntakeError};
use super::service::{ApplicationServiceError, CreditEvaluationService};

/// Router builder exposing the credit evaluation endpoints.
pub fn credit_router<A, C>(service: Arc<CreditEvaluationService<A, C>>) -> Router
where
    A: EvaluationAuditSink + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/v1/credit/evaluations",
            post(evaluate_handler::<A, C>),
        )
        .route("/api/v1/credit/criteria", get(criteria_handler::<A, C>))
        .with_state(service)
}

pub(crate) async fn evaluate_handler<A, C>(
    State(service): State<Arc<CreditEvaluationService<A, C>>>,
    payload: Result<Json<ApplicantSubmission>, JsonRejection>,
) -> Response
where
    A: EvaluationAuditSink + 'static,
    C: Clock + 'static,
{
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            let details = json!([{ "field": "body", "message": rejection.body_text() }]);
            return validation_failure(details);
        }
    };

    let violations = service.bounds_violations(&submission);
    if !violations.is_empty() {
        return validation_failure(violation_details(&violations));
    }

    match service.evaluate(submission) {
        Ok(EvaluationOutcome::Completed(result)) => {
            info!(
                decision = result.evaluation.decision.label(),
                score = result.evaluation.score,
                "credit evaluation completed"
            );
            let payload = json!({ "success": true, "data": result });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Ok(rejection @ EvaluationOutcome::AgeOutOfRange { .. }) => {
            let payload = json!({ "success": false, "error": rejection.summary() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(ApplicationServiceError::Intake(IntakeError::MissingField(field))) => {
            let details = json!([{ "field": field, "message": "is required" }]);
            validation_failure(details)
        }
    }
}

pub(crate) async fn criteria_handler<A, C>(
    State(service): State<Arc<CreditEvaluationService<A, C>>>,
) -> Response
where
    A: EvaluationAuditSink + 'static,
    C: Clock + 'static,
{
    (StatusCode::OK, Json(service.criteria())).into_response()
}

fn violation_details(violations: &[FieldViolation]) -> serde_json::Value {
    serde_json::to_value(violations).unwrap_or_else(|_| json!([]))
}

fn validation_failure(details: serde_json::Value) -> Response {
    let payload = json!({
        "success": false,
        "error": "validation failed",
        "details": details,
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use blackbox_core::{DomainError, RecordId};
use blackbox_infra::RepositoryError;
use blackbox_pipeline::Granularity;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    match err {
        RepositoryError::NotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "record not found")
        }
        RepositoryError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        RepositoryError::Storage { .. } => {
            tracing::error!(error = %err, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "storage failure",
            )
        }
    }
}

pub fn parse_record_id(id: &str, what: &'static str) -> Result<RecordId, axum::response::Response> {
    id.parse().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("invalid {what} id"),
        )
    })
}

pub fn parse_granularity(s: &str) -> Result<Granularity, axum::response::Response> {
    match s.to_lowercase().as_str() {
        "day" | "daily" => Ok(Granularity::Day),
        "week" | "weekly" => Ok(Granularity::Week),
        "month" | "monthly" => Ok(Granularity::Month),
        _ => Err(json_error(
            StatusCode::BAD_REQUEST,
            "invalid_granularity",
            "granularity must be one of: day, week, month",
        )),
    }
}

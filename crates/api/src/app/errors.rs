use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use kindaebay_accounts::{LoginError, RegisterError, SessionError};
use kindaebay_core::{DomainError, FieldErrors};

use crate::app::services::PublishError;

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

/// Malformed, mistyped or wrongly typed request body. Keeps axum's status.
pub fn json_rejection_to_response(err: JsonRejection) -> axum::response::Response {
    json_error(
        err.status(),
        "invalid_request",
        format!("Invalid JSON payload: {}", err.body_text()),
    )
}

/// A blocking task panicked or was cancelled.
pub fn blocking_task_failed(err: tokio::task::JoinError) -> axum::response::Response {
    tracing::error!(error = %err, "blocking task failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "request could not be completed")
}

/// 400 carrying every field-level rejection.
pub fn validation_error(errors: &FieldErrors) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "validation_error",
            "message": "submitted form is invalid",
            "errors": errors,
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
    }
}

pub fn register_error_to_response(err: RegisterError) -> axum::response::Response {
    match err {
        RegisterError::Invalid(errors) => validation_error(&errors),
        RegisterError::Domain(e) => domain_error_to_response(e),
    }
}

pub fn login_error_to_response(err: LoginError) -> axum::response::Response {
    match err {
        LoginError::Invalid(errors) => validation_error(&errors),
        LoginError::InvalidCredentials => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "Invalid username or password.",
        ),
    }
}

pub fn session_error_to_response(err: SessionError) -> axum::response::Response {
    match err {
        SessionError::Encode(msg) => {
            tracing::error!(error = %msg, "session signing failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "could not start session")
        }
        SessionError::ExpiryOutOfRange => {
            tracing::error!("session ttl overflows the clock");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "could not start session")
        }
        other => json_error(StatusCode::UNAUTHORIZED, "unauthorized", other.to_string()),
    }
}

pub fn publish_error_to_response(err: PublishError) -> axum::response::Response {
    match err {
        PublishError::Invalid(errors) => validation_error(&errors),
        PublishError::Domain(e) => domain_error_to_response(e),
    }
}

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use kindaebay_accounts::{LoginForm, RegistrationForm};

use crate::app::dto::{AccountDto, LoginQuery, SessionDto};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

const DEFAULT_REDIRECT: &str = "/home";

/// Register and sign in.
pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<RegistrationForm>, JsonRejection>,
) -> axum::response::Response {
    let Json(form) = match payload {
        Ok(p) => p,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let now = Utc::now();

    // Hashing is CPU-bound; keep it off the async workers.
    let registered = tokio::task::spawn_blocking({
        let services = services.clone();
        move || services.accounts.register(&form, now)
    })
    .await;
    let account = match registered {
        Ok(Ok(a)) => a,
        Ok(Err(e)) => return errors::register_error_to_response(e),
        Err(e) => return errors::blocking_task_failed(e),
    };

    let (token, claims) = match services.sessions.issue(&account, now) {
        Ok(t) => t,
        Err(e) => return errors::session_error_to_response(e),
    };

    (
        StatusCode::CREATED,
        Json(SessionDto {
            message: "Registration successful.".to_string(),
            token,
            expires_at: claims.exp,
            account: Some(AccountDto::from(&account)),
            redirect: None,
        }),
    )
        .into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<LoginQuery>,
    payload: Result<Json<LoginForm>, JsonRejection>,
) -> axum::response::Response {
    let Json(form) = match payload {
        Ok(p) => p,
        Err(e) => return errors::json_rejection_to_response(e),
    };

    let authenticated = tokio::task::spawn_blocking({
        let services = services.clone();
        move || services.accounts.authenticate(&form)
    })
    .await;
    let account = match authenticated {
        Ok(Ok(a)) => a,
        Ok(Err(e)) => return errors::login_error_to_response(e),
        Err(e) => return errors::blocking_task_failed(e),
    };

    let (token, claims) = match services.sessions.issue(&account, Utc::now()) {
        Ok(t) => t,
        Err(e) => return errors::session_error_to_response(e),
    };

    tracing::info!(account_id = %account.id_typed(), username = %account.username(), "logged in");

    let redirect = query
        .next
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REDIRECT.to_string());

    (
        StatusCode::OK,
        Json(SessionDto {
            message: format!("You are now logged in as {}.", account.username()),
            token,
            expires_at: claims.exp,
            account: None,
            redirect: Some(redirect),
        }),
    )
        .into_response()
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    services.sessions.revoke(session.claims(), Utc::now());
    tracing::info!(account_id = %session.account_id(), "logged out");
    Json(serde_json::json!({ "message": "You have successfully logged out." })).into_response()
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// Require a valid, unrevoked session belonging to an active account.
pub async fn auth_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "authentication required");
    };

    let claims = match services.sessions.validate(token, Utc::now()) {
        Ok(c) => c,
        Err(e) => return errors::session_error_to_response(e),
    };

    if services.session_account(&claims.sub).is_none() {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "account is not active");
    }

    req.extensions_mut().insert(SessionContext::new(claims));
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

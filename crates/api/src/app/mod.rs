//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: validators, stores and sessions shared by handlers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::{AppConfig, ConfigError};
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Result<Router, ConfigError> {
    let services = Arc::new(services::AppServices::from_config(config)?);

    // Protected routes: require a live session.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        services.clone(),
        middleware::auth_middleware,
    ));

    Ok(routes::public_router()
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services))))
}

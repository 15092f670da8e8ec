use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use kindaebay_core::ProductId;
use kindaebay_products::{CatalogQuery, ListingForm};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    payload: Result<Json<ListingForm>, JsonRejection>,
) -> axum::response::Response {
    let Json(form) = match payload {
        Ok(p) => p,
        Err(e) => return errors::json_rejection_to_response(e),
    };
    let Some(account) = services.session_account(&session.account_id()) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "account is not active");
    };

    match services.publish_listing(&form, &account, Utc::now()) {
        Ok(product) => (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::publish_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };
    match services.product_get(&product_id) {
        Some(p) => (StatusCode::OK, Json(dto::product_to_json(&p))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
    }
}

/// Catalogue, newest first, optionally filtered by `q` and `category`.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<CatalogQuery>,
) -> axum::response::Response {
    let items = services
        .products_search(&query)
        .iter()
        .map(dto::product_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

use std::sync::Arc;

use axum::{extract::Extension, Json};

use crate::app::dto::UserSummaryDto;
use crate::app::services::AppServices;
use crate::context::SessionContext;

/// Every other registered account, as `[{username, pk}]`.
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Json<Vec<UserSummaryDto>> {
    let users = services
        .accounts
        .others(&session.account_id())
        .iter()
        .map(UserSummaryDto::from)
        .collect();
    Json(users)
}

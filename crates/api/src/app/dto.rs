use serde::{Deserialize, Serialize};

use kindaebay_accounts::Account;
use kindaebay_products::Product;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    /// Where the client should go after signing in.
    pub next: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct AccountDto {
    pub pk: String,
    pub username: String,
    pub email: String,
    pub date_joined: String,
}

impl From<&Account> for AccountDto {
    fn from(a: &Account) -> Self {
        Self {
            pk: a.id_typed().to_string(),
            username: a.username().to_string(),
            email: a.email().to_string(),
            date_joined: a.date_joined().to_rfc3339(),
        }
    }
}

/// Entry of the peer list (no email exposure).
#[derive(Debug, Serialize)]
pub struct UserSummaryDto {
    pub username: String,
    pub pk: String,
}

impl From<&Account> for UserSummaryDto {
    fn from(a: &Account) -> Self {
        Self {
            username: a.username().to_string(),
            pk: a.id_typed().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub message: String,
    pub token: String,
    pub expires_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id_typed().to_string(),
        "title": p.title(),
        "description": p.description(),
        "price": p.price().to_string(),
        "summary": p.summary(),
        "category": p.category(),
        "label": p.label(),
        "image": p.image(),
        "publisher": p.publisher().username,
        "published_at": p.published_at().to_rfc3339(),
    })
}

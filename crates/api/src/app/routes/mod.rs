use axum::{
    routing::{get, post},
    Router,
};

pub mod accounts;
pub mod products;
pub mod system;
pub mod users;

/// Endpoints open to anonymous visitors.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/signup", post(accounts::signup))
        .route("/login", post(accounts::login))
        .route("/", get(products::list_products))
        .route("/home", get(products::list_products))
        .route("/products", get(products::list_products))
        .route("/product/:id", get(products::get_product))
}

/// Endpoints that require a session.
pub fn protected_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/logout", post(accounts::logout))
        .route("/create", post(products::create_product))
        .route("/products", post(products::create_product))
        .route("/users", get(users::list_users))
}

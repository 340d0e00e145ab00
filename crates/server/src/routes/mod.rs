//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Auth
//! GET  /register               - Registration page
//! POST /register               - Registration action
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /logout                 - Logout action (requires auth)
//!
//! # Products (all require auth)
//! GET  /                       - Product listing
//! GET  /products               - Product listing (alias)
//! GET  /products/create        - Create form
//! POST /products/create        - Create action
//! GET  /products/edit/{id}     - Edit form
//! POST /products/edit/{id}     - Edit action
//! POST /products/delete/{id}   - Delete action
//! ```

pub mod auth;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/create", get(products::create_page).post(products::create))
        .route(
            "/edit/{id}",
            get(products::edit_page).post(products::edit),
        )
        .route("/delete/{id}", post(products::delete))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product listing doubles as the home page
        .route("/", get(products::index))
        .nest("/products", product_routes())
        .merge(auth_routes())
}

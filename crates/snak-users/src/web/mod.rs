pub mod auth;
pub mod middleware;
pub mod users;

use crate::state::AppState;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Public endpoints
        .route("/register", post(auth::register))
        .route("/token", post(auth::token))
        // Account CRUD (store-backed)
        .route("/users", get(users::list_users))
        .route("/users/me", get(auth::me))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Cache-accelerated reads
        .route("/userscache", get(users::list_users_cached))
        .route("/userscache/{id}", get(users::get_user_cached))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub mod chats;
pub mod middleware;

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
        .route("/chats", post(chats::create_chat))
        .route("/chats/{id}", get(chats::get_chat))
        .route("/chats/{id}/participants", post(chats::add_participants))
        .route(
            "/chats/{id}/messages",
            post(chats::send_message).get(chats::list_messages),
        )
        .route("/users/me/chats", get(chats::my_chats))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

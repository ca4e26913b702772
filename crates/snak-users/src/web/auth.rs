use crate::auth::{create_access_token, hash_password, verify_password};
use crate::state::AppState;
use crate::web::middleware::AuthUser;
use crate::web::users::account_json;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Form, Json};
use serde::Deserialize;
use serde_json::json;
use snak_common::models::account::RegisterRequest;
use snak_common::models::auth::TokenResponse;
use snak_db::UserRepo;
use std::sync::Arc;

/// Form body of POST /token (OAuth2 password-grant field names)
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// POST /register - Create a new account
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    match UserRepo::get_by_login(&state.pool, &req.login).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": "Username already registered"})),
            )
                .into_response()
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("DB error during registration: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    }

    let password_hash = match hash_password(&req.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Failed to hash password: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    };

    match UserRepo::create(
        &state.pool,
        &req.login,
        &password_hash,
        &req.full_name,
        &req.email,
    )
    .await
    {
        Ok(user) => {
            state.cache.invalidate_all().await;
            (StatusCode::CREATED, Json(account_json(&user))).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create user: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// POST /token - Issue a bearer token
#[tracing::instrument(skip(state, form))]
pub async fn token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TokenRequest>,
) -> impl IntoResponse {
    let user = match UserRepo::get_by_login(&state.pool, &form.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Incorrect username or password"})),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("DB error during login: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    };

    match verify_password(&form.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Incorrect username or password"})),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Password verification error: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    }

    let access_token = match create_access_token(
        user.id,
        &user.login,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_minutes,
    ) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to create access token: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response();
        }
    };

    Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
    .into_response()
}

/// GET /users/me - Resolve the caller's own account
#[tracing::instrument(skip(state))]
pub async fn me(State(state): State<Arc<AppState>>, auth: AuthUser) -> impl IntoResponse {
    match UserRepo::get(&state.pool, auth.id).await {
        Ok(Some(user)) => Json(account_json(&user)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "User not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get user: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

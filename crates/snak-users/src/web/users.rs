use crate::state::AppState;
use crate::web::middleware::AuthUser;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use snak_common::models::account::{AccountSnapshot, UpdateAccountRequest};
use snak_db::{UserRepo, UserRow};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Full account JSON (password hash never included)
pub fn account_json(user: &UserRow) -> serde_json::Value {
    json!({
        "id": user.id,
        "login": user.login,
        "full_name": user.full_name,
        "email": user.email,
        "created_at": user.created_at,
    })
}

fn snapshot(user: &UserRow) -> AccountSnapshot {
    AccountSnapshot {
        id: user.id,
        login: user.login.clone(),
        full_name: user.full_name.clone(),
        email: user.email.clone(),
    }
}

/// GET /users - Paginated listing, straight from the store. Paginated
/// reads bypass the cache: only the unparameterized listing has a cache
/// key, and serving page slices out of a possibly-stale full list would
/// paginate incorrectly.
#[tracing::instrument(skip(state, _auth))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> impl IntoResponse {
    match UserRepo::list(&state.pool, query.limit, query.offset).await {
        Ok(users) => {
            let body: Vec<serde_json::Value> = users.iter().map(account_json).collect();
            Json(body).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list users: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to list users"})),
            )
                .into_response()
        }
    }
}

/// GET /users/{id} - Single account, straight from the store
#[tracing::instrument(skip(state, _auth))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match UserRepo::get(&state.pool, id).await {
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
                Json(json!({"error": "Failed to get user"})),
            )
                .into_response()
        }
    }
}

/// PUT /users/{id} - Update an account and invalidate its cache entries
#[tracing::instrument(skip(state, _auth, req))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    match UserRepo::update(&state.pool, id, &req.login, &req.full_name, &req.email).await {
        Ok(Some(user)) => {
            state.cache.invalidate_user(id).await;
            Json(account_json(&user)).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "User not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update user: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to update user"})),
            )
                .into_response()
        }
    }
}

/// DELETE /users/{id} - Delete an account, returning it, and invalidate
/// its cache entries. Chats referencing the account keep their dangling
/// ids; chat reads tolerate that.
#[tracing::instrument(skip(state, _auth))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match UserRepo::delete(&state.pool, id).await {
        Ok(Some(user)) => {
            state.cache.invalidate_user(id).await;
            Json(account_json(&user)).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "User not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete user: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to delete user"})),
            )
                .into_response()
        }
    }
}

/// GET /userscache/{id} - Single account through the cache. On a miss the
/// store is consulted and the snapshot written back with the configured
/// TTL before answering.
#[tracing::instrument(skip(state, _auth))]
pub async fn get_user_cached(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    if let Some(cached) = state.cache.get_user(id).await {
        return Json(cached).into_response();
    }

    match UserRepo::get(&state.pool, id).await {
        Ok(Some(user)) => {
            let snap = snapshot(&user);
            state.cache.put_user(&snap).await;
            Json(snap).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "User not found"})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get user: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to get user"})),
            )
                .into_response()
        }
    }
}

/// GET /userscache - Unpaginated listing through the aggregate cache entry
#[tracing::instrument(skip(state, _auth))]
pub async fn list_users_cached(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> impl IntoResponse {
    if let Some(cached) = state.cache.get_all().await {
        return Json(cached).into_response();
    }

    match UserRepo::list_all(&state.pool).await {
        Ok(users) => {
            let snaps: Vec<AccountSnapshot> = users.iter().map(snapshot).collect();
            state.cache.put_all(&snaps).await;
            Json(snaps).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list users: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to list users"})),
            )
                .into_response()
        }
    }
}

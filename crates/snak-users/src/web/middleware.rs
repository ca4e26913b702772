use crate::auth::validate_access_token;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use snak_common::models::auth::Claims;
use std::sync::Arc;

/// Extractor that validates a Bearer token and provides the caller's
/// account id and claims. Rejection is always 401.
#[derive(Debug)]
pub struct AuthUser {
    pub id: i64,
    pub claims: Claims,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match auth_header {
            Some(val) => match val.strip_prefix("Bearer ") {
                Some(t) => t,
                None => {
                    return Err((
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"error": "Invalid authorization header format"})),
                    )
                        .into_response())
                }
            },
            None => {
                return Err((
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Missing authorization header"})),
                )
                    .into_response())
            }
        };

        let claims = match validate_access_token(token, &state.config.auth.jwt_secret) {
            Ok(claims) => claims,
            Err(_) => {
                return Err((
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Invalid or expired token"})),
                )
                    .into_response())
            }
        };

        let id = match claims.sub.parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                return Err((
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Invalid subject in token"})),
                )
                    .into_response())
            }
        };

        Ok(AuthUser { id, claims })
    }
}

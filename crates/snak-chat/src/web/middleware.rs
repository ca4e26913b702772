use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Extractor for the raw bearer token. The chat service never validates
/// tokens itself; it forwards them to the account service, which owns
/// credential verification.
#[derive(Debug)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        match auth_header {
            Some(val) => match val.strip_prefix("Bearer ") {
                Some(t) => Ok(BearerToken(t.to_string())),
                None => Err((
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Invalid authorization header format"})),
                )
                    .into_response()),
            },
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Missing authorization header"})),
            )
                .into_response()),
        }
    }
}

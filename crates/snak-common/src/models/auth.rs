use serde::{Deserialize, Serialize};

/// JWT claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id as a decimal string
    pub sub: String,
    pub login: String,
    pub exp: i64,
    pub iat: i64,
}

/// Response body of POST /token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use snak_common::models::auth::Claims;

/// Hash a password using argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Create an access token (JWT) for an account
pub fn create_access_token(
    account_id: i64,
    login: &str,
    jwt_secret: &str,
    ttl_minutes: i64,
) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: account_id.to_string(),
        login: login.to_string(),
        iat: now,
        exp: now + ttl_minutes * 60,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .context("Failed to create access token")
}

/// Validate an access token and return claims
pub fn validate_access_token(token: &str, jwt_secret: &str) -> Result<Claims> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .context("Invalid access token")?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify_correct() {
        let password = "my-secure-password";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_password_verify_wrong() {
        let hash = hash_password("correct-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_password_different_salts() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();
        assert_ne!(hash1, hash2);
        // Both still verify
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_jwt_create_and_validate() {
        let secret = "test-jwt-secret";
        let token = create_access_token(42, "alice", secret, 30).unwrap();
        let claims = validate_access_token(&token, secret).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.login, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_jwt_wrong_secret_fails() {
        let token = create_access_token(42, "alice", "secret-1", 30).unwrap();
        let result = validate_access_token(&token, "secret-2");
        assert!(result.is_err());
    }

    #[test]
    fn test_jwt_expired_fails() {
        let token = create_access_token(42, "alice", "secret", -10).unwrap();
        let result = validate_access_token(&token, "secret");
        assert!(result.is_err());
    }
}

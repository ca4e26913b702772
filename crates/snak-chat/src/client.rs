use anyhow::{Context, Result};
use snak_common::models::account::AccountSnapshot;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failure modes of an account lookup, kept apart so callers can tell a
/// definitive rejection (NotFound, Unauthorized) from a transient one
/// (Unavailable) and react differently.
#[derive(Debug, Error)]
pub enum AccountLookupError {
    #[error("token rejected by the account service")]
    Unauthorized,
    #[error("user {0} not found")]
    NotFound(i64),
    #[error("account service unavailable: {0}")]
    Unavailable(String),
}

/// HTTP client for the account service. The caller's bearer token is
/// passed through on every request; every request carries a bounded
/// timeout so a hung account service cannot hang chat operations.
#[derive(Clone)]
pub struct AccountClient {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl AccountClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build account service client")?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url),
        })
    }

    /// Resolve the calling account from its bearer token
    #[tracing::instrument(skip(self, token))]
    pub async fn resolve_caller(&self, token: &str) -> Result<AccountSnapshot, AccountLookupError> {
        let url = format!("{}/users/me", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| AccountLookupError::Unavailable(e.to_string()))?;

        match response.status() {
            s if s.is_success() => response
                .json()
                .await
                .map_err(|e| AccountLookupError::Unavailable(e.to_string())),
            // A valid token whose account has since vanished is as good as
            // no token at all
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::NOT_FOUND => {
                Err(AccountLookupError::Unauthorized)
            }
            s => Err(AccountLookupError::Unavailable(format!(
                "unexpected status {}",
                s
            ))),
        }
    }

    /// Look up a single account by id, through the account service's
    /// cache-accelerated read path.
    #[tracing::instrument(skip(self, token))]
    pub async fn get_account(
        &self,
        token: &str,
        id: i64,
    ) -> Result<AccountSnapshot, AccountLookupError> {
        let url = format!("{}/userscache/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| AccountLookupError::Unavailable(e.to_string()))?;

        match response.status() {
            s if s.is_success() => response
                .json()
                .await
                .map_err(|e| AccountLookupError::Unavailable(e.to_string())),
            reqwest::StatusCode::NOT_FOUND => Err(AccountLookupError::NotFound(id)),
            reqwest::StatusCode::UNAUTHORIZED => Err(AccountLookupError::Unauthorized),
            s => Err(AccountLookupError::Unavailable(format!(
                "unexpected status {}",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn snapshot_body(id: i64, login: &str) -> serde_json::Value {
        json!({
            "id": id,
            "login": login,
            "full_name": "Test User",
            "email": "test@example.com",
        })
    }

    #[tokio::test]
    async fn test_resolve_caller_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .and(header("Authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body(1, "alice")))
            .mount(&server)
            .await;

        let client = AccountClient::new(&server.uri(), Duration::from_secs(2)).unwrap();
        let caller = client.resolve_caller("tok-1").await.unwrap();
        assert_eq!(caller.id, 1);
        assert_eq!(caller.login, "alice");
    }

    #[tokio::test]
    async fn test_resolve_caller_bad_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid token"})),
            )
            .mount(&server)
            .await;

        let client = AccountClient::new(&server.uri(), Duration::from_secs(2)).unwrap();
        let err = client.resolve_caller("bad").await.unwrap_err();
        assert!(matches!(err, AccountLookupError::Unauthorized));
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userscache/9999"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "User not found"})),
            )
            .mount(&server)
            .await;

        let client = AccountClient::new(&server.uri(), Duration::from_secs(2)).unwrap();
        let err = client.get_account("tok-1", 9999).await.unwrap_err();
        assert!(matches!(err, AccountLookupError::NotFound(9999)));
    }

    #[tokio::test]
    async fn test_get_account_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userscache/2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AccountClient::new(&server.uri(), Duration::from_secs(2)).unwrap();
        let err = client.get_account("tok-1", 2).await.unwrap_err();
        assert!(matches!(err, AccountLookupError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_get_account_timeout_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userscache/2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(snapshot_body(2, "bob"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = AccountClient::new(&server.uri(), Duration::from_millis(50)).unwrap();
        let err = client.get_account("tok-1", 2).await.unwrap_err();
        assert!(matches!(err, AccountLookupError::Unavailable(_)));
    }
}

use crate::client::{AccountClient, AccountLookupError};

/// Outcome of the all-or-nothing participant gate
#[derive(Debug, PartialEq)]
pub enum Validation {
    /// Every id resolved; duplicates collapsed, original order kept
    AllValid(Vec<i64>),
    /// The first id that failed to resolve; nothing may be persisted
    Invalid(i64),
}

/// Validate a batch of participant ids against the account service, one
/// lookup per id, short-circuiting on the first id that does not resolve.
/// A transient account-service failure is not a verdict on any id and
/// propagates as an error instead.
pub async fn validate_participants(
    client: &AccountClient,
    token: &str,
    ids: &[i64],
) -> Result<Validation, AccountLookupError> {
    let mut valid: Vec<i64> = Vec::with_capacity(ids.len());
    for &id in ids {
        if valid.contains(&id) {
            continue;
        }
        match client.get_account(token, id).await {
            Ok(_) => valid.push(id),
            Err(AccountLookupError::NotFound(_)) => return Ok(Validation::Invalid(id)),
            Err(e) => return Err(e),
        }
    }
    Ok(Validation::AllValid(valid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_account(server: &MockServer, id: i64) {
        Mock::given(method("GET"))
            .and(path(format!("/userscache/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "login": format!("user{}", id),
                "full_name": "Test User",
                "email": "test@example.com",
            })))
            .mount(server)
            .await;
    }

    async fn mock_missing(server: &MockServer, id: i64) {
        Mock::given(method("GET"))
            .and(path(format!("/userscache/{}", id)))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "User not found"})),
            )
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> AccountClient {
        AccountClient::new(&server.uri(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_all_valid() {
        let server = MockServer::start().await;
        mock_account(&server, 1).await;
        mock_account(&server, 2).await;

        let result = validate_participants(&client(&server), "tok", &[1, 2])
            .await
            .unwrap();
        assert_eq!(result, Validation::AllValid(vec![1, 2]));
    }

    #[tokio::test]
    async fn test_empty_batch_is_valid() {
        let server = MockServer::start().await;
        let result = validate_participants(&client(&server), "tok", &[])
            .await
            .unwrap();
        assert_eq!(result, Validation::AllValid(vec![]));
    }

    #[tokio::test]
    async fn test_duplicates_collapsed_and_looked_up_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userscache/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "login": "user1",
                "full_name": "Test User",
                "email": "test@example.com",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = validate_participants(&client(&server), "tok", &[1, 1, 1])
            .await
            .unwrap();
        assert_eq!(result, Validation::AllValid(vec![1]));
    }

    #[tokio::test]
    async fn test_one_missing_aborts_whole_batch() {
        let server = MockServer::start().await;
        mock_account(&server, 1).await;
        mock_missing(&server, 9999).await;
        mock_account(&server, 3).await;

        let result = validate_participants(&client(&server), "tok", &[1, 9999, 3])
            .await
            .unwrap();
        assert_eq!(result, Validation::Invalid(9999));
    }

    #[tokio::test]
    async fn test_unavailable_propagates_as_error() {
        let server = MockServer::start().await;
        mock_account(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/userscache/2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = validate_participants(&client(&server), "tok", &[1, 2])
            .await
            .unwrap_err();
        assert!(matches!(err, AccountLookupError::Unavailable(_)));
    }
}

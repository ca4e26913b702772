use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account model (safe for client responses -- no password_hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub login: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Denormalized account projection stored in the cache and embedded in
/// chat participant listings. Never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: i64,
    pub login: String,
    pub full_name: String,
    pub email: String,
}

impl From<&Account> for AccountSnapshot {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            login: account.login.clone(),
            full_name: account.full_name.clone(),
            email: account.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub login: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Update payload for PUT /users/{id}. Passwords are not updated through
/// this path.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAccountRequest {
    pub login: String,
    pub full_name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_account() {
        let account = Account {
            id: 7,
            login: "alice".to_string(),
            full_name: "Alice Larsen".to_string(),
            email: "alice@example.com".to_string(),
            created_at: Utc::now(),
        };
        let snapshot = AccountSnapshot::from(&account);
        assert_eq!(snapshot.id, 7);
        assert_eq!(snapshot.login, "alice");
        assert_eq!(snapshot.full_name, "Alice Larsen");
        assert_eq!(snapshot.email, "alice@example.com");
    }

    #[test]
    fn test_snapshot_json_has_no_created_at() {
        let snapshot = AccountSnapshot {
            id: 1,
            login: "bob".to_string(),
            full_name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value.get("created_at").is_none());
        assert_eq!(value["login"], "bob");
    }
}

use serde::{Deserialize, Serialize};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
}

/// Redis cache configuration. TTLs are per key class: the single-account
/// entries and the aggregate list expire independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_user_ttl")]
    pub user_ttl_secs: u64,
    #[serde(default = "default_users_all_ttl")]
    pub users_all_ttl_secs: u64,
}

fn default_user_ttl() -> u64 {
    180
}
fn default_users_all_ttl() -> u64 {
    60
}

/// Initial account to seed on startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialAccountConfig {
    pub login: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
    pub initial_account: Option<InitialAccountConfig>,
}

fn default_token_ttl() -> i64 {
    30
}

/// Account service configuration - loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: String, // "0.0.0.0:8000"
    pub db: DbConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
}

/// Load config from a YAML file with SNAK__ env var overrides.
pub fn load_config(path: &str) -> anyhow::Result<ServerConfig> {
    use anyhow::Context;
    let config: ServerConfig = config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("SNAK")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build config from: {}", path))?
        .try_deserialize()
        .with_context(|| format!("Failed to deserialize config from: {}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
listen: "0.0.0.0:8000"
db:
  url: "postgres://postgres:postgres@db:5432/userdb"
redis:
  url: "redis://redis:6379/0"
  user_ttl_secs: 300
  users_all_ttl_secs: 30
auth:
  jwt_secret: "your-secret-key"
  token_ttl_minutes: 15
  initial_account:
    login: "admin"
    full_name: "Administrator"
    email: "admin@example.com"
    password: "changeme"
"#;
        let file = write_config(yaml);
        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.listen, "0.0.0.0:8000");
        assert_eq!(config.db.url, "postgres://postgres:postgres@db:5432/userdb");
        assert_eq!(config.redis.url, "redis://redis:6379/0");
        assert_eq!(config.redis.user_ttl_secs, 300);
        assert_eq!(config.redis.users_all_ttl_secs, 30);
        assert_eq!(config.auth.jwt_secret, "your-secret-key");
        assert_eq!(config.auth.token_ttl_minutes, 15);
        let initial = config.auth.initial_account.unwrap();
        assert_eq!(initial.login, "admin");
        assert_eq!(initial.password, "changeme");
    }

    #[test]
    fn test_parse_ttl_defaults() {
        let yaml = r#"
listen: "0.0.0.0:8000"
db:
  url: "postgres://localhost/userdb"
redis:
  url: "redis://localhost:6379/0"
auth:
  jwt_secret: "secret"
"#;
        let file = write_config(yaml);
        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.redis.user_ttl_secs, 180);
        assert_eq!(config.redis.users_all_ttl_secs, 60);
        assert_eq!(config.auth.token_ttl_minutes, 30);
        assert!(config.auth.initial_account.is_none());
    }

    #[test]
    fn test_parse_missing_db_url_fails() {
        let yaml = r#"
listen: "0.0.0.0:8000"
redis:
  url: "redis://localhost:6379/0"
auth:
  jwt_secret: "secret"
"#;
        let file = write_config(yaml);
        assert!(load_config(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_parse_missing_jwt_secret_fails() {
        let yaml = r#"
listen: "0.0.0.0:8000"
db:
  url: "postgres://localhost/userdb"
redis:
  url: "redis://localhost:6379/0"
auth: {}
"#;
        let file = write_config(yaml);
        assert!(load_config(file.path().to_str().unwrap()).is_err());
    }

    /// Serialize access to env vars in tests to avoid races between parallel tests
    static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_env_override_db_url() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let yaml = r#"
listen: "0.0.0.0:8000"
db:
  url: "postgres://placeholder:5432/userdb"
redis:
  url: "redis://localhost:6379/0"
auth:
  jwt_secret: "yaml-secret"
"#;
        let file = write_config(yaml);

        // SAFETY: test-only, serialized by ENV_MUTEX
        unsafe {
            std::env::set_var("SNAK__DB__URL", "postgres://overridden:5432/userdb");
            std::env::set_var("SNAK__AUTH__JWT_SECRET", "env-secret");
        }

        let config = load_config(file.path().to_str().unwrap()).unwrap();

        unsafe {
            std::env::remove_var("SNAK__DB__URL");
            std::env::remove_var("SNAK__AUTH__JWT_SECRET");
        }

        assert_eq!(config.db.url, "postgres://overridden:5432/userdb");
        assert_eq!(config.auth.jwt_secret, "env-secret");
        // Non-overridden values preserved from YAML
        assert_eq!(config.listen, "0.0.0.0:8000");
    }
}

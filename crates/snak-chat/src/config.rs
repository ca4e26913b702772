use serde::{Deserialize, Serialize};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
}

/// Chat service configuration - loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub listen: String, // "0.0.0.0:8001"
    pub db: DbConfig,
    /// Base URL of the account service, e.g. "http://user_service:8000"
    pub users_service_url: String,
    /// Timeout for each outbound account lookup
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

fn default_lookup_timeout() -> u64 {
    5
}

/// Load config from a YAML file with SNAK__ env var overrides.
pub fn load_config(path: &str) -> anyhow::Result<ChatConfig> {
    use anyhow::Context;
    let config: ChatConfig = config::Config::builder()
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
listen: "0.0.0.0:8001"
db:
  url: "postgres://postgres:postgres@db:5432/chatdb"
users_service_url: "http://user_service:8000"
lookup_timeout_secs: 3
"#;
        let file = write_config(yaml);
        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.listen, "0.0.0.0:8001");
        assert_eq!(config.db.url, "postgres://postgres:postgres@db:5432/chatdb");
        assert_eq!(config.users_service_url, "http://user_service:8000");
        assert_eq!(config.lookup_timeout_secs, 3);
    }

    #[test]
    fn test_parse_timeout_default() {
        let yaml = r#"
listen: "0.0.0.0:8001"
db:
  url: "postgres://localhost/chatdb"
users_service_url: "http://localhost:8000"
"#;
        let file = write_config(yaml);
        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.lookup_timeout_secs, 5);
    }

    #[test]
    fn test_parse_missing_users_service_url_fails() {
        let yaml = r#"
listen: "0.0.0.0:8001"
db:
  url: "postgres://localhost/chatdb"
"#;
        let file = write_config(yaml);
        assert!(load_config(file.path().to_str().unwrap()).is_err());
    }
}

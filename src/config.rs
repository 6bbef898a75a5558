//! Application configuration loaded from the environment.

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::error::{Result, ServerError};
use crate::repository::RepositoryConfig;

/// Runtime settings for the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub repository: RepositoryConfig,
    pub admin_username: String,
    pub admin_password: String,
    /// Seed chefs and dishes when the store is empty
    pub seed: bool,
    pub session_ttl: Duration,
    /// Read-only accounts as `(username, password)`
    pub viewers: Vec<(String, String)>,
}

impl AppConfig {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary lookup, so tests don't touch the real environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = load(&lookup, "KITCHEN_BIND_ADDR", "127.0.0.1:8080")?;

        let repository = match lookup("KITCHEN_STORAGE")
            .unwrap_or_else(|| "sqlite".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => RepositoryConfig::memory(),
            "sqlite" => {
                let path = lookup("KITCHEN_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_db_path);
                RepositoryConfig::sqlite(path)
            }
            other => {
                return Err(ServerError::Config(format!(
                    "KITCHEN_STORAGE must be 'memory' or 'sqlite', got '{}'",
                    other
                )))
            }
        };

        let ttl_secs: u64 = load(&lookup, "KITCHEN_SESSION_TTL_SECS", "86400")?;

        Ok(Self {
            bind_addr,
            repository,
            admin_username: lookup("KITCHEN_ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            admin_password: lookup("KITCHEN_ADMIN_PASSWORD").unwrap_or_else(|| "admin".to_string()),
            seed: load(&lookup, "KITCHEN_SEED", "true")?,
            session_ttl: Duration::from_secs(ttl_secs),
            viewers: parse_viewers(lookup("KITCHEN_VIEWERS").as_deref())?,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            repository: RepositoryConfig::default(),
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
            seed: true,
            session_ttl: Duration::from_secs(24 * 60 * 60),
            viewers: Vec::new(),
        }
    }
}

fn default_db_path() -> PathBuf {
    env::temp_dir().join("kitchen-server").join("kitchen.db")
}

/// `name:password` pairs separated by commas
fn parse_viewers(raw: Option<&str>) -> Result<Vec<(String, String)>> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((name, password)) if !name.is_empty() && !password.is_empty() => {
                Ok((name.to_string(), password.to_string()))
            }
            _ => Err(ServerError::Config(format!(
                "KITCHEN_VIEWERS entries must look like name:password, got '{}'",
                entry
            ))),
        })
        .collect()
}

fn load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim()
        .parse()
        .map_err(|e| ServerError::Config(format!("Invalid {key} value '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StorageType;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.admin_username, "admin");
        assert!(config.seed);
        assert_eq!(config.session_ttl, Duration::from_secs(86400));
        assert!(matches!(config.repository.storage_type, StorageType::Sqlite { .. }));
    }

    #[test]
    fn test_memory_storage_and_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("KITCHEN_STORAGE", "Memory"),
            ("KITCHEN_BIND_ADDR", "0.0.0.0:9000"),
            ("KITCHEN_ADMIN_PASSWORD", "s3cret"),
            ("KITCHEN_SEED", "false"),
        ]))
        .unwrap();
        assert!(matches!(config.repository.storage_type, StorageType::Memory));
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.admin_password, "s3cret");
        assert!(!config.seed);
    }

    #[test]
    fn test_sqlite_path_override() {
        let config = AppConfig::from_lookup(lookup_from(&[("KITCHEN_DB_PATH", "/var/lib/kitchen.db")]))
            .unwrap();
        match config.repository.storage_type {
            StorageType::Sqlite { path } => assert_eq!(path, PathBuf::from("/var/lib/kitchen.db")),
            StorageType::Memory => panic!("Expected sqlite storage"),
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("KITCHEN_STORAGE", "postgres")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("KITCHEN_BIND_ADDR", "nowhere")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("KITCHEN_SEED", "maybe")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("KITCHEN_VIEWERS", "nopassword")])).is_err());
    }

    #[test]
    fn test_viewer_accounts() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            "KITCHEN_VIEWERS",
            "host:welcome, waiter:tables,",
        )]))
        .unwrap();
        assert_eq!(
            config.viewers,
            vec![
                ("host".to_string(), "welcome".to_string()),
                ("waiter".to_string(), "tables".to_string()),
            ]
        );
        assert!(AppConfig::from_lookup(lookup_from(&[])).unwrap().viewers.is_empty());
    }
}

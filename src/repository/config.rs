//! Repository configuration.

use std::path::PathBuf;
use std::sync::Arc;

use super::{Repositories, SeaChefRepository, SeaDishRepository};
use crate::db;
use crate::error::Result;

/// Storage backend type
#[derive(Debug, Clone)]
pub enum StorageType {
    /// Process-local lists, lost on restart
    Memory,
    /// SQLite database file
    Sqlite { path: PathBuf },
}

impl Default for StorageType {
    fn default() -> Self {
        StorageType::Sqlite {
            path: std::env::temp_dir().join("kitchen-server").join("kitchen.db"),
        }
    }
}

/// Repository configuration
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfig {
    pub storage_type: StorageType,
}

impl RepositoryConfig {
    pub fn memory() -> Self {
        Self {
            storage_type: StorageType::Memory,
        }
    }

    pub fn sqlite(path: PathBuf) -> Self {
        Self {
            storage_type: StorageType::Sqlite { path },
        }
    }

    /// Build both repositories from this config
    pub async fn build(&self) -> Result<Repositories> {
        match &self.storage_type {
            StorageType::Memory => {
                tracing::info!("Using in-memory storage");
                Ok(Repositories::in_memory())
            }
            StorageType::Sqlite { path } => {
                let conn = Arc::new(db::init_database(path).await?);
                tracing::info!("Using SQLite storage at {:?}", path);
                Ok(Repositories {
                    chefs: Arc::new(SeaChefRepository::new(conn.clone())),
                    dishes: Arc::new(SeaDishRepository::new(conn)),
                })
            }
        }
    }
}

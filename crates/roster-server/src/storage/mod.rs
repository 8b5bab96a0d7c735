//! Storage layer
//!
//! Two interchangeable [`UserStore`] backends: SQLite (embedded, persistent)
//! and an in-memory map. Which one runs is decided once at startup.

pub mod db;
pub mod memory;

#[cfg(test)]
pub mod conformance;

pub use db::SqliteUserStore;
pub use memory::MemoryUserStore;

use anyhow::Result;
use roster_core::UserStore;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Sqlite,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "sqlite" => Ok(Backend::Sqlite),
            other => anyhow::bail!("unknown store backend '{}', expected 'memory' or 'sqlite'", other),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Memory => write!(f, "memory"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: Backend,
    pub database_path: PathBuf,
    pub op_timeout: Duration,
}

/// Open the configured backend behind the common store trait.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn UserStore>> {
    let store: Arc<dyn UserStore> = match config.backend {
        Backend::Memory => Arc::new(MemoryUserStore::new()),
        Backend::Sqlite => {
            Arc::new(SqliteUserStore::open(&config.database_path, config.op_timeout).await?)
        }
    };
    Ok(store)
}

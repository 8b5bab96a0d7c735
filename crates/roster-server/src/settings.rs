//! Server configuration
//!
//! Defaults, overridden by `ROSTER_*` environment variables
//! (e.g. `ROSTER_STORE=sqlite`, `ROSTER_BIND_ADDRESS=127.0.0.1:8080`).

use crate::storage::{Backend, StorageConfig};
use anyhow::{Context, Result};
use config::{Environment, Map};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "secret";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_address: String,
    /// `memory` or `sqlite`
    pub store: String,
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub login_email: String,
    pub login_password: String,
    pub store_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_env(None)
    }

    /// Load with an explicit variable map instead of the process
    /// environment. Keys keep their `ROSTER_` prefix.
    pub fn from_env(vars: Option<Map<String, String>>) -> Result<Self> {
        let config: Config = config::Config::builder()
            .set_default("bind_address", "0.0.0.0:1323")?
            .set_default("store", "memory")?
            .set_default("database_path", "data/roster.db")?
            .set_default("jwt_secret", DEFAULT_JWT_SECRET)?
            .set_default("login_email", "joe@ex")?
            .set_default("login_password", "Joe")?
            .set_default("store_timeout_secs", 5)?
            .set_default("request_timeout_secs", 30)?
            .add_source(Environment::with_prefix("ROSTER").source(vars))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        // Reject unknown backends at load time rather than at first use.
        config.backend()?;

        if config.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("ROSTER_JWT_SECRET not set, using default (insecure for production)");
        }

        Ok(config)
    }

    pub fn backend(&self) -> Result<Backend> {
        self.store.parse()
    }

    pub fn storage(&self) -> Result<StorageConfig> {
        Ok(StorageConfig {
            backend: self.backend()?,
            database_path: self.database_path.clone(),
            op_timeout: Duration::from_secs(self.store_timeout_secs),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

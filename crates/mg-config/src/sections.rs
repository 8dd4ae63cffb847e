//! Typed views over the merged configuration.
//!
//! Every field has a default so a partial YAML layer is always valid; the
//! consumed-pointer registry in `lib.rs` must list each top-level section a
//! surface deserializes here.

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::LoadedConfig;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_DB_URL_ENV: &str = "MG_DATABASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// NAME of the env var holding the Postgres URL. Never the URL itself.
    pub url_env: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url_env: DEFAULT_DB_URL_ENV.to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Browser origins allowed to call the API (the dashboard dev servers).
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .trim()
            .parse()
            .with_context(|| format!("invalid server.bind_addr '{}'", self.bind_addr))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// JSON fixture loaded into the memory backend at boot.
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpeditionConfig {
    /// Days after "today" requested when the operator gives no end date.
    pub default_window_days: u32,
    /// IANA zone that defines "today" for the default window.
    pub timezone: String,
}

impl Default for ExpeditionConfig {
    fn default() -> Self {
        Self {
            default_window_days: 30,
            timezone: "America/Sao_Paulo".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSection {
    pub daemon_url: String,
}

impl Default for CliSection {
    fn default() -> Self {
        Self {
            daemon_url: format!("http://{DEFAULT_BIND_ADDR}"),
        }
    }
}

/// Everything `mg-daemon` reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DaemonConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl DaemonConfig {
    pub fn from_loaded(loaded: &LoadedConfig) -> Result<Self> {
        let cfg: DaemonConfig = serde_json::from_value(loaded.config_json.clone())
            .context("daemon config does not match expected shape")?;
        cfg.server.socket_addr()?;
        if cfg.store.backend == StoreBackend::Postgres && cfg.database.url_env.trim().is_empty() {
            bail!("database.url_env must name an env var when store.backend=postgres");
        }
        if cfg.database.max_connections == 0 {
            bail!("database.max_connections must be > 0");
        }
        Ok(cfg)
    }
}

/// Everything the `mg` CLI reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CliConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub expedition: ExpeditionConfig,
    pub cli: CliSection,
}

impl CliConfig {
    pub fn from_loaded(loaded: &LoadedConfig) -> Result<Self> {
        let cfg: CliConfig = serde_json::from_value(loaded.config_json.clone())
            .context("cli config does not match expected shape")?;
        if cfg.cli.daemon_url.trim().is_empty() {
            bail!("cli.daemon_url must be non-empty");
        }
        Ok(cfg)
    }
}

//! Boot-time wiring: config layers, store backend, bind address, CORS.
//!
//! Kept out of `main.rs` so the decisions are testable without a socket.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use mg_config::{
    load_layered_yaml, report_unused_keys, resolve_secrets, ConfigSurface, DaemonConfig,
    LoadedConfig, ServerConfig, StoreBackend, UnusedKeyPolicy,
};
use mg_db::PgContractStore;
use mg_expedition::{ContractStore, InMemoryContractStore};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Comma-separated YAML layer paths, overriding the default daemon layers.
pub const ENV_CONFIG_PATHS: &str = "MG_CONFIG";
/// Socket address overriding `server.bind_addr`.
pub const ENV_DAEMON_ADDR: &str = "MG_DAEMON_ADDR";

/// Layer paths from `MG_CONFIG` if set and non-empty, else the daemon defaults.
pub fn config_paths(env_value: Option<&str>) -> Vec<String> {
    let from_env: Vec<String> = env_value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if from_env.is_empty() {
        ConfigSurface::Daemon
            .default_paths()
            .iter()
            .map(|p| p.to_string())
            .collect()
    } else {
        from_env
    }
}

/// Load and validate the daemon config.
pub fn load_config(paths: &[String]) -> Result<(DaemonConfig, LoadedConfig)> {
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let loaded = load_layered_yaml(&refs)?;
    let cfg = DaemonConfig::from_loaded(&loaded)?;
    Ok((cfg, loaded))
}

/// Log every config leaf the daemon does not read. Never fatal.
pub fn warn_unused_keys(loaded: &LoadedConfig) -> Result<Vec<String>> {
    let report = report_unused_keys(
        ConfigSurface::Daemon,
        &loaded.config_json,
        UnusedKeyPolicy::Warn,
    )?;
    for pointer in &report.unused_leaf_pointers {
        warn!(pointer = %pointer, "config key not read by mg-daemon");
    }
    Ok(report.unused_leaf_pointers)
}

/// Construct the configured [`ContractStore`].
///
/// `memory` loads `store.seed_path` when given; `postgres` resolves the
/// database URL from the env var named in `database.url_env`.
pub async fn build_store(cfg: &DaemonConfig) -> Result<Arc<dyn ContractStore>> {
    match cfg.store.backend {
        StoreBackend::Memory => {
            let store = match cfg.store.seed_path.as_deref() {
                Some(path) => InMemoryContractStore::from_json_file(path)?,
                None => InMemoryContractStore::new(),
            };
            info!(
                rows = store.len().await,
                seed = cfg.store.seed_path.as_deref().unwrap_or("-"),
                "memory contract store ready"
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Postgres => {
            let secrets = resolve_secrets(&cfg.database, true)?;
            let url = secrets
                .database_url
                .context("database url resolved to nothing")?;
            let pool = mg_db::connect(&url, cfg.database.max_connections).await?;

            let st = mg_db::status(&pool).await?;
            if !st.has_contracts_table {
                warn!("contracts table missing; run `mg db migrate`");
            }
            info!(
                max_connections = cfg.database.max_connections,
                "postgres contract store ready"
            );
            Ok(Arc::new(PgContractStore::new(pool)))
        }
    }
}

/// `MG_DAEMON_ADDR` when it parses, else `server.bind_addr`.
pub fn bind_addr(server: &ServerConfig, env_value: Option<&str>) -> Result<SocketAddr> {
    if let Some(addr) = env_value.and_then(|v| v.trim().parse().ok()) {
        return Ok(addr);
    }
    server.socket_addr()
}

/// CORS: configured dashboard origins only, GET only.
pub fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(tower_http::cors::Any)
}

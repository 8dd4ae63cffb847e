//! mg-daemon entry point.
//!
//! Thin on purpose: load env and config, set up tracing, pick the contract
//! store, wire middleware, serve. Handlers live in `routes.rs`.

use std::sync::Arc;

use anyhow::Context;
use mg_daemon::{boot, routes, state};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    let paths = boot::config_paths(std::env::var(boot::ENV_CONFIG_PATHS).ok().as_deref());
    let (cfg, loaded) = boot::load_config(&paths)?;

    init_tracing(&cfg.logging.filter);
    info!(config_hash = %loaded.config_hash, layers = ?paths, "config loaded");
    boot::warn_unused_keys(&loaded)?;

    let store = boot::build_store(&cfg).await?;
    let shared = Arc::new(state::AppState::new(store).with_config_hash(loaded.config_hash));

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(boot::cors_layer(&cfg.server));

    let addr = boot::bind_addr(
        &cfg.server,
        std::env::var(boot::ENV_DAEMON_ADDR).ok().as_deref(),
    )?;
    info!("mg-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing(config_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config_filter.into()),
        )
        .init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

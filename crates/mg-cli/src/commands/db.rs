//! `mg db` handlers: status, migrate, seed.

use std::fs;

use anyhow::{Context, Result};
use mg_config::{resolve_secrets, CliConfig};
use mg_schemas::SeedFixture;
use sqlx::PgPool;

async fn connect(cfg: &CliConfig) -> Result<PgPool> {
    let secrets = resolve_secrets(&cfg.database, true)?;
    let url = secrets
        .database_url
        .context("database url resolved to nothing")?;
    mg_db::connect(&url, cfg.database.max_connections).await
}

pub async fn db_status(cfg: &CliConfig) -> Result<()> {
    let pool = connect(cfg).await?;
    let s = mg_db::status(&pool).await?;
    let undelivered = mg_db::count_undelivered_items(&pool).await?;
    println!(
        "db_ok={} has_contracts_table={} undelivered_items={}",
        s.ok, s.has_contracts_table, undelivered
    );
    Ok(())
}

pub async fn db_migrate(cfg: &CliConfig) -> Result<()> {
    let pool = connect(cfg).await?;
    mg_db::migrate(&pool).await?;
    println!("migrations_applied=true");
    Ok(())
}

pub async fn db_seed(cfg: &CliConfig, file: &str) -> Result<()> {
    let seed = read_seed(file)?;
    let pool = connect(cfg).await?;
    let report = mg_db::seed_from_fixture(&pool, &seed).await?;
    println!(
        "seeded_contracts={} seeded_items={}",
        report.contracts, report.items
    );
    Ok(())
}

/// Parse a seed fixture before touching the database.
pub fn read_seed(file: &str) -> Result<SeedFixture> {
    let bytes = fs::read(file).with_context(|| format!("read seed file failed: {}", file))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    serde_json::from_slice(bytes).with_context(|| format!("seed file must be a seed fixture: {}", file))
}

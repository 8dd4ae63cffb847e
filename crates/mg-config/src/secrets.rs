//! Runtime secret resolution.
//!
//! Config YAML stores only env var NAMES (e.g. `database.url_env:
//! "MG_DATABASE_URL"`). Binaries call [`resolve_secrets`] once at startup and
//! pass the result into constructors. `Debug` output redacts values and error
//! messages mention the variable NAME only.

use anyhow::{bail, Result};

use crate::DatabaseConfig;

/// Secrets resolved from the environment for one process.
#[derive(Clone)]
pub struct ResolvedSecrets {
    /// Postgres connection URL. `None` if the named env var was absent or blank.
    pub database_url: Option<String>,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "<REDACTED>"),
            )
            .finish()
    }
}

/// Returns `None` if the variable is unset or blank.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve the database URL from the env var named in `db.url_env`.
///
/// With `require_database = true` a missing variable is an error naming the
/// variable; otherwise the URL is optional.
pub fn resolve_secrets(db: &DatabaseConfig, require_database: bool) -> Result<ResolvedSecrets> {
    let var = db.url_env.trim();
    let database_url = if var.is_empty() {
        None
    } else {
        resolve_env(var)
    };

    if require_database && database_url.is_none() {
        bail!(
            "SECRETS_MISSING: required env var '{}' (database url) is not set or empty",
            var
        );
    }

    Ok(ResolvedSecrets { database_url })
}

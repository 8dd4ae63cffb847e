//! Command handler modules for the `mg` CLI.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod db;
pub mod expedition;

use std::path::Path;

use anyhow::Result;
use mg_config::{report_unused_keys, CliConfig, ConfigSurface, LoadedConfig, UnusedKeyPolicy};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load the CLI config from explicit `--config` layers, or from whichever
/// default CLI layers exist relative to the working directory. With neither,
/// built-in defaults apply.
pub fn load_cli_config(explicit: &[String]) -> Result<(CliConfig, Option<LoadedConfig>)> {
    let paths: Vec<&str> = if explicit.is_empty() {
        ConfigSurface::Cli
            .default_paths()
            .into_iter()
            .filter(|p| Path::new(p).is_file())
            .collect()
    } else {
        explicit.iter().map(String::as_str).collect()
    };

    if paths.is_empty() {
        return Ok((CliConfig::default(), None));
    }

    let loaded = mg_config::load_layered_yaml(&paths)?;
    let report = report_unused_keys(ConfigSurface::Cli, &loaded.config_json, UnusedKeyPolicy::Warn)?;
    if !report.is_clean() {
        eprintln!(
            "WARN: CONFIG_UNUSED_KEYS surface=CLI unused_leaf_keys={}",
            report.unused_leaf_pointers.len()
        );
        for p in report.unused_leaf_pointers.iter().take(50) {
            eprintln!("  unused={}", p);
        }
    }

    let cfg = CliConfig::from_loaded(&loaded)?;
    Ok((cfg, Some(loaded)))
}

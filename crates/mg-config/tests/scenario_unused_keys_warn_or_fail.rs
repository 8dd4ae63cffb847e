use mg_config::{load_layered_yaml_from_strings, report_unused_keys, ConfigSurface, UnusedKeyPolicy};

/// Validates:
/// 1) Unused keys are detected in WARN mode but do not error.
/// 2) Unused keys cause failure in FAIL mode.
/// 3) Keys under consumed prefixes are not flagged.
/// 4) Surfaces differ: a CLI-only section is unused for the daemon.

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let yaml = r#"
server:
  bind_addr: "127.0.0.1:8787"

legacy_panel:
  refresh_secs: 30
  page_size: 20
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();

    let report =
        report_unused_keys(ConfigSurface::Daemon, &loaded.config_json, UnusedKeyPolicy::Warn)
            .expect("warn mode must not error");

    assert!(!report.is_clean());
    assert_eq!(
        report.unused_leaf_pointers,
        vec![
            "/legacy_panel/page_size".to_string(),
            "/legacy_panel/refresh_secs".to_string()
        ],
        "unused pointers are reported sorted"
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let yaml = r#"
database:
  url_env: "MG_DATABASE_URL"
stray:
  key: 1
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();

    let err = report_unused_keys(ConfigSurface::Cli, &loaded.config_json, UnusedKeyPolicy::Fail)
        .unwrap_err();

    let msg = format!("{err:?}");
    assert!(msg.contains("CONFIG_UNUSED_KEYS"));
    assert!(msg.contains("surface=CLI"));
}

#[test]
fn consumed_prefix_covers_nested_keys() {
    let yaml = r#"
store:
  backend: memory
  seed_path: "config/fixtures/expedition_seed.json"
logging:
  filter: info
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();

    let report =
        report_unused_keys(ConfigSurface::Daemon, &loaded.config_json, UnusedKeyPolicy::Fail)
            .expect("all keys are consumed by the daemon");

    assert!(report.is_clean());
}

#[test]
fn cli_only_section_is_unused_for_daemon() {
    let yaml = r#"
expedition:
  default_window_days: 30
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();

    let daemon =
        report_unused_keys(ConfigSurface::Daemon, &loaded.config_json, UnusedKeyPolicy::Warn)
            .unwrap();
    let cli = report_unused_keys(ConfigSurface::Cli, &loaded.config_json, UnusedKeyPolicy::Warn)
        .unwrap();

    assert_eq!(
        daemon.unused_leaf_pointers,
        vec!["/expedition/default_window_days".to_string()]
    );
    assert!(cli.is_clean());
}

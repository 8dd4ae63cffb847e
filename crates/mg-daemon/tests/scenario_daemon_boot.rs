//! Boot wiring without a socket: config layer selection, memory backend
//! seeding, bind address override, and fail-closed Postgres secrets.

use std::io::Write;

use chrono::NaiveDate;
use mg_config::{load_layered_yaml_from_strings, DaemonConfig, StoreBackend};
use mg_daemon::boot;
use mg_expedition::{expedition_items, ContractStore, DateWindow};

fn repo_path(rel: &str) -> String {
    format!("{}/../../{rel}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn config_paths_default_to_daemon_layers() {
    assert_eq!(
        boot::config_paths(None),
        vec!["config/defaults/base.yaml", "config/defaults/daemon.yaml"]
    );
    assert_eq!(boot::config_paths(Some(" , ")), boot::config_paths(None));
}

#[test]
fn config_paths_env_is_comma_separated() {
    assert_eq!(
        boot::config_paths(Some("a.yaml, b.yaml,")),
        vec!["a.yaml".to_string(), "b.yaml".to_string()]
    );
}

#[test]
fn repo_layers_plus_memory_overlay_load() {
    let paths = vec![
        repo_path("config/defaults/base.yaml"),
        repo_path("config/defaults/daemon.yaml"),
        repo_path("config/fixtures/memory_store.yaml"),
    ];

    let (cfg, loaded) = boot::load_config(&paths).unwrap();

    assert_eq!(cfg.store.backend, StoreBackend::Memory);
    assert_eq!(loaded.config_hash.len(), 64);
    assert!(boot::warn_unused_keys(&loaded).unwrap().is_empty());
}

#[test]
fn env_addr_overrides_config_only_when_it_parses() {
    let cfg = DaemonConfig::default();

    let addr = boot::bind_addr(&cfg.server, Some("0.0.0.0:9901")).unwrap();
    assert_eq!(addr.port(), 9901);

    let addr = boot::bind_addr(&cfg.server, Some("not-an-addr")).unwrap();
    assert_eq!(addr.port(), 8787);

    let addr = boot::bind_addr(&cfg.server, None).unwrap();
    assert_eq!(addr.to_string(), "127.0.0.1:8787");
}

#[tokio::test]
async fn memory_backend_serves_seed_fixture() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
        f,
        r#"{{"contracts":[{{"contractNumber":"CT-9","customerName":"Zeta","signedAt":null,
             "paymentStatus":"PAID",
             "items":[{{"assetCode":"CNT-9","assetType":"CONTAINER","scheduledDeliveryDate":"2024-05-02"}}]}}]}}"#
    )
    .unwrap();

    let yaml = format!(
        "store:\n  backend: memory\n  seed_path: \"{}\"\n",
        f.path().display()
    );
    let loaded = load_layered_yaml_from_strings(&[yaml.as_str()]).unwrap();
    let cfg = DaemonConfig::from_loaded(&loaded).unwrap();

    let store = boot::build_store(&cfg).await.unwrap();
    assert_eq!(store.source_name(), "memory");

    let window = DateWindow::new(
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
    )
    .unwrap();
    let items = expedition_items(store.as_ref(), &window).await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0].is_blocked());
}

#[tokio::test]
async fn postgres_backend_without_url_fails_closed() {
    let yaml = "database:\n  url_env: MG_SENTINEL_DAEMON_DB_URL_NEVER_SET\n";
    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let cfg = DaemonConfig::from_loaded(&loaded).unwrap();

    let err = match boot::build_store(&cfg).await {
        Ok(_) => panic!("postgres backend must not boot without a database url"),
        Err(e) => e.to_string(),
    };
    assert!(err.contains("SECRETS_MISSING"));
    assert!(err.contains("MG_SENTINEL_DAEMON_DB_URL_NEVER_SET"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn repo_path(rel: &str) -> String {
    format!("{}/../../{rel}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn config_hash_prints_hash_and_canonical_json() {
    Command::cargo_bin("mg")
        .unwrap()
        .args([
            "config-hash",
            &repo_path("config/defaults/base.yaml"),
            &repo_path("config/defaults/cli.yaml"),
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"config_hash=[0-9a-f]{64}").unwrap())
        .stdout(predicate::str::contains("\"default_window_days\":30"));
}

#[test]
fn config_hash_rejects_secret_literal() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "database:\n  url_env: \"postgres://mg:pw@db/multigest\"").unwrap();

    Command::cargo_bin("mg")
        .unwrap()
        .args(["config-hash", f.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_SECRET_DETECTED"))
        .stderr(predicate::str::contains("pw@db").not());
}

#[test]
fn db_seed_rejects_malformed_fixture_before_connecting() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "{{\"contracts\": [{{\"contractNumber\": 7}}]}}").unwrap();

    Command::cargo_bin("mg")
        .unwrap()
        .args(["db", "seed", "--file", f.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("seed file must be a seed fixture"));
}

#[test]
fn db_commands_need_the_named_url_variable() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "database:\n  url_env: MG_SENTINEL_CLI_DB_URL_NEVER_SET").unwrap();

    Command::cargo_bin("mg")
        .unwrap()
        .args(["--config", f.path().to_str().unwrap(), "db", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SECRETS_MISSING"))
        .stderr(predicate::str::contains("MG_SENTINEL_CLI_DB_URL_NEVER_SET"));
}

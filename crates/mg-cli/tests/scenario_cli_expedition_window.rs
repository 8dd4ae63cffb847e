use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;

/// Port 9 (discard) on loopback: nothing listens, so any request would fail
/// with a connection error instead of the expected validation error.
const DEAD_DAEMON: &str = "http://127.0.0.1:9";

fn mg() -> Command {
    let mut cmd = Command::cargo_bin("mg").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn inverted_window_fails_before_any_request() {
    mg().args([
        "expedition",
        "list",
        "--start",
        "2024-01-31",
        "--end",
        "2024-01-01",
        "--daemon",
        DEAD_DAEMON,
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("INVALID_RANGE"))
    .stderr(predicate::str::contains("daemon request failed").not());
}

#[test]
fn malformed_date_fails_before_any_request() {
    mg().args([
        "expedition",
        "summary",
        "--start",
        "2024-02-30",
        "--daemon",
        DEAD_DAEMON,
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("INVALID_DATE"));
}

#[test]
fn unreachable_daemon_is_reported() {
    mg().args([
        "expedition",
        "list",
        "--start",
        "2024-01-01",
        "--end",
        "2024-01-31",
        "--daemon",
        DEAD_DAEMON,
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("daemon request failed"));
}

#[test]
fn list_prints_one_line_per_item() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/expedition")
            .query_param("start", "2024-01-01")
            .query_param("end", "2024-01-31");
        then.status(200).json_body(serde_json::json!([
            {
                "id": 1, "contractId": 1, "contractNumber": "CT-001", "customerName": "Alfa",
                "assetCode": "CNT-0001", "assetType": "CONTAINER",
                "scheduledDeliveryDate": "2024-01-10", "contractSignedAt": null,
                "isBlocked": true, "deliveryBlockedReason": "CONTRATO_NAO_ASSINADO"
            },
            {
                "id": 2, "contractId": 2, "contractNumber": "CT-002", "customerName": "Beta",
                "assetCode": "MOD-0002", "assetType": "MODULO",
                "scheduledDeliveryDate": "2024-01-11", "contractSignedAt": "2024-01-02T10:00:00Z",
                "isBlocked": false, "deliveryBlockedReason": null
            }
        ]));
    });

    mg().args([
        "expedition",
        "list",
        "--start",
        "2024-01-01",
        "--end",
        "2024-01-31",
        "--daemon",
        &server.base_url(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "item_id=1 contract=CT-001 customer=\"Alfa\" asset=CNT-0001 type=CONTAINER BLOCKED reason=CONTRATO_NAO_ASSINADO",
    ))
    .stdout(predicate::str::contains("item_id=2").and(predicate::str::contains("RELEASED")))
    .stdout(predicate::str::contains("window=2024-01-01..2024-01-31 items=2 blocked=1"));

    mock.assert();
}

#[test]
fn daemon_error_code_reaches_the_operator() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/expedition/summary");
        then.status(500).json_body(serde_json::json!({
            "error": "contract store unavailable: pool timed out",
            "code": "STORE_UNAVAILABLE"
        }));
    });

    mg().args([
        "expedition",
        "summary",
        "--start",
        "2024-01-01",
        "--end",
        "2024-01-31",
        "--daemon",
        &server.base_url(),
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("STORE_UNAVAILABLE"));
}

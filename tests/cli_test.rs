//! End-to-end tests for the `oai-pmh` binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IDENTIFY: &str = include_str!("fixtures/identify.xml");
const LIST_RECORDS_PAGE1: &str = include_str!("fixtures/list_records_page1.xml");
const LIST_RECORDS_PAGE2: &str = include_str!("fixtures/list_records_page2.xml");

/// Test that --help displays usage and the verb subcommands.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("oai-pmh").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("harvest metadata repositories"))
        .stdout(predicate::str::contains("identify"))
        .stdout(predicate::str::contains("list-records"))
        .stdout(predicate::str::contains("list-metadata-formats"));
}

/// Test that --version displays the binary name.
#[test]
fn test_binary_version() {
    let mut cmd = Command::cargo_bin("oai-pmh").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("oai-pmh"));
}

/// Malformed datestamps must be rejected before any request goes out.
#[test]
fn test_rejects_malformed_from_datestamp() {
    let mut cmd = Command::cargo_bin("oai-pmh").unwrap();
    cmd.args([
        "https://localhost:1/oai",
        "list-records",
        "--from",
        "01/02/2024",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid datestamp"));
}

/// Calendar-impossible dates fail even when the shape matches.
#[test]
fn test_rejects_impossible_until_datestamp() {
    let mut cmd = Command::cargo_bin("oai-pmh").unwrap();
    cmd.args([
        "https://localhost:1/oai",
        "list-identifiers",
        "--until",
        "2024-13-41",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid datestamp"));
}

#[test]
fn test_rejects_unparseable_base_url() {
    let mut cmd = Command::cargo_bin("oai-pmh").unwrap();
    cmd.args(["::not-a-url::", "identify"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid base URL"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_identify_against_mock_repository() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("verb", "Identify"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(IDENTIFY, "text/xml"))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let output = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("oai-pmh")
            .unwrap()
            .args([uri.as_str(), "identify"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tethys Research Data Repository"));
    assert!(stdout.contains("persistent"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_records_writes_json_lines() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("verb", "ListRecords"))
        .and(query_param("metadataPrefix", "oai_dc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LIST_RECORDS_PAGE1, "text/xml"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("verb", "ListRecords"))
        .and(query_param("resumptionToken", "offset/2/oai_dc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LIST_RECORDS_PAGE2, "text/xml"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let out_path = dir.path().join("dump.jsonl");
    let uri = mock_server.uri();
    let out_arg = out_path.to_string_lossy().into_owned();

    let output = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("oai-pmh")
            .unwrap()
            .args([uri.as_str(), "list-records", "--out", out_arg.as_str()])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Harvested 3 records in 2 page(s)"));

    let content = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3, "one JSON line per record");
    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line).expect("each line is JSON");
        assert!(value.get("header").is_some(), "line carries a header: {line}");
    }

    // The deleted record from the final page serializes without metadata
    let last: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
    assert_eq!(last["header"]["deleted"], serde_json::Value::Bool(true));
    assert!(last.get("metadata").is_none());
}

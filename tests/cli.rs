use assert_cmd::prelude::*;
use mockito::Matcher;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

const DEVELOPER_MAP_LIST: &str = r#"{
    "data": [
        {
            "id": 3,
            "account_id": 1,
            "state": 1,
            "license_type": "developer",
            "sso_license_mapping_groups": ["eng"]
        }
    ],
    "extra": { "pagination": { "count": 1, "total_count": 1 } }
}"#;

const EMPTY_LIST: &str = r#"{
    "data": [],
    "extra": { "pagination": { "count": 0, "total_count": 0 } }
}"#;

fn write_config(dir: &Path, host_url: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    let contents = format!("token: test-token\naccount_id: 1\nhost_url: {host_url}\n");
    fs::write(&path, contents).expect("failed to write config");
    path
}

fn write_manifest(dir: &Path, groups: &[&str]) -> PathBuf {
    let path = dir.join("developers.yaml");
    let items: String = groups.iter().map(|g| format!("  - {g}\n")).collect();
    let contents = format!("kind: partial_license_map\nkey: developer\nitems:\n{items}");
    fs::write(&path, contents).expect("failed to write manifest");
    path
}

fn write_record(dir: &Path, groups: &[&str]) -> PathBuf {
    let path = dir.join("developers.record.json");
    let record = serde_json::json!({
        "kind": "partial_license_map",
        "key": "developer",
        "items": groups,
    });
    fs::write(&path, record.to_string()).expect("failed to write record");
    path
}

fn dbtc() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dbtc"));
    cmd.env_remove("DBTC_CONFIG")
        .env_remove("DBTC_FORMAT")
        .env_remove("DBT_CLOUD_TOKEN")
        .env_remove("DBT_CLOUD_ACCOUNT_ID")
        .env_remove("DBT_CLOUD_HOST_URL");
    cmd
}

#[test]
fn status_uses_custom_config_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "http://127.0.0.1:1/api");

    let assert = dbtc()
        .arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("Account: 1"));
    assert!(stdout.contains("Custom API host"));
    assert!(stdout.contains(&config_path.to_string_lossy().to_string()));

    Ok(())
}

#[test]
fn status_without_config_suggests_init() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    dbtc()
        .arg("status")
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("dbtc init"));

    Ok(())
}

#[test]
fn missing_config_shows_helpful_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let manifest = write_manifest(temp.path(), &["data-eng"]);

    dbtc()
        .arg("apply")
        .arg("-f")
        .arg(&manifest)
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("dbtc init"));

    Ok(())
}

#[test]
fn invalid_manifest_is_rejected_before_any_request() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "http://127.0.0.1:1/api");
    let manifest = temp.path().join("bad.yaml");
    fs::write(
        &manifest,
        "kind: partial_notification\nkey:\n  user_id: 5\n  notification_type: slack\nitems: []\n",
    )?;

    dbtc()
        .arg("apply")
        .arg("-f")
        .arg(&manifest)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("slack_channel_id"));

    Ok(())
}

#[test]
fn record_of_another_kind_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "http://127.0.0.1:1/api");
    let manifest = write_manifest(temp.path(), &["data-eng"]);
    let record = temp.path().join("other.json");
    fs::write(
        &record,
        r#"{"kind": "scim_group_partial_permissions", "key": 4, "items": []}"#,
    )?;

    dbtc()
        .arg("apply")
        .arg("-f")
        .arg(&manifest)
        .arg("--record")
        .arg(&record)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn apply_adds_group_to_license_map_and_writes_record() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let list = server
        .mock("GET", "/v3/accounts/1/license-maps/")
        .match_query(Matcher::Any)
        .match_header("authorization", "Token test-token")
        .with_status(200)
        .with_body(DEVELOPER_MAP_LIST)
        .expect_at_least(1)
        .create();

    let update = server
        .mock("POST", "/v3/accounts/1/license-maps/3/")
        .match_body(Matcher::Regex(r#""eng","data-eng""#.to_string()))
        .with_status(200)
        .with_body(
            r#"{"data": {"id": 3, "account_id": 1, "state": 1, "license_type": "developer",
                "sso_license_mapping_groups": ["eng", "data-eng"]}}"#,
        )
        .expect(1)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());
    let manifest = write_manifest(temp.path(), &["data-eng"]);

    dbtc()
        .arg("apply")
        .arg("-f")
        .arg(&manifest)
        .arg("--config")
        .arg(&config_path)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"action\": \"create\""));

    list.assert();
    update.assert();

    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("developers.record.json"))?)?;
    assert_eq!(record["kind"], "partial_license_map");
    assert_eq!(record["items"], serde_json::json!(["data-eng"]));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn config_format_preference_applies_without_flag() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _list = server
        .mock("GET", "/v3/accounts/1/license-maps/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(DEVELOPER_MAP_LIST)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());
    let mut config = fs::read_to_string(&config_path)?;
    config.push_str("preferences:\n  format: json\n");
    fs::write(&config_path, config)?;
    let record = write_record(temp.path(), &["eng"]);

    dbtc()
        .arg("refresh")
        .arg("--record")
        .arg(&record)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"action\": \"refresh\""));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn failed_write_leaves_no_record() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _list = server
        .mock("GET", "/v3/accounts/1/license-maps/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(DEVELOPER_MAP_LIST)
        .create();
    let update = server
        .mock("POST", "/v3/accounts/1/license-maps/3/")
        .with_status(500)
        .with_body("database unavailable")
        .expect(1)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());
    let manifest = write_manifest(temp.path(), &["data-eng"]);

    dbtc()
        .arg("apply")
        .arg("-f")
        .arg(&manifest)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Server error"));

    update.assert();
    assert!(!temp.path().join("developers.record.json").exists());

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn apply_dry_run_sends_no_writes() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _list = server
        .mock("GET", "/v3/accounts/1/license-maps/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(DEVELOPER_MAP_LIST)
        .create();
    let writes = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());
    let manifest = write_manifest(temp.path(), &["data-eng"]);

    dbtc()
        .arg("apply")
        .arg("-f")
        .arg(&manifest)
        .arg("--dry-run")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"))
        .stdout(predicate::str::contains("replace"));

    writes.assert();
    assert!(!temp.path().join("developers.record.json").exists());

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn destroy_last_group_deletes_map_and_record() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _list = server
        .mock("GET", "/v3/accounts/1/license-maps/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(DEVELOPER_MAP_LIST)
        .create();
    let delete = server
        .mock("DELETE", "/v3/accounts/1/license-maps/3/")
        .with_status(204)
        .expect(1)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());
    let record = write_record(temp.path(), &["eng"]);

    dbtc()
        .arg("destroy")
        .arg("--record")
        .arg(&record)
        .arg("--yes")
        .arg("--config")
        .arg(&config_path)
        .arg("--format")
        .arg("table")
        .assert()
        .success();

    delete.assert();
    assert!(!record.exists());

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn refresh_removes_record_when_parent_is_gone() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _list = server
        .mock("GET", "/v3/accounts/1/license-maps/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(EMPTY_LIST)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());
    let record = write_record(temp.path(), &["data-eng"]);

    dbtc()
        .arg("refresh")
        .arg("--record")
        .arg(&record)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("no longer exists"));

    assert!(!record.exists());

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn unauthorized_error_suggests_init() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _list = server
        .mock("GET", "/v3/accounts/1/license-maps/")
        .match_query(Matcher::Any)
        .with_status(401)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());
    let record = write_record(temp.path(), &["data-eng"]);

    dbtc()
        .arg("refresh")
        .arg("--record")
        .arg(&record)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("dbtc init"));

    // A failed refresh leaves the record alone
    assert!(record.exists());

    Ok(())
}

#[test]
fn connection_error_shows_network_message() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "http://127.0.0.1:1");
    let record = write_record(temp.path(), &["data-eng"]);

    dbtc()
        .arg("refresh")
        .arg("--record")
        .arg(&record)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"));

    Ok(())
}

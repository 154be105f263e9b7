//! Integration tests for the `eventual` CLI binary.
//!
//! Argument parsing, help output, shell completions and error exit codes
//! run without any backend; the few backend-bound commands talk to a
//! local mock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `eventual` binary with env isolation.
///
/// Clears all `EVENTUAL_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn eventual_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("eventual");
    cmd.env("HOME", "/tmp/eventual-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/eventual-cli-test-nonexistent")
        .env_remove("EVENTUAL_PROFILE")
        .env_remove("EVENTUAL_API_URL")
        .env_remove("EVENTUAL_GEOCODER_URL")
        .env_remove("EVENTUAL_OUTPUT")
        .env_remove("EVENTUAL_INSECURE")
        .env_remove("EVENTUAL_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let mut cmd = eventual_cmd();
    cmd.args(["--api-url", &server.uri()]).args(args);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn event_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "_id": id, "nombre": name, "timestamp": "2024-12-01T20:30:00",
        "lugar": "Málaga", "lat": 36.72, "lon": -4.42,
        "organizador": "user", "imagen": ""
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = eventual_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("Usage"),
        "Expected 'Usage' in output:\n{text}"
    );
}

#[test]
fn test_help_flag() {
    eventual_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("events")
            .and(predicate::str::contains("countries"))
            .and(predicate::str::contains("session"))
            .and(predicate::str::contains("browse")),
    );
}

#[test]
fn test_version_flag() {
    eventual_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("eventual"));
}

#[test]
fn test_events_help_lists_subcommands() {
    eventual_cmd().args(["events", "--help"]).assert().success().stdout(
        predicate::str::contains("search")
            .and(predicate::str::contains("create"))
            .and(predicate::str::contains("delete")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    eventual_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    eventual_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    eventual_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = eventual_cmd().arg("nonexistent").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized subcommand"),
        "Expected clap error in output:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = eventual_cmd()
        .args(["-o", "xml", "events", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("xml"), "Expected bad value in output:\n{text}");
}

#[test]
fn test_rating_out_of_range_rejected() {
    let output = eventual_cmd()
        .args(["users", "rate", "u1", "9"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_browse_unknown_path() {
    let output = eventual_cmd()
        .args(["browse", "/nowhere/at/all"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_browse_requires_terminal() {
    let output = eventual_cmd().arg("browse").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("terminal"),
        "Expected terminal requirement in output:\n{text}"
    );
}

// ── Config without a file ───────────────────────────────────────────

#[test]
fn test_config_show_without_config() {
    eventual_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_points_at_toml() {
    eventual_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_use_unknown_profile() {
    let output = eventual_cmd()
        .args(["config", "use", "staging"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("staging"), "Expected profile name:\n{text}");
}

#[test]
fn test_unknown_profile_flag() {
    let output = eventual_cmd()
        .args(["--profile", "staging", "events", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

// ── Identity ────────────────────────────────────────────────────────

#[test]
fn test_whoami_without_identity() {
    let output = eventual_cmd().args(["session", "whoami"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("config"), "Expected setup hint:\n{text}");
}

#[test]
fn test_countries_list_requires_identity() {
    let output = eventual_cmd().args(["countries", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_events_create_rejects_bad_timestamp() {
    let output = eventual_cmd()
        .args([
            "events", "create", "--name", "Concierto", "--at", "2024-12-01", "--location",
            "Málaga",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("dd/mm/YYYY"), "Expected format hint:\n{text}");
}

// ── Against a mock backend ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_events_list_plain_prints_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/eventos"))
        .and(query_param("sort", "timestamp"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "2")
                .set_body_json(json!([event_json("e1", "Uno"), event_json("e2", "Dos")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "plain", "events", "list"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), ["e1", "e2"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_events_list_json_keeps_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/eventos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([event_json("e1", "Uno")])))
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "json", "events", "list"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_events_get_shows_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/eventos/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json("e1", "Concierto")))
        .mount(&server)
        .await;

    let output = run_against(&server, &["--color", "never", "events", "get", "e1"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Concierto"), "Expected event name:\n{stdout}");
    assert!(stdout.contains("Málaga"), "Expected location:\n{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_events_get_missing_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/eventos/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let output = run_against(&server, &["events", "get", "missing"]).await;
    assert!(!output.status.success());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_events_delete_non_interactive_requires_yes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/eventos/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json("e1", "Uno")))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/eventos/e1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_against(&server, &["events", "delete", "e1"]).await;
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("--yes"), "Expected --yes hint:\n{text}");
}

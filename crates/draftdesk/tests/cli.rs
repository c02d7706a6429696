//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective. Every test
//! that touches saved state points `DRAFTDESK_STORE_PATH` at a temp file.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A command whose store lives in `tmp`.
fn cmd_with_store(tmp: &TempDir) -> Command {
    let mut cmd = cmd();
    cmd.env("DRAFTDESK_STORE_PATH", store_path(tmp));
    cmd
}

fn store_path(tmp: &TempDir) -> PathBuf {
    tmp.path().join("store.json")
}

fn json_stdout(command: &mut Command) -> Value {
    let output = command.output().expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

fn read_store(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("thread"));
}

#[test]
fn long_help_lists_environment() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DRAFTDESK_STORE_PATH"));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("publish")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// =============================================================================
// Info & global flags
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("Providers"));
}

#[test]
fn global_flags_accepted() {
    for flags in [
        &["-q"][..],
        &["-vv"],
        &["--color", "never"],
        &["--color", "always"],
    ] {
        cmd().args(flags).arg("info").assert().success();
    }
}

// =============================================================================
// Offline analysis
// =============================================================================

#[test]
fn classify_reports_reply() {
    let json = json_stdout(cmd().args(["classify", "--json", "--text", "@sam good call"]));
    assert_eq!(json["type"], "reply");
    assert_eq!(json["indicators"][0], "Starts with @mention");
}

#[test]
fn classify_reads_stdin() {
    cmd()
        .arg("classify")
        .write_stdin("> shipping beats perfect\nso true")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quote"));
}

#[test]
fn classify_reads_file() {
    let tmp = TempDir::new().unwrap();
    let draft = tmp.path().join("draft.txt");
    std::fs::write(&draft, "lol").unwrap();

    let json = json_stdout(cmd().args(["classify", "--json", draft.to_str().unwrap()]));
    assert_eq!(json["type"], "comment");
}

#[test]
fn count_collapses_urls() {
    let json = json_stdout(cmd().args([
        "count",
        "--json",
        "--text",
        "notes: https://example.com/some/really/long/path/that/keeps/going",
    ]));
    assert_eq!(json["length"], 30);
    assert_eq!(json["remaining"], 250);
    assert_eq!(json["over_limit"], false);
}

#[test]
fn count_check_fails_over_limit() {
    cmd()
        .args(["count", "--check", "--text"])
        .arg("a".repeat(281))
        .assert()
        .failure()
        .stderr(predicate::str::contains("over the 280-character limit"));
}

#[test]
fn count_respects_custom_limit() {
    let json = json_stdout(cmd().args([
        "count",
        "--json",
        "--max-length",
        "10",
        "--text",
        "eleven chars",
    ]));
    assert_eq!(json["limit"], 10);
    assert_eq!(json["over_limit"], true);
}

#[test]
fn thread_splits_long_drafts() {
    let draft = "Every good thread starts with a hook that earns the next line. ".repeat(8);
    let json = json_stdout(cmd().args(["thread", "--json", "--text", &draft]));
    let parts = json["parts"].as_array().unwrap();
    assert!(parts.len() > 1);
    let first = parts[0].as_str().unwrap();
    assert!(first.starts_with(&format!("1/{} ", parts.len())));
    for part in parts {
        assert!(part.as_str().unwrap().chars().count() <= 280);
    }
}

#[test]
fn entities_lists_unique_tags() {
    let json = json_stdout(cmd().args([
        "entities",
        "--json",
        "--text",
        "#rust is great, #Rust too, #rust again @ferris",
    ]));
    assert_eq!(json["hashtags"], serde_json::json!(["#rust", "#Rust"]));
    assert_eq!(json["mentions"], serde_json::json!(["@ferris"]));
    assert_eq!(json["starts_with_mention"], false);
}

#[test]
fn input_limit_applies_to_inline_text() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(".draftdesk.toml"), "max_input_bytes = 4").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap()])
        .args(["count", "--text", "too long"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

#[test]
fn tones_lists_every_preset() {
    let json = json_stdout(cmd().args(["tones", "--json"]));
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["professional", "casual", "viral", "concise", "humorous"]);
}

#[test]
fn tones_prints_one_prompt() {
    cmd()
        .args(["tones", "--prompt", "concise"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// =============================================================================
// Keys, models, settings
// =============================================================================

#[test]
fn keys_are_saved_obscured() {
    let tmp = TempDir::new().unwrap();

    cmd_with_store(&tmp)
        .args(["keys", "set", "gemini", "AIza-secret"])
        .assert()
        .success();

    let raw = std::fs::read_to_string(store_path(&tmp)).unwrap();
    assert!(!raw.contains("AIza-secret"), "key must not be stored verbatim");
    let store = read_store(&store_path(&tmp));
    assert_eq!(store["draftdesk_gemini_api_key"], "\"QUl6YS1zZWNyZXQ=\"");

    let json = json_stdout(cmd_with_store(&tmp).args(["keys", "list", "--json"]));
    assert_eq!(json[0]["provider"], "gemini");
    assert_eq!(json[0]["configured"], true);
    assert_eq!(json[1]["configured"], false);
}

#[test]
fn keys_can_come_from_stdin_and_be_removed() {
    let tmp = TempDir::new().unwrap();

    cmd_with_store(&tmp)
        .args(["keys", "set", "deepseek"])
        .write_stdin("sk-from-stdin\n")
        .assert()
        .success();
    let json = json_stdout(cmd_with_store(&tmp).args(["keys", "list", "--json"]));
    assert_eq!(json[2]["configured"], true);

    cmd_with_store(&tmp)
        .args(["keys", "remove", "deepseek"])
        .assert()
        .success();
    let json = json_stdout(cmd_with_store(&tmp).args(["keys", "list", "--json"]));
    assert_eq!(json[2]["configured"], false);
}

#[test]
fn empty_key_is_refused() {
    let tmp = TempDir::new().unwrap();
    cmd_with_store(&tmp)
        .args(["keys", "set", "openai", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty key"));
    assert!(!store_path(&tmp).exists());
}

#[test]
fn models_set_and_reset() {
    let tmp = TempDir::new().unwrap();

    cmd_with_store(&tmp)
        .args(["models", "set", "openai", "gpt-4o"])
        .assert()
        .success();
    let json = json_stdout(cmd_with_store(&tmp).args(["models", "list", "--json"]));
    assert_eq!(json[1]["provider"], "openai");
    assert_eq!(json[1]["model"], "gpt-4o");
    assert_eq!(json[0]["model"], "gemini-1.5-flash");

    cmd_with_store(&tmp)
        .args(["models", "reset", "openai"])
        .assert()
        .success();
    let json = json_stdout(cmd_with_store(&tmp).args(["models", "list", "--json"]));
    assert_eq!(json[1]["model"], "gpt-4o-mini");
}

#[test]
fn settings_set_show_reset() {
    let tmp = TempDir::new().unwrap();

    let json = json_stdout(cmd_with_store(&tmp).args([
        "settings",
        "set",
        "--json",
        "--tone",
        "casual",
        "--provider",
        "deepseek",
        "--count",
        "50",
    ]));
    assert_eq!(json["defaultTone"], "casual");
    assert_eq!(json["defaultProvider"], "deepseek");
    assert_eq!(json["defaultVariationCount"], 10);

    let json = json_stdout(cmd_with_store(&tmp).args(["settings", "show", "--json"]));
    assert_eq!(json["defaultTone"], "casual");

    let json = json_stdout(cmd_with_store(&tmp).args(["settings", "reset", "--json"]));
    assert_eq!(json["defaultTone"], "professional");
    assert_eq!(json["defaultProvider"], "all");
}

#[test]
fn settings_set_requires_a_value() {
    let tmp = TempDir::new().unwrap();
    cmd_with_store(&tmp)
        .args(["settings", "set"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to change"));
}

// =============================================================================
// Provider commands
// =============================================================================

#[test]
fn generate_without_keys_fails() {
    let tmp = TempDir::new().unwrap();
    cmd_with_store(&tmp)
        .args(["generate", "--text", "hello world"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key configured"));
}

#[test]
fn shorten_without_keys_fails() {
    let tmp = TempDir::new().unwrap();
    cmd_with_store(&tmp)
        .args(["shorten", "--text", "hello world"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API keys configured"));
}

#[test]
fn generate_rejects_empty_draft() {
    let tmp = TempDir::new().unwrap();
    cmd_with_store(&tmp)
        .args(["generate", "--text", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to rewrite"));
}

fn chat_completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": text } }]
    }))
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_uses_configured_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("sk-test"))
        .respond_with(chat_completion("  Shipped it. Notes below.  "))
        .expect(2)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let endpoint = format!("{}/v1/chat/completions", server.uri());
    let store = store_path(&tmp);

    let output = tokio::task::spawn_blocking(move || {
        #[allow(deprecated)]
        let mut set = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
        set.env("DRAFTDESK_STORE_PATH", &store)
            .args(["keys", "set", "openai", "sk-test"])
            .assert()
            .success();

        #[allow(deprecated)]
        let mut generate = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
        generate
            .env("DRAFTDESK_STORE_PATH", &store)
            .env("DRAFTDESK_PROVIDERS__OPENAI__ENDPOINT", &endpoint)
            .args(["generate", "--json", "-p", "openai", "-n", "2"])
            .args(["--text", "we shipped"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let variations = json.as_array().unwrap();
    assert_eq!(variations.len(), 2);
    assert_eq!(variations[0]["polished_content"], "Shipped it. Notes below.");
    assert_eq!(variations[0]["provider"], "openai");
    assert_eq!(variations[0]["original_content"], "we shipped");
    assert_eq!(variations[0]["is_over_limit"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn keys_validate_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let store = store_path(&tmp);
    let endpoint = format!("{}/chat", server.uri());

    let output = tokio::task::spawn_blocking(move || {
        #[allow(deprecated)]
        let mut validate = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
        validate
            .env("DRAFTDESK_STORE_PATH", &store)
            .env("DRAFTDESK_PROVIDERS__DEEPSEEK__ENDPOINT", &endpoint)
            .args(["keys", "validate", "deepseek", "sk-bad"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("rejected the key"));
}

use clap::Parser;
use opengpts_client::cli::Args;
use opengpts_client::config::{Config, JsonConfig};
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["opengpts"];
    argv.extend_from_slice(extra);
    argv.push("health");
    Args::parse_from(argv)
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults_without_any_source() {
    let config = Config::from_sources(&args(&[]), env_from(&[]), JsonConfig::default()).unwrap();

    assert_eq!(config.url, "http://localhost:8100");
    assert_eq!(config.request_timeout, 10);
    assert_eq!(config.stream_timeout, 30);
    assert_eq!(config.ingest_timeout, 60);
    assert!(config.user_id.is_none());
    assert!(config.target_assistant_ids.is_none());
    assert!(!config.verbose);
}

#[test]
fn test_cli_beats_env_beats_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("opengpts.yaml");
    fs::write(
        &path,
        "api:\n  url: http://file:8100\n  stream_timeout: 45\nsession:\n  user_id: file-user\n",
    )
    .unwrap();
    let file = JsonConfig::load_from(&path).unwrap();

    let env = env_from(&[
        ("OPENGPTS_URL", "http://env:8100"),
        ("OPENGPTS_USER_ID", "env-user"),
    ]);
    let config = Config::from_sources(&args(&["--url", "http://cli:8100/"]), env, file).unwrap();

    assert_eq!(config.url, "http://cli:8100");
    assert_eq!(config.user_id.as_deref(), Some("env-user"));
    assert_eq!(config.stream_timeout, 45);
}

#[test]
fn test_json_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".opengpts.json");
    fs::write(
        &path,
        r#"{"assistants": {"targets": ["a-1", "a-2"]}, "session": {"verbose": true}}"#,
    )
    .unwrap();

    let file = JsonConfig::load_from(&path).unwrap();
    let config = Config::from_sources(&args(&[]), env_from(&[]), file).unwrap();

    assert_eq!(
        config.target_assistant_ids,
        Some(vec!["a-1".to_string(), "a-2".to_string()])
    );
    assert!(config.verbose);
}

#[test]
fn test_target_assistants_from_env() {
    let env = env_from(&[("TARGET_ASSISTANT_IDS", "a-1, a-2,")]);
    let config = Config::from_sources(&args(&[]), env, JsonConfig::default()).unwrap();
    assert_eq!(
        config.target_assistant_ids,
        Some(vec!["a-1".to_string(), "a-2".to_string()])
    );
}

#[test]
fn test_invalid_values_are_rejected() {
    let env = env_from(&[("OPENGPTS_STREAM_TIMEOUT", "soon")]);
    assert!(Config::from_sources(&args(&[]), env, JsonConfig::default()).is_err());

    assert!(Config::from_sources(
        &args(&["--url", "localhost:8100"]),
        env_from(&[]),
        JsonConfig::default()
    )
    .is_err());
}

#[test]
fn test_broken_config_file_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("opengpts.yml");
    fs::write(&path, "api: [not, a, mapping").unwrap();

    let err = JsonConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("opengpts.yml"));
}

#[test]
fn test_client_config_conversion() {
    let env = env_from(&[("OPENGPTS_REQUEST_TIMEOUT", "3")]);
    let config = Config::from_sources(&args(&["--user-id", "cli-user"]), env, JsonConfig::default())
        .unwrap();

    let client_config = config.client_config(None);
    assert_eq!(client_config.user_id.as_deref(), Some("cli-user"));
    assert_eq!(client_config.request_timeout, Duration::from_secs(3));

    let saved = config.client_config(Some("saved-user".to_string()));
    assert_eq!(saved.user_id.as_deref(), Some("saved-user"));
}

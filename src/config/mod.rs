mod api;
mod defaults;
mod validation;

use crate::api::ClientConfig;
use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use api::ApiConfig;
pub use defaults::default_log_filter;
pub use validation::{parse_flag, parse_id_list, validate_url};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssistantsConfig {
    /// Restrict the assistants offered for chat to these ids.
    #[serde(default)]
    pub targets: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JsonConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub assistants: AssistantsConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub user_id: Option<String>,
    pub request_timeout: u64,
    pub stream_timeout: u64,
    pub ingest_timeout: u64,
    pub target_assistant_ids: Option<Vec<String>>,
    pub verbose: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let json_config = JsonConfig::load()?;
        Self::from_sources(args, |key| env::var(key).ok(), json_config)
    }

    /// Resolve every setting as CLI args > env vars > config file > default.
    pub fn from_sources<F>(args: &Args, env: F, json_config: JsonConfig) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = args
            .url
            .clone()
            .or_else(|| env("OPENGPTS_URL"))
            .or(json_config.api.url)
            .unwrap_or_else(defaults::default_url);
        let url = validate_url(&url).map_err(anyhow::Error::msg)?;

        let user_id = args
            .user_id
            .clone()
            .or_else(|| env("OPENGPTS_USER_ID"))
            .or(json_config.session.user_id)
            .filter(|id| !id.trim().is_empty());

        let seconds = |key: &str, file_value: Option<u64>, default: u64| -> Result<u64> {
            match env(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} must be a number of seconds", key)),
                None => Ok(file_value.unwrap_or(default)),
            }
        };

        let request_timeout = seconds(
            "OPENGPTS_REQUEST_TIMEOUT",
            json_config.api.request_timeout,
            defaults::default_request_timeout(),
        )?;
        let stream_timeout = seconds(
            "OPENGPTS_STREAM_TIMEOUT",
            json_config.api.stream_timeout,
            defaults::default_stream_timeout(),
        )?;
        let ingest_timeout = seconds(
            "OPENGPTS_INGEST_TIMEOUT",
            json_config.api.ingest_timeout,
            defaults::default_ingest_timeout(),
        )?;

        let target_assistant_ids = env("TARGET_ASSISTANT_IDS")
            .map(|ids| parse_id_list(&ids))
            .or(json_config.assistants.targets)
            .filter(|ids| !ids.is_empty());

        let verbose = args.verbose
            || env("OPENGPTS_VERBOSE")
                .map(|v| parse_flag(&v))
                .or(json_config.session.verbose)
                .unwrap_or(false);

        Ok(Config {
            url,
            user_id,
            request_timeout,
            stream_timeout,
            ingest_timeout,
            target_assistant_ids,
            verbose,
        })
    }

    pub fn client_config(&self, user_id: Option<String>) -> ClientConfig {
        ClientConfig {
            base_url: self.url.clone(),
            user_id: user_id.or_else(|| self.user_id.clone()),
            request_timeout: Duration::from_secs(self.request_timeout),
            stream_timeout: Duration::from_secs(self.stream_timeout),
            ingest_timeout: Duration::from_secs(self.ingest_timeout),
        }
    }
}

impl JsonConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(JsonConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        if extension == Some("yaml") || extension == Some("yml") {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
        }
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".opengpts.yaml"),
            PathBuf::from(".opengpts.yml"),
            PathBuf::from(".opengpts.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("opengpts");
            paths.push(config_dir.join("opengpts.yaml"));
            paths.push(config_dir.join("opengpts.yml"));
            paths.push(config_dir.join("opengpts.json"));
        }

        paths
    }
}

/*!
common/src/lib.rs

Shared configuration types for jorfscope.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader with default/override merge
- A helper to split recipient key lists
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feed source configuration section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedConfig {
    /// RSS URL of the Journal Officiel feed
    pub url: Option<String>,
    pub fetch_timeout_seconds: Option<u64>,
}

/// Summarization endpoint configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_url: Option<String>,
    /// Name of the environment variable holding the API key.
    /// The key itself never lives in a config file.
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
}

/// Push relay configuration section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Alertzy send endpoint
    pub url: Option<String>,
    /// Name of the environment variable holding the comma-separated
    /// recipient keys (a single bare key is fine too).
    pub keys_env: Option<String>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub feed: Option<FeedConfig>,
    pub llm: Option<LlmConfig>,
    pub notify: Option<NotifyConfig>,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged key by key (override takes precedence).
    pub async fn load_with_defaults(
        default_path: Option<&Path>,
        override_path: Option<&Path>,
    ) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value =
                    toml::from_str(&data).context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value =
                    toml::from_str(&data).context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value
            .try_into()
            .context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

/// Split a comma-separated recipient key list: entries are trimmed and
/// empty entries dropped. A single key without commas is the one-element case.
pub fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| k.to_string())
        .collect()
}

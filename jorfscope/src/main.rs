/*
jorfscope - single-binary main.rs
One invocation is one best-effort digest run; scheduling is left to cron or a
systemd timer.
*/

use anyhow::{Context, Result};
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use jorfscope::llm::remote::RemoteLlmProvider;
use jorfscope::notify::AlertzyNotifier;
use jorfscope::pipeline;

#[derive(Parser, Debug)]
#[command(
    name = "jorfscope",
    about = "JORF digest bot: fetch, filter, summarize, notify"
)]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Resolve config paths: checked-in defaults plus optional local override
    let default_path = PathBuf::from("config.default.toml");
    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() {
            Some(p)
        } else {
            None
        }
    };

    let config = match Config::load_with_defaults(
        if default_path.exists() {
            Some(&default_path)
        } else {
            None
        },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default = ?default_path, override_file = ?override_path, "configuration loaded");

    // Summarization endpoint, key fetched from the configured env var
    let llm = config.llm.clone().unwrap_or_default();
    let api_key_env = llm.api_key_env.as_deref().unwrap_or("OPENAI_API_KEY");
    let api_key = std::env::var(api_key_env)
        .with_context(|| format!("LLM API key env var '{}' not set", api_key_env))?;
    let api_url = llm
        .api_url
        .clone()
        .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string());
    let model = llm.model.clone().unwrap_or_else(|| "gpt-3.5-turbo".to_string());
    let provider = RemoteLlmProvider::new(api_url, api_key, model).with_defaults(
        llm.timeout_seconds.unwrap_or(30),
        llm.max_tokens.unwrap_or(1000),
        llm.temperature.unwrap_or(0.7),
    );

    // Alertzy recipients: comma-separated list in the configured env var
    let notify = config.notify.clone().unwrap_or_default();
    let keys_env = notify.keys_env.as_deref().unwrap_or("ALERTZY_KEYS");
    let raw_keys = std::env::var(keys_env).unwrap_or_default();
    let keys = common::split_keys(&raw_keys);
    info!("Alertzy keys configured: {} found", keys.len());
    if let Some(first) = keys.first() {
        info!(
            "First key: {}...",
            first.chars().take(10).collect::<String>()
        );
    } else {
        // dispatch will short-circuit; the run still reaches a logged terminal state
        error!("No Alertzy key found in {}", keys_env);
    }
    let relay_url = notify
        .url
        .clone()
        .unwrap_or_else(|| "https://alertzy.app/send".to_string());
    let notifier = AlertzyNotifier::new(relay_url, keys);

    let feed = config.feed.clone().unwrap_or_default();
    let feed_url = feed
        .url
        .clone()
        .unwrap_or_else(|| "https://droit.org/flux/jorf.rss".to_string());
    let fetch_timeout = feed.fetch_timeout_seconds.unwrap_or(10);

    pipeline::run(&feed_url, fetch_timeout, &provider, &notifier).await;

    Ok(())
}

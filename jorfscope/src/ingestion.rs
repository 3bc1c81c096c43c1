use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use feed_rs::model::Feed;
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// A single Journal Officiel feed entry.
///
/// Fields come straight from the feed and may be empty; the JORF feed
/// enforces no uniqueness, so neither do we.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: Option<DateTime<Utc>>,
}

/// Fetches the feed from the given URL and parses it into articles.
/// Enforces a timeout. A non-success status or an unparseable document is a
/// total fetch failure; the caller decides whether the run goes on.
pub async fn fetch_and_parse_feed(url: &str, timeout_secs: u64) -> Result<Vec<Article>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent("jorfscope/0.1.0")
        .build()
        .context("failed to build reqwest client")?;

    info!("Fetching JORF feed from {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .context("network error during fetch")?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("feed fetch failed with status: {}", status);
    }

    let bytes = response.bytes().await.context("failed to read response body")?;
    let feed = parser::parse(bytes.as_ref()).context("failed to parse feed")?;

    let articles = entries_to_articles(feed);
    info!("Feed fetched with {} entries", articles.len());

    // The operator audits filtering decisions from this listing.
    info!("Titles received from the feed:");
    for (i, article) in articles.iter().enumerate() {
        info!("  {}. {}", i + 1, article.title);
    }

    Ok(articles)
}

/// Maps parsed feed entries to articles, keeping feed order.
/// Entries with missing fields are recovered with empty strings rather than
/// dropped; each degraded entry is logged once.
pub fn entries_to_articles(feed: Feed) -> Vec<Article> {
    let mut articles = Vec::with_capacity(feed.entries.len());

    for entry in feed.entries {
        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default();
        let link = entry.links.first().map(|l| l.href.clone()).unwrap_or_default();
        let description = entry
            .summary
            .as_ref()
            .map(|s| s.content.clone())
            .unwrap_or_default();

        if title.is_empty() || link.is_empty() || description.is_empty() {
            warn!(entry_id = %entry.id, "feed entry with missing fields, kept with empty defaults");
        }

        articles.push(Article {
            title,
            link,
            description,
            published: entry.published,
        });
    }

    articles
}

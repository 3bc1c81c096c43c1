use tracing::{error, info};

use crate::digest;
use crate::ingestion;
use crate::llm::LlmProvider;
use crate::notify::AlertzyNotifier;
use crate::relevance;

/// Where a run ended; every run reaches exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Feed could not be fetched or parsed; nothing was dispatched.
    FetchFailed,
    /// Dispatch attempted; `delivered` of `total` notifications went through.
    Dispatched { delivered: usize, total: usize },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Dispatched { delivered, .. } if *delivered > 0)
    }
}

/// One best-effort pass: fetch, filter, summarize, dispatch.
///
/// Each step consumes the previous step's output; nothing is retried and no
/// error escapes as a panic. The returned outcome is also logged here, so the
/// caller can simply exit.
pub async fn run<P: LlmProvider + ?Sized>(
    feed_url: &str,
    fetch_timeout_secs: u64,
    provider: &P,
    notifier: &AlertzyNotifier,
) -> RunOutcome {
    info!("Starting JORF digest run");

    let articles = match ingestion::fetch_and_parse_feed(feed_url, fetch_timeout_secs).await {
        Ok(articles) => articles,
        Err(e) => {
            error!("Could not fetch the JORF feed, aborting the run: {:#}", e);
            return RunOutcome::FetchFailed;
        }
    };

    let relevant = relevance::filter_relevant(articles);

    let message = if relevant.is_empty() {
        digest::NOTHING_RELEVANT_DIGEST.to_string()
    } else {
        digest::build_digest(provider, &relevant).await
    };

    let (delivered, total) = notifier.send_to_all(&message).await;
    let outcome = RunOutcome::Dispatched { delivered, total };

    if outcome.is_success() {
        info!("Run finished: {}/{} notifications delivered", delivered, total);
    } else {
        error!("Run finished without a single delivery");
    }

    outcome
}

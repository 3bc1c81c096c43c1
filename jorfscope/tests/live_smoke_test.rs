//! Manual smoke test against the real feed and completion endpoint.
//!
//! Needs OPENAI_API_KEY in the environment (or a .env file). Ignored by
//! default; run with `cargo test --test live_smoke_test -- --ignored --nocapture`.
//! Deliberately stops before the notification step so nobody gets pinged by a
//! test run.

use jorfscope::digest;
use jorfscope::ingestion;
use jorfscope::llm::remote::RemoteLlmProvider;
use jorfscope::relevance;

#[tokio::test]
#[ignore]
async fn live_fetch_filter_and_summarize() {
    dotenv::dotenv().ok();

    let api_key = match std::env::var("OPENAI_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("OPENAI_API_KEY not set, skipping live smoke test");
            return;
        }
    };

    let articles = ingestion::fetch_and_parse_feed("https://droit.org/flux/jorf.rss", 10)
        .await
        .expect("live feed fetch");
    assert!(!articles.is_empty(), "JORF feed came back empty");

    let relevant = relevance::filter_relevant(articles);
    let provider = RemoteLlmProvider::new(
        "https://api.openai.com/v1/chat/completions",
        api_key,
        "gpt-3.5-turbo",
    );

    let message = if relevant.is_empty() {
        digest::NOTHING_RELEVANT_DIGEST.to_string()
    } else {
        digest::build_digest(&provider, &relevant).await
    };

    println!("--- digest ---\n{message}");
    assert!(message.starts_with(digest::DIGEST_HEADER));
}

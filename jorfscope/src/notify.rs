use anyhow::{Context, Result};
use tracing::{error, info};

/// Title shown on the device for every digest.
const NOTIFICATION_TITLE: &str = "📰 Journal Officiel - Résumé INSP";
const NOTIFICATION_PRIORITY: &str = "normal";

/// Alertzy push relay client.
///
/// One POST per recipient key; deliveries are independent and no failed
/// delivery is retried. A dispatch counts as successful when at least one
/// recipient got the message.
pub struct AlertzyNotifier {
    base_url: String,
    keys: Vec<String>,
    client: reqwest::Client,
}

impl AlertzyNotifier {
    pub fn new(base_url: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            base_url: base_url.into(),
            keys,
            client: reqwest::Client::new(),
        }
    }

    pub fn recipient_count(&self) -> usize {
        self.keys.len()
    }

    /// Sends `message` to every configured key, in order.
    /// Returns `(delivered, total)`; zero configured keys short-circuits to
    /// `(0, 0)` without issuing any request.
    pub async fn send_to_all(&self, message: &str) -> (usize, usize) {
        if self.keys.is_empty() {
            error!("No Alertzy key configured, nothing dispatched");
            return (0, 0);
        }

        let total = self.keys.len();
        let mut delivered = 0;

        for (i, key) in self.keys.iter().enumerate() {
            match self.send_one(key, message).await {
                Ok(()) => {
                    info!("Message sent via Alertzy (recipient {}/{})", i + 1, total);
                    delivered += 1;
                }
                Err(e) => {
                    error!(
                        "Alertzy delivery failed for recipient {}/{}: {}",
                        i + 1,
                        total,
                        e
                    );
                }
            }
        }

        info!("Dispatch finished: {}/{} messages delivered", delivered, total);
        (delivered, total)
    }

    async fn send_one(&self, key: &str, message: &str) -> Result<()> {
        let form = [
            ("accountKey", key),
            ("title", NOTIFICATION_TITLE),
            ("message", message),
            ("priority", NOTIFICATION_PRIORITY),
        ];

        let response = self
            .client
            .post(&self.base_url)
            .form(&form)
            .send()
            .await
            .context("Alertzy HTTP request failed")?;

        // Alertzy signals success with a plain 200
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Alertzy responded {}: {}", status, body);
        }

        Ok(())
    }
}

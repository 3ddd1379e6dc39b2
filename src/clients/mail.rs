use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use crate::config::MailConfig;

/// Outbound mail, one message at a time. Failures bubble up as upstream
/// errors with the provider's message attached; nothing is retried.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// HTTP mail-provider client (Resend-style JSON API).
pub struct HttpMailer {
    http: reqwest::Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let res = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "from": self.config.from_address,
                "to": [to],
                "subject": subject,
                "text": body,
            }))
            .send()
            .await
            .context("mail provider request")?;

        if !res.status().is_success() {
            let status = res.status();
            let detail = res.text().await.unwrap_or_default();
            anyhow::bail!("mail provider returned {}: {}", status, detail);
        }
        Ok(())
    }
}

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use crate::config::AiConfig;

/// Single-prompt text completion against a chat-completions style API.
/// Like mail, this is a thin pass-through: upstream errors are surfaced
/// with their message, never retried or masked.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

pub struct ChatCompletions {
    http: reqwest::Client,
    config: AiConfig,
}

impl ChatCompletions {
    pub fn new(config: AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl CompletionClient for ChatCompletions {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let res = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "model": self.config.model,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await
            .context("completion request")?;

        if !res.status().is_success() {
            let status = res.status();
            let detail = res.text().await.unwrap_or_default();
            anyhow::bail!("completion API returned {}: {}", status, detail);
        }

        let body: serde_json::Value = res.json().await.context("completion response body")?;
        let text = body["choices"][0]["message"]["content"]
            .as_str()
            .context("completion response missing choices[0].message.content")?
            .to_string();
        Ok(text)
    }
}

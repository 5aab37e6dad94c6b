//! OpenAI-compatible remote chat-completions provider.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;

use steward_core::config::LlmConfig;

use crate::llm::{GenerationProvider, GenerationRequest, ProviderError, ProviderReply};

pub struct RemoteChatProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl RemoteChatProvider {
    /// Returns `None` when no API key is configured; the chain then starts
    /// at the local provider.
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .ok()?;
        Some(Self {
            client,
            base_url: config.remote_base_url.trim_end_matches('/').to_string(),
            model: config.remote_model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl GenerationProvider for RemoteChatProvider {
    fn name(&self) -> &str {
        "remote"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<ProviderReply, ProviderError> {
        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_rules},
                {"role": "user", "content": request.prompt},
            ],
        });
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|error| ProviderError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                detail: detail.chars().take(200).collect(),
            });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|error| ProviderError::Malformed(error.to_string()))?;
        let text = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ProviderError::Malformed("missing choices[0].message.content".to_string())
            })?
            .to_string();

        Ok(ProviderReply::Structured { text, raw: payload })
    }
}

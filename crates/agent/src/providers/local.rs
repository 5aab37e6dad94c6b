//! Local Ollama chat provider.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use steward_core::config::LlmConfig;

use crate::llm::{GenerationProvider, GenerationRequest, ProviderError, ProviderReply};

pub struct LocalChatProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl LocalChatProvider {
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.local_base_url.trim_end_matches('/').to_string(),
            model: config.local_model.clone(),
        }
    }
}

#[async_trait]
impl GenerationProvider for LocalChatProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<ProviderReply, ProviderError> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_rules},
                {"role": "user", "content": request.prompt},
            ],
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
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
        let text = payload["message"]["content"]
            .as_str()
            .ok_or_else(|| ProviderError::Malformed("missing message.content".to_string()))?
            .to_string();

        // The local endpoint replies with plain message text; no structure
        // worth keeping.
        Ok(ProviderReply::Text(text))
    }
}

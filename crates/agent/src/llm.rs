//! Generation provider contract.
//!
//! A provider receives a structured request and returns raw text (possibly
//! wrapped in a provider-specific structure). It never decides state, actions
//! or mode, and it must fail with an error rather than return a sentinel.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    Silent,
    Short,
    #[default]
    Normal,
    Debug,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_rules: String,
    pub verbosity: Verbosity,
    pub max_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), ..Self::default() }
    }

    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        self.system_rules = rules.into();
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Replies arrive either as plain text or as a structured payload carrying a
/// text field. The orchestrator normalizes both shapes; callers never branch
/// on provider specifics.
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderReply {
    Text(String),
    Structured { text: String, raw: serde_json::Value },
}

impl ProviderReply {
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Structured { text, .. } => text,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("provider returned status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest)
        -> Result<ProviderReply, ProviderError>;
}

//! Model orchestration: ordered provider fallback behind one voice.
//!
//! Providers are tried strictly in order. A single provider failure is
//! recorded and the next provider is tried; only exhausting the whole list
//! surfaces an error, and that error embeds every underlying failure. The
//! institutional persona block is injected here, at the last boundary before
//! any provider, so swapping providers never changes the assistant's voice
//! or policy disclosures.

use std::sync::Arc;

use thiserror::Error;

use crate::llm::{GenerationProvider, GenerationRequest, ProviderError};

/// Persona and hard rules applied to every generation, on every provider.
pub const SYSTEM_RULES: &str = "You are Steward, a precise and courteous assistant. \
Always answer as Steward. Never mention being a model, a provider, training, \
or internal architecture. Keep answers clear and direct; when sources are \
supplied, reference them after the main answer.";

#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ProviderError,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no generation provider is configured")]
    NoProviders,
    #[error("all generation providers failed: {}", summarize(.0))]
    Exhausted(Vec<ProviderFailure>),
}

fn summarize(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("{}: {}", failure.provider, failure.error))
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct ModelOrchestrator {
    providers: Vec<Arc<dyn GenerationProvider>>,
}

impl ModelOrchestrator {
    pub fn new(providers: Vec<Arc<dyn GenerationProvider>>) -> Self {
        Self { providers }
    }

    pub fn available(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Tries each provider in order and returns the first normalized reply.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        if self.providers.is_empty() {
            return Err(GenerationError::NoProviders);
        }

        let effective = self.with_persona(request);
        let mut failures = Vec::new();

        for provider in &self.providers {
            match provider.generate(&effective).await {
                Ok(reply) => {
                    let text = reply.into_text().trim().to_string();
                    if text.is_empty() {
                        tracing::warn!(provider = provider.name(), "empty reply, trying next");
                        failures.push(ProviderFailure {
                            provider: provider.name().to_string(),
                            error: ProviderError::Malformed("empty reply".to_string()),
                        });
                        continue;
                    }
                    return Ok(text);
                }
                Err(error) => {
                    tracing::warn!(provider = provider.name(), %error, "provider failed, trying next");
                    failures.push(ProviderFailure {
                        provider: provider.name().to_string(),
                        error,
                    });
                }
            }
        }

        Err(GenerationError::Exhausted(failures))
    }

    /// The persona block always leads; request-specific rules follow it.
    fn with_persona(&self, request: &GenerationRequest) -> GenerationRequest {
        let system_rules = if request.system_rules.is_empty() {
            SYSTEM_RULES.to_string()
        } else {
            format!("{SYSTEM_RULES}\n\n{}", request.system_rules)
        };
        GenerationRequest { system_rules, ..request.clone() }
    }
}

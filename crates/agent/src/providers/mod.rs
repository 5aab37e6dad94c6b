//! Concrete generation providers.

pub mod local;
pub mod remote;

pub use local::LocalChatProvider;
pub use remote::RemoteChatProvider;

use std::sync::Arc;

use steward_core::config::LlmConfig;

use crate::llm::GenerationProvider;

/// Builds the default provider chain from configuration: the remote
/// provider first when a key is present, then the local one. Order is what
/// the orchestrator falls back through.
pub fn provider_chain(config: &LlmConfig) -> Vec<Arc<dyn GenerationProvider>> {
    let mut providers: Vec<Arc<dyn GenerationProvider>> = Vec::new();
    if let Some(provider) = RemoteChatProvider::from_config(config) {
        providers.push(Arc::new(provider));
    }
    if config.local_enabled {
        providers.push(Arc::new(LocalChatProvider::from_config(config)));
    }
    providers
}

//! Steward agent — the execution side of the pipeline.
//!
//! This crate consumes the `steward-core` domain and provides:
//! - the model provider contract and the concrete remote/local clients
//! - the orchestrator with ordered provider fallback behind one persona
//! - the executor, which dispatches routed decisions under the action
//!   contract and runs the destructive plan/confirm/commit protocol
//! - capability handlers (web lookup with cache, filesystem family)
//! - the institutional answer renderer and the confirmation port
//!
//! The model is strictly a text generator here. It never decides routing,
//! policy outcomes or mode; those are deterministic decisions made in core.

pub mod capabilities;
pub mod confirm;
pub mod executor;
pub mod llm;
pub mod orchestrator;
pub mod providers;
pub mod render;

pub use capabilities::default_registry;
pub use confirm::{ConfirmationPort, DeclineAll, ScriptedConfirmation};
pub use executor::{ExecuteError, Executor};
pub use llm::{GenerationProvider, GenerationRequest, ProviderError, ProviderReply, Verbosity};
pub use orchestrator::{GenerationError, ModelOrchestrator, ProviderFailure, SYSTEM_RULES};
pub use providers::{provider_chain, LocalChatProvider, RemoteChatProvider};
pub use render::AnswerRenderer;

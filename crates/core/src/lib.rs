//! Steward core: the decision-and-execution domain.
//!
//! Everything here is synchronous and deterministic — classification,
//! policy, routing, the action contract and the local memory subsystem. The
//! asynchronous execution side (model orchestration, capability handlers,
//! the executor itself) lives in `steward-agent` and consumes these types.

pub mod config;
pub mod context;
pub mod contract;
pub mod decision;
pub mod elevated;
pub mod intent;
pub mod memory;
pub mod params;
pub mod policy;
pub mod registry;
pub mod router;

pub use config::{AppConfig, ConfigError, LlmConfig, RuntimeConfig, WebConfig};
pub use context::{ExecutionContext, TurnMemory};
pub use contract::{
    ActionPlan, ActionRequest, ActionResult, ContractViolation, Origin, RiskLevel,
};
pub use decision::{Decision, DecisionOutcome, Dispatch, RoutePath};
pub use elevated::{ElevatedGuard, GuardError};
pub use intent::{is_time_sensitive, Intent, IntentClassifier, IntentKind};
pub use memory::{MemoryError, MemoryKind, MemoryManager, MemoryRecord, MemoryStore};
pub use params::ParamsResolver;
pub use policy::{PolicyDecision, PolicyOutcome};
pub use registry::{
    CapabilityDescriptor, CapabilityHandler, CapabilityRegistry, CapabilityReply,
    RegisteredCapability,
};
pub use router::Router;

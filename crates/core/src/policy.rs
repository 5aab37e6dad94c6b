//! Authorization policy over intents and concrete actions.
//!
//! Both entry points are pure functions of their inputs; they never mutate
//! the execution context and their decisions are produced fresh per call.

use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;
use crate::contract::{ActionRequest, RiskLevel};
use crate::intent::{Intent, IntentKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyOutcome {
    Allow,
    Deny,
    RequireElevated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyDecision {
    pub outcome: PolicyOutcome,
    pub reason: Option<String>,
}

impl PolicyDecision {
    pub fn allow() -> Self {
        Self { outcome: PolicyOutcome::Allow, reason: None }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self { outcome: PolicyOutcome::Deny, reason: Some(reason.into()) }
    }

    pub fn require_elevated(reason: impl Into<String>) -> Self {
        Self { outcome: PolicyOutcome::RequireElevated, reason: Some(reason.into()) }
    }

    pub fn is_allow(&self) -> bool {
        self.outcome == PolicyOutcome::Allow
    }
}

/// Action names that denote a destructive capability, independent of the
/// declared risk level.
const DESTRUCTIVE_ACTION_PREFIXES: &[&str] = &["filesystem.delete"];

/// Gates an intent before routing.
pub fn evaluate_intent(intent: &Intent, context: &ExecutionContext) -> PolicyDecision {
    match intent.kind {
        // Mode switches are always allowed; authentication happens later.
        IntentKind::ElevatedEnter | IntentKind::ElevatedExit => PolicyDecision::allow(),
        IntentKind::WebFetch if context.offline => {
            PolicyDecision::deny("Web lookups are not permitted while offline.")
        }
        IntentKind::Chat | IntentKind::Help if !context.model_available => {
            PolicyDecision::deny("No language model is available for this request.")
        }
        _ => PolicyDecision::allow(),
    }
}

/// Gates a concrete action immediately before handler dispatch.
///
/// High-risk actions, and actions whose name denotes a destructive
/// capability, require elevated mode. The outcome is `RequireElevated`
/// rather than a flat denial: the user can recover by entering elevated
/// mode and repeating the request.
pub fn evaluate_action(request: &ActionRequest, context: &ExecutionContext) -> PolicyDecision {
    let destructive_name = request
        .action_name
        .as_deref()
        .map(|name| DESTRUCTIVE_ACTION_PREFIXES.iter().any(|prefix| name.starts_with(prefix)))
        .unwrap_or(false);

    if (request.risk == RiskLevel::High || destructive_name) && !context.elevated_mode {
        return PolicyDecision::require_elevated(
            "This action is restricted to elevated mode.",
        );
    }

    PolicyDecision::allow()
}

//! The router's routing verdict.

use serde::{Deserialize, Serialize};

use crate::intent::Intent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Allow,
    Deny,
    RequireElevated,
    Offline,
    /// A temporal request needs a web-capable handler and none is
    /// registered. Distinct from `Deny` so the renderer can explain that
    /// live data is required.
    DenyCapabilityRequired,
}

impl DecisionOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Allow)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutePath {
    Llm,
    Capability,
    Local,
}

/// The dispatch payload of an allowed decision, a closed union over the
/// three execution paths.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatch {
    Llm { intent: Intent },
    Capability { intent: Intent, handler_names: Vec<String>, temporal: bool },
    Local { intent: Intent },
}

impl Dispatch {
    pub fn path(&self) -> RoutePath {
        match self {
            Self::Llm { .. } => RoutePath::Llm,
            Self::Capability { .. } => RoutePath::Capability,
            Self::Local { .. } => RoutePath::Local,
        }
    }

    pub fn intent(&self) -> &Intent {
        match self {
            Self::Llm { intent } | Self::Capability { intent, .. } | Self::Local { intent } => {
                intent
            }
        }
    }
}

/// Invariant: `dispatch` is `Some` only when `outcome` is `Allow`; every
/// other outcome is terminal and carries a human-readable reason.
#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub outcome: DecisionOutcome,
    pub dispatch: Option<Dispatch>,
    pub reason: Option<String>,
}

impl Decision {
    /// A terminal decision: no path, always a reason.
    pub fn terminal(outcome: DecisionOutcome, reason: impl Into<String>) -> Self {
        Self { outcome, dispatch: None, reason: Some(reason.into()) }
    }

    pub fn route(dispatch: Dispatch) -> Self {
        Self { outcome: DecisionOutcome::Allow, dispatch: Some(dispatch), reason: None }
    }

    /// An allowed decision with no dispatch path: the operation completed
    /// inside the router itself (elevated-mode exit).
    pub fn acknowledge(reason: impl Into<String>) -> Self {
        Self { outcome: DecisionOutcome::Allow, dispatch: None, reason: Some(reason.into()) }
    }

    pub fn path(&self) -> Option<RoutePath> {
        self.dispatch.as_ref().map(Dispatch::path)
    }
}

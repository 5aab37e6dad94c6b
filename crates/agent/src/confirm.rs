//! Confirmation port for the destructive two-phase protocol.
//!
//! The executor never talks to a terminal directly; selection and
//! confirmation go through this seam. The CLI provides an interactive
//! implementation, tests provide scripted ones.

use steward_core::contract::ActionPlan;

pub trait ConfirmationPort: Send + Sync {
    /// Chooses which plan targets to commit. `None` or an empty selection
    /// aborts the action.
    fn select_targets(&self, plan: &ActionPlan) -> Option<Vec<String>>;

    /// Final yes/no on the rendered preview.
    fn confirm(&self, preview: &str) -> bool;
}

/// Declines everything. The safe default wherever no interactive port is
/// wired in: a destructive plan can then never commit.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeclineAll;

impl ConfirmationPort for DeclineAll {
    fn select_targets(&self, _: &ActionPlan) -> Option<Vec<String>> {
        None
    }

    fn confirm(&self, _: &str) -> bool {
        false
    }
}

/// Scripted port: selects everything and answers with a fixed verdict.
#[derive(Clone, Copy, Debug)]
pub struct ScriptedConfirmation {
    pub approve: bool,
}

impl ConfirmationPort for ScriptedConfirmation {
    fn select_targets(&self, plan: &ActionPlan) -> Option<Vec<String>> {
        Some(plan.targets.clone())
    }

    fn confirm(&self, _: &str) -> bool {
        self.approve
    }
}

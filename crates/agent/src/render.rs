//! Institutional answer rendering.
//!
//! Terminal decisions map 1:1 to short status messages; validated results
//! get the institutional prefix and a hard length cut. Internal exception
//! detail never passes through here.

use steward_core::context::ExecutionContext;
use steward_core::contract::ActionResult;
use steward_core::decision::{Decision, DecisionOutcome};
use steward_core::policy::PolicyDecision;

const NORMAL_CUT: usize = 800;
const ELEVATED_CUT: usize = 250;

#[derive(Clone, Copy, Debug, Default)]
pub struct AnswerRenderer;

impl AnswerRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders a decision that carries no dispatch path.
    pub fn render_terminal(&self, decision: &Decision, context: &ExecutionContext) -> String {
        let reason = decision.reason.as_deref().unwrap_or("request not processed");
        let message = match decision.outcome {
            DecisionOutcome::Allow => reason.to_string(),
            DecisionOutcome::Deny => format!("Request declined: {reason}."),
            DecisionOutcome::RequireElevated => {
                format!("{reason} Elevated mode is required for this request.")
            }
            DecisionOutcome::Offline => {
                "No language model is available right now; please try again later.".to_string()
            }
            DecisionOutcome::DenyCapabilityRequired => {
                "That question needs live data, and no web capability is registered in this \
                 session."
                    .to_string()
            }
        };
        self.wrap(&message, context)
    }

    /// Renders an action refused by the action-level policy gate.
    pub fn render_policy_block(
        &self,
        policy: &PolicyDecision,
        context: &ExecutionContext,
    ) -> String {
        let reason =
            policy.reason.as_deref().unwrap_or("This action is not permitted right now.");
        self.wrap(reason, context)
    }

    pub fn render_result(&self, result: &ActionResult, context: &ExecutionContext) -> String {
        self.wrap(result.text(), context)
    }

    fn wrap(&self, text: &str, context: &ExecutionContext) -> String {
        let prefix =
            if context.model_available { "[Steward]" } else { "[Steward-OFFLINE]" };
        let limit = if context.elevated_mode { ELEVATED_CUT } else { NORMAL_CUT };
        let cut: String = text.trim().chars().take(limit).collect();
        format!("{prefix} {}", cut.trim_end())
    }
}

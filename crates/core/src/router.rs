//! Routing: composes classifier output, policy decisions and registry
//! lookups into a single `Decision`.
//!
//! `route` is a pure function of its inputs apart from one side effect: an
//! elevated-mode exit clears `context.elevated_mode`. Calling it twice with
//! the same text and an unchanged context yields an equal decision.

use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::decision::{Decision, DecisionOutcome, Dispatch};
use crate::intent::{is_time_sensitive, Intent, IntentClassifier, IntentKind};
use crate::policy::{self, PolicyOutcome};
use crate::registry::CapabilityRegistry;

pub struct Router {
    classifier: IntentClassifier,
    registry: Arc<CapabilityRegistry>,
}

impl Router {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { classifier: IntentClassifier::new(), registry }
    }

    pub fn route(&self, text: &str, context: &mut ExecutionContext) -> Decision {
        // Step 1/2: empty input never reaches classification rules.
        let Some(intent) = self.classifier.classify(text) else {
            return Decision::terminal(DecisionOutcome::Deny, "empty input");
        };

        tracing::debug!(kind = intent.kind.label(), "intent classified");

        // Step 3: intent-level policy short-circuits.
        let policy_decision = policy::evaluate_intent(&intent, context);
        match policy_decision.outcome {
            PolicyOutcome::Deny => {
                return Decision::terminal(
                    DecisionOutcome::Deny,
                    policy_decision.reason.unwrap_or_else(|| "intent not permitted".to_string()),
                );
            }
            PolicyOutcome::RequireElevated => {
                return Decision::terminal(
                    DecisionOutcome::RequireElevated,
                    policy_decision
                        .reason
                        .unwrap_or_else(|| "elevated mode required".to_string()),
                );
            }
            PolicyOutcome::Allow => {}
        }

        // Step 4: elevated-mode transitions. Authentication for entering
        // happens outside the router; exiting takes effect here.
        match intent.kind {
            IntentKind::ElevatedEnter => {
                return Decision::terminal(
                    DecisionOutcome::RequireElevated,
                    "Elevated mode requires authentication.",
                );
            }
            IntentKind::ElevatedExit => {
                context.elevated_mode = false;
                return Decision::acknowledge("Elevated mode disabled.");
            }
            _ => {}
        }

        // Step 5: memory operations stay local.
        if matches!(intent.kind, IntentKind::MemoryWrite | IntentKind::MemoryRead) {
            return Decision::route(Dispatch::Local { intent });
        }

        // Step 6: temporal override, consulted before the direct registry
        // match. A time-sensitive request must reach live data or fail with
        // the distinct capability-required outcome.
        if is_time_sensitive(&intent.raw) {
            return self.route_time_sensitive(intent);
        }

        // Step 7: direct capability match by intent kind.
        let handlers = self.registry.find_by_intent(intent.kind);
        if !handlers.is_empty() {
            let handler_names = handlers
                .iter()
                .map(|entry| entry.descriptor.declared_name.clone())
                .collect();
            return Decision::route(Dispatch::Capability { intent, handler_names, temporal: false });
        }

        // Step 8: chat/help fall back to the model.
        if matches!(intent.kind, IntentKind::Chat | IntentKind::Help) {
            if !context.model_available {
                return Decision::terminal(
                    DecisionOutcome::Offline,
                    "Language model unavailable.",
                );
            }
            return Decision::route(Dispatch::Llm { intent });
        }

        // Step 9: nothing matched; name the intent kind in the diagnostic.
        Decision::terminal(
            DecisionOutcome::Deny,
            format!("no route for intent kind: {}", intent.kind.label()),
        )
    }

    fn route_time_sensitive(&self, intent: Intent) -> Decision {
        let web_handlers = self.registry.find_by_intent(IntentKind::WebFetch);
        if web_handlers.is_empty() {
            return Decision::terminal(
                DecisionOutcome::DenyCapabilityRequired,
                "live data required but no web capability is registered",
            );
        }
        let handler_names = web_handlers
            .iter()
            .map(|entry| entry.descriptor.declared_name.clone())
            .collect();
        Decision::route(Dispatch::Capability {
            intent: intent.rewritten_as_web_fetch(),
            handler_names,
            temporal: true,
        })
    }
}

//! The executor: consumes a routing decision and dispatches to exactly one
//! path, enforcing the result contract at every boundary.
//!
//! Terminal decisions render without touching any provider or handler.
//! Allowed decisions dispatch to the local memory manager, the model
//! orchestrator, or the first registered capability handler — with the
//! temporal flag turning a capability result into retrieval context for a
//! second, grounding generation.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use steward_core::context::ExecutionContext;
use steward_core::contract::{
    self, ActionPlan, ActionRequest, ActionResult, ContractViolation, Origin,
};
use steward_core::decision::{Decision, Dispatch};
use steward_core::intent::Intent;
use steward_core::memory::{MemoryError, MemoryManager};
use steward_core::policy;
use steward_core::registry::{CapabilityRegistry, CapabilityReply, RegisteredCapability};

use crate::confirm::ConfirmationPort;
use crate::llm::{GenerationRequest, Verbosity};
use crate::orchestrator::{GenerationError, ModelOrchestrator};
use crate::render::AnswerRenderer;

/// Fixed defaults: the model never self-reports confidence, and local
/// lookups are trusted but not absolute.
const MODEL_CONFIDENCE: f64 = 0.65;
const LOCAL_CONFIDENCE: f64 = 0.9;

const ELEVATED_RULES: &str = "Elevated mode is active: be extremely direct, \
no introductions, no long explanations.";

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("memory failure: {0}")]
    Memory(#[from] MemoryError),
    #[error("no capability handler registered for intent kind {0}")]
    CapabilityUnavailable(&'static str),
    #[error("capability `{name}` failed: {cause}")]
    Capability { name: String, cause: anyhow::Error },
}

pub struct Executor {
    registry: Arc<CapabilityRegistry>,
    orchestrator: ModelOrchestrator,
    memory: Arc<MemoryManager>,
    confirmation: Arc<dyn ConfirmationPort>,
    renderer: AnswerRenderer,
    max_tokens: u32,
}

impl Executor {
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        orchestrator: ModelOrchestrator,
        memory: Arc<MemoryManager>,
        confirmation: Arc<dyn ConfirmationPort>,
        max_tokens: u32,
    ) -> Self {
        Self {
            registry,
            orchestrator,
            memory,
            confirmation,
            renderer: AnswerRenderer::new(),
            max_tokens,
        }
    }

    /// Executes one routed decision for one turn and returns the final,
    /// already-rendered answer text.
    pub async fn execute(
        &self,
        decision: &Decision,
        raw_text: &str,
        context: &mut ExecutionContext,
    ) -> Result<String, ExecuteError> {
        // Nothing from the previous turn may leak into this one.
        context.begin_turn();

        let Some(dispatch) = &decision.dispatch else {
            tracing::debug!(outcome = ?decision.outcome, "terminal decision, no dispatch");
            return Ok(self.renderer.render_terminal(decision, context));
        };

        match dispatch {
            Dispatch::Local { intent } => self.execute_local(intent, context),
            Dispatch::Llm { intent } => self.execute_llm(intent, raw_text, context).await,
            Dispatch::Capability { intent, temporal, .. } => {
                self.execute_capability(intent, *temporal, raw_text, context).await
            }
        }
    }

    fn execute_local(
        &self,
        intent: &Intent,
        context: &mut ExecutionContext,
    ) -> Result<String, ExecuteError> {
        let content = self.memory.execute(intent)?;
        let result = ActionResult::ok(Origin::Local, content).with_confidence(LOCAL_CONFIDENCE);
        contract::validate(&result, Origin::Local)?;
        context.turn.record(result.origin, result.confidence);
        Ok(self.renderer.render_result(&result, context))
    }

    async fn execute_llm(
        &self,
        intent: &Intent,
        raw_text: &str,
        context: &mut ExecutionContext,
    ) -> Result<String, ExecuteError> {
        let request = self.generation_request(raw_text, intent.payload.get("mode"), context);
        let text = self.orchestrator.generate(&request).await?;

        let result = ActionResult::ok(Origin::Model, "generation completed")
            .with_content(text)
            .with_confidence(MODEL_CONFIDENCE);
        contract::validate(&result, Origin::Model)?;
        context.turn.record(result.origin, result.confidence);
        Ok(self.renderer.render_result(&result, context))
    }

    async fn execute_capability(
        &self,
        intent: &Intent,
        temporal: bool,
        raw_text: &str,
        context: &mut ExecutionContext,
    ) -> Result<String, ExecuteError> {
        let entries = self.registry.find_by_intent(intent.kind);
        let Some(entry) = entries.first() else {
            return Err(ExecuteError::CapabilityUnavailable(intent.kind.label()));
        };

        let request = self.build_request(intent, entry);

        // The action-level gate runs before any handler code. A refusal is a
        // normal rendered outcome, not an error.
        let action_policy = policy::evaluate_action(&request, context);
        if !action_policy.is_allow() {
            tracing::info!(
                action = %entry.descriptor.declared_name,
                outcome = ?action_policy.outcome,
                "action blocked by policy"
            );
            return Ok(self.renderer.render_policy_block(&action_policy, context));
        }

        if temporal {
            return self.execute_temporal(entry, &request, raw_text, context).await;
        }

        if entry.descriptor.is_two_phase() {
            return self.execute_two_phase(entry, &request, context).await;
        }

        let result = self.invoke_completed(entry, &request, false).await?;
        contract::validate(&result, entry.descriptor.expected_origin())?;
        context.turn.record(result.origin, result.confidence);
        Ok(self.renderer.render_result(&result, context))
    }

    /// Retrieval-augmented synthesis: the handler result is context, not the
    /// answer. A second generation grounds the reply in it, and the source
    /// list rides along in the final result's data.
    async fn execute_temporal(
        &self,
        entry: &RegisteredCapability,
        request: &ActionRequest,
        raw_text: &str,
        context: &mut ExecutionContext,
    ) -> Result<String, ExecuteError> {
        let retrieved = self.invoke_completed(entry, request, false).await?;
        contract::validate(&retrieved, entry.descriptor.expected_origin())?;

        let result = self.synthesize(raw_text, &retrieved, context).await?;
        contract::validate(&result, Origin::Model)?;
        context.turn.record(result.origin, result.confidence);
        Ok(self.renderer.render_result(&result, context))
    }

    async fn synthesize(
        &self,
        raw_text: &str,
        retrieved: &ActionResult,
        context: &ExecutionContext,
    ) -> Result<ActionResult, ExecuteError> {
        let sources = source_list(retrieved);
        let mut prompt = format!(
            "Question: {raw_text}\nWeb result:\n{}\n",
            retrieved.text()
        );
        if !sources.is_empty() {
            prompt.push_str(&format!("Sources: {}\n", sources.join(", ")));
        }
        prompt.push_str("\nAnswer clearly and precisely based on the material above.");

        let request = self.generation_request(&prompt, None, context);
        let text = self.orchestrator.generate(&request).await?;

        let mut result = ActionResult::ok(Origin::Model, "synthesis completed")
            .with_content(text)
            .with_confidence(retrieved.confidence.unwrap_or(MODEL_CONFIDENCE));
        result = result.with_data(serde_json::json!({ "sources": sources }));
        Ok(result)
    }

    /// Plan, select, preview, confirm, then commit once per target. Any
    /// missing selection or negative confirmation aborts without mutation.
    async fn execute_two_phase(
        &self,
        entry: &RegisteredCapability,
        request: &ActionRequest,
        context: &mut ExecutionContext,
    ) -> Result<String, ExecuteError> {
        let expected = entry.descriptor.expected_origin();
        let reply = self.invoke(entry, request, true).await?;

        let plan = match reply {
            CapabilityReply::Planned(plan) => plan,
            // A destructive handler may complete directly when there is
            // nothing to plan (missing parameter, no match).
            CapabilityReply::Completed(result) => {
                contract::validate(&result, expected)?;
                context.turn.record(result.origin, result.confidence);
                return Ok(self.renderer.render_result(&result, context));
            }
        };

        if plan.targets.is_empty() {
            let result =
                ActionResult::ok(expected, "Nothing matched; no changes were made.");
            context.turn.record(result.origin, result.confidence);
            return Ok(self.renderer.render_result(&result, context));
        }

        let selected = if plan.targets.len() > 1 {
            match self.confirmation.select_targets(&plan) {
                Some(selection) if !selection.is_empty() => selection,
                _ => return Ok(self.render_cancelled(expected, context)),
            }
        } else {
            plan.targets.clone()
        };

        let preview = render_preview(&plan, &selected);
        if !self.confirmation.confirm(&preview) {
            return Ok(self.render_cancelled(expected, context));
        }

        let mut successes = 0usize;
        let mut lines = Vec::with_capacity(selected.len());
        for target in &selected {
            let committed = self.invoke_completed(entry, &request.for_target(target), false).await?;
            contract::validate(&committed, expected)?;
            if committed.succeeded {
                successes += 1;
            }
            lines.push(format!("{target}: {}", committed.message));
        }

        let summary = format!(
            "{}: {successes} of {} target(s) completed.\n{}",
            plan.action_name,
            selected.len(),
            lines.join("\n")
        );
        let mut aggregated = ActionResult::ok(expected, summary);
        aggregated.succeeded = successes == selected.len();
        context.turn.record(aggregated.origin, aggregated.confidence);
        Ok(self.renderer.render_result(&aggregated, context))
    }

    fn render_cancelled(&self, origin: Origin, context: &mut ExecutionContext) -> String {
        let result = ActionResult::ok(origin, "Cancelled by user; no changes were made.");
        context.turn.record(result.origin, result.confidence);
        self.renderer.render_result(&result, context)
    }

    fn build_request(&self, intent: &Intent, entry: &RegisteredCapability) -> ActionRequest {
        let params = if intent.payload.is_empty() {
            let mut params = BTreeMap::new();
            params.insert("query".to_string(), intent.raw.clone());
            params
        } else {
            intent.payload.clone()
        };
        ActionRequest::new(intent.clone(), params)
            .named(entry.descriptor.declared_name.clone())
            .with_risk(entry.descriptor.declared_risk)
    }

    fn generation_request(
        &self,
        prompt: &str,
        mode_hint: Option<&String>,
        context: &ExecutionContext,
    ) -> GenerationRequest {
        let mut request = GenerationRequest::new(prompt).with_max_tokens(self.max_tokens);
        if context.elevated_mode {
            request = request.with_verbosity(Verbosity::Short).with_rules(ELEVATED_RULES);
        }
        if let Some(mode) = mode_hint {
            request.prompt = format!("[{mode}] {}", request.prompt);
        }
        request
    }

    async fn invoke(
        &self,
        entry: &RegisteredCapability,
        request: &ActionRequest,
        dry_run: bool,
    ) -> Result<CapabilityReply, ExecuteError> {
        entry.handler.execute(request, dry_run).await.map_err(|cause| {
            ExecuteError::Capability { name: entry.descriptor.declared_name.clone(), cause }
        })
    }

    /// Invokes a handler on a path where only a finished result is legal.
    async fn invoke_completed(
        &self,
        entry: &RegisteredCapability,
        request: &ActionRequest,
        dry_run: bool,
    ) -> Result<ActionResult, ExecuteError> {
        match self.invoke(entry, request, dry_run).await? {
            CapabilityReply::Completed(result) => Ok(result),
            CapabilityReply::Planned(_) => Err(ContractViolation::UnexpectedPlan.into()),
        }
    }
}

fn source_list(result: &ActionResult) -> Vec<String> {
    result
        .data
        .as_ref()
        .and_then(|data| data.get("sources"))
        .and_then(|sources| sources.as_array())
        .map(|sources| {
            sources.iter().filter_map(|s| s.as_str().map(str::to_string)).collect()
        })
        .unwrap_or_default()
}

fn render_preview(plan: &ActionPlan, selected: &[String]) -> String {
    let mut preview = plan.description.clone();
    preview.push('\n');
    for target in selected {
        preview.push_str(&format!("- {target}\n"));
    }
    preview
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use anyhow::Result;
    use async_trait::async_trait;
    use tempfile::tempdir;

    use steward_core::context::ExecutionContext;
    use steward_core::contract::{ActionPlan, ActionRequest, ActionResult, Origin, RiskLevel};
    use steward_core::decision::{Decision, DecisionOutcome, Dispatch};
    use steward_core::intent::{Intent, IntentKind};
    use steward_core::memory::{MemoryManager, MemoryStore};
    use steward_core::registry::{
        CapabilityDescriptor, CapabilityHandler, CapabilityRegistry, CapabilityReply,
    };

    use super::{ExecuteError, Executor};
    use crate::confirm::{ConfirmationPort, ScriptedConfirmation};
    use crate::llm::{GenerationProvider, GenerationRequest, ProviderError, ProviderReply};
    use crate::orchestrator::ModelOrchestrator;

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0) })
        }

        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<ProviderReply, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProviderReply::Text(format!("echo: {}", request.prompt)))
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Behavior {
        Complete(ActionResult),
        Plan { plan: ActionPlan, commit: ActionResult },
        /// Misbehaving handler: answers with a plan even when committed.
        AlwaysPlan(ActionPlan),
    }

    struct FakeCapability {
        descriptor: CapabilityDescriptor,
        behavior: Behavior,
        calls: Mutex<Vec<(bool, Option<String>)>>,
    }

    impl FakeCapability {
        fn arc(descriptor: CapabilityDescriptor, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self { descriptor, behavior, calls: Mutex::new(Vec::new()) })
        }

        fn commit_calls(&self) -> usize {
            self.calls.lock().unwrap().iter().filter(|(dry_run, _)| !dry_run).count()
        }

        fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CapabilityHandler for FakeCapability {
        fn descriptor(&self) -> &CapabilityDescriptor {
            &self.descriptor
        }

        async fn execute(
            &self,
            request: &ActionRequest,
            dry_run: bool,
        ) -> Result<CapabilityReply> {
            self.calls
                .lock()
                .unwrap()
                .push((dry_run, request.param("target").map(str::to_string)));
            Ok(match &self.behavior {
                Behavior::Complete(result) => CapabilityReply::Completed(result.clone()),
                Behavior::Plan { plan, commit } => {
                    if dry_run {
                        CapabilityReply::Planned(plan.clone())
                    } else {
                        CapabilityReply::Completed(commit.clone())
                    }
                }
                Behavior::AlwaysPlan(plan) => CapabilityReply::Planned(plan.clone()),
            })
        }
    }

    struct Fixture {
        executor: Executor,
        provider: Arc<CountingProvider>,
        _memory_dir: tempfile::TempDir,
    }

    fn fixture_with(
        handlers: Vec<Arc<FakeCapability>>,
        confirmation: Arc<dyn ConfirmationPort>,
    ) -> Fixture {
        let mut registry = CapabilityRegistry::new();
        for handler in handlers {
            registry.register(handler);
        }
        let provider = CountingProvider::new();
        let orchestrator = ModelOrchestrator::new(vec![provider.clone()]);
        let memory_dir = tempdir().unwrap();
        let memory = Arc::new(MemoryManager::new(
            MemoryStore::open(memory_dir.path().join("memory.json")).unwrap(),
        ));
        Fixture {
            executor: Executor::new(Arc::new(registry), orchestrator, memory, confirmation, 300),
            provider,
            _memory_dir: memory_dir,
        }
    }

    fn fixture(handlers: Vec<Arc<FakeCapability>>) -> Fixture {
        fixture_with(handlers, Arc::new(ScriptedConfirmation { approve: true }))
    }

    fn web_result() -> ActionResult {
        ActionResult::ok(Origin::Web, "web lookup completed")
            .with_content("the rate is 5.43")
            .with_confidence(0.8)
            .with_data(serde_json::json!({"sources": ["https://example.org/rates"]}))
    }

    #[tokio::test]
    async fn terminal_decisions_invoke_neither_provider_nor_handler() {
        let handler = FakeCapability::arc(
            CapabilityDescriptor::new(IntentKind::ContentRead, "filesystem.read"),
            Behavior::Complete(ActionResult::ok(Origin::Capability, "read")),
        );
        let fixture = fixture(vec![handler.clone()]);
        let mut context = ExecutionContext::new(false, true);

        let decision = Decision::terminal(DecisionOutcome::Deny, "empty input");
        let text = fixture.executor.execute(&decision, "", &mut context).await.unwrap();

        assert!(text.contains("Request declined"));
        assert_eq!(fixture.provider.count(), 0);
        assert_eq!(handler.total_calls(), 0);
    }

    #[tokio::test]
    async fn llm_path_records_model_origin_and_fixed_confidence() {
        let fixture = fixture(Vec::new());
        let mut context = ExecutionContext::new(false, true);
        let decision = Decision::route(Dispatch::Llm {
            intent: Intent::new(IntentKind::Chat, "tell me about otters"),
        });

        let text =
            fixture.executor.execute(&decision, "tell me about otters", &mut context).await.unwrap();

        assert!(text.starts_with("[Steward] echo:"));
        assert_eq!(context.turn.origin, Some(Origin::Model));
        assert_eq!(context.turn.confidence, Some(0.65));
    }

    #[tokio::test]
    async fn local_path_wraps_memory_output() {
        let fixture = fixture(Vec::new());
        let mut context = ExecutionContext::new(false, true);
        let raw = "remember that my name is Ana";
        let decision =
            Decision::route(Dispatch::Local { intent: Intent::new(IntentKind::MemoryWrite, raw) });

        let text = fixture.executor.execute(&decision, raw, &mut context).await.unwrap();

        assert!(text.contains("Noted"));
        assert_eq!(context.turn.origin, Some(Origin::Local));
        assert_eq!(context.turn.confidence, Some(0.9));
        assert_eq!(fixture.provider.count(), 0);
    }

    #[tokio::test]
    async fn temporal_dispatch_synthesizes_and_keeps_sources() {
        let handler = FakeCapability::arc(
            CapabilityDescriptor::new(IntentKind::WebFetch, "web.lookup").web_backed(),
            Behavior::Complete(web_result()),
        );
        let fixture = fixture(vec![handler.clone()]);
        let mut context = ExecutionContext::new(false, true);
        let raw = "search today's dollar exchange rate";
        let decision = Decision::route(Dispatch::Capability {
            intent: Intent::new(IntentKind::WebFetch, raw).rewritten_as_web_fetch(),
            handler_names: vec!["web.lookup".to_string()],
            temporal: true,
        });

        let text = fixture.executor.execute(&decision, raw, &mut context).await.unwrap();

        assert!(text.contains("echo:"));
        assert_eq!(context.turn.origin, Some(Origin::Model));
        assert_eq!(fixture.provider.count(), 1);
        assert_eq!(handler.total_calls(), 1);
    }

    #[tokio::test]
    async fn synthesis_result_carries_web_sources_forward() {
        let fixture = fixture(Vec::new());
        let context = ExecutionContext::new(false, true);
        let result = fixture
            .executor
            .synthesize("what is the rate?", &web_result(), &context)
            .await
            .unwrap();

        assert_eq!(result.origin, Origin::Model);
        assert_eq!(result.confidence, Some(0.8));
        let sources = result.data.unwrap()["sources"].clone();
        assert_eq!(sources, serde_json::json!(["https://example.org/rates"]));
    }

    #[tokio::test]
    async fn direct_capability_with_wrong_origin_is_a_contract_violation() {
        let handler = FakeCapability::arc(
            CapabilityDescriptor::new(IntentKind::ContentRead, "filesystem.read"),
            Behavior::Complete(ActionResult::ok(Origin::Web, "from the wrong place")),
        );
        let fixture = fixture(vec![handler]);
        let mut context = ExecutionContext::new(false, true);
        let decision = Decision::route(Dispatch::Capability {
            intent: Intent::new(IntentKind::ContentRead, "open notes.txt"),
            handler_names: vec!["filesystem.read".to_string()],
            temporal: false,
        });

        let error =
            fixture.executor.execute(&decision, "open notes.txt", &mut context).await.unwrap_err();
        assert!(matches!(error, ExecuteError::Contract(_)));
    }

    fn delete_fixture(confirmation: Arc<dyn ConfirmationPort>) -> (Fixture, Arc<FakeCapability>) {
        let handler = FakeCapability::arc(
            CapabilityDescriptor::new(IntentKind::ContentDelete, "filesystem.delete")
                .with_risk(RiskLevel::High)
                .destructive(),
            Behavior::Plan {
                plan: ActionPlan {
                    action_name: "filesystem.delete".to_string(),
                    targets: vec!["a.txt".to_string(), "b.txt".to_string()],
                    destructive: true,
                    description: "Delete the following files:".to_string(),
                },
                commit: ActionResult::ok(Origin::Capability, "deleted"),
            },
        );
        (fixture_with(vec![handler.clone()], confirmation), handler)
    }

    fn delete_decision() -> Decision {
        Decision::route(Dispatch::Capability {
            intent: Intent::new(IntentKind::ContentDelete, "delete the reports"),
            handler_names: vec!["filesystem.delete".to_string()],
            temporal: false,
        })
    }

    #[tokio::test]
    async fn high_risk_action_without_elevated_mode_never_reaches_the_handler() {
        let (fixture, handler) =
            delete_fixture(Arc::new(ScriptedConfirmation { approve: true }));
        let mut context = ExecutionContext::new(false, true);

        let text = fixture
            .executor
            .execute(&delete_decision(), "delete the reports", &mut context)
            .await
            .unwrap();

        assert!(text.contains("restricted to elevated mode"));
        assert_eq!(handler.total_calls(), 0);
    }

    #[tokio::test]
    async fn declined_confirmation_cancels_without_mutation() {
        let (fixture, handler) =
            delete_fixture(Arc::new(ScriptedConfirmation { approve: false }));
        let mut context = ExecutionContext::new(false, true);
        context.elevated_mode = true;

        let text = fixture
            .executor
            .execute(&delete_decision(), "delete the reports", &mut context)
            .await
            .unwrap();

        assert!(text.contains("Cancelled by user"));
        assert_eq!(handler.commit_calls(), 0);
        // The plan phase did run.
        assert_eq!(handler.total_calls(), 1);
    }

    #[tokio::test]
    async fn confirmed_plan_commits_once_per_selected_target() {
        let (fixture, handler) =
            delete_fixture(Arc::new(ScriptedConfirmation { approve: true }));
        let mut context = ExecutionContext::new(false, true);
        context.elevated_mode = true;

        let text = fixture
            .executor
            .execute(&delete_decision(), "delete the reports", &mut context)
            .await
            .unwrap();

        assert!(text.contains("2 of 2 target(s) completed"));
        assert_eq!(handler.commit_calls(), 2);
        let calls = handler.calls.lock().unwrap().clone();
        assert_eq!(calls[1].1.as_deref(), Some("a.txt"));
        assert_eq!(calls[2].1.as_deref(), Some("b.txt"));
    }

    #[tokio::test]
    async fn plan_on_a_direct_path_is_a_contract_violation() {
        let handler = FakeCapability::arc(
            // Not marked destructive, yet the handler answers with a plan.
            CapabilityDescriptor::new(IntentKind::ContentRead, "filesystem.read"),
            Behavior::AlwaysPlan(ActionPlan {
                action_name: "filesystem.read".to_string(),
                targets: vec!["a.txt".to_string()],
                destructive: false,
                description: String::new(),
            }),
        );
        let fixture = fixture(vec![handler]);
        let mut context = ExecutionContext::new(false, true);
        let decision = Decision::route(Dispatch::Capability {
            intent: Intent::new(IntentKind::ContentRead, "open a.txt"),
            handler_names: vec!["filesystem.read".to_string()],
            temporal: false,
        });

        let error =
            fixture.executor.execute(&decision, "open a.txt", &mut context).await.unwrap_err();
        assert!(matches!(
            error,
            ExecuteError::Contract(steward_core::contract::ContractViolation::UnexpectedPlan)
        ));
    }

    #[tokio::test]
    async fn unregistered_capability_is_an_execute_error() {
        let fixture = fixture(Vec::new());
        let mut context = ExecutionContext::new(false, true);
        let decision = Decision::route(Dispatch::Capability {
            intent: Intent::new(IntentKind::ContentRead, "open a.txt"),
            handler_names: Vec::new(),
            temporal: false,
        });

        let error =
            fixture.executor.execute(&decision, "open a.txt", &mut context).await.unwrap_err();
        assert!(matches!(error, ExecuteError::CapabilityUnavailable(_)));
    }

    #[tokio::test]
    async fn turn_memory_is_cleared_on_entry() {
        let fixture = fixture(Vec::new());
        let mut context = ExecutionContext::new(false, true);
        context.turn.record(Origin::Web, Some(0.4));

        let decision = Decision::terminal(DecisionOutcome::Deny, "empty input");
        fixture.executor.execute(&decision, "", &mut context).await.unwrap();

        assert_eq!(context.turn.origin, None);
        assert_eq!(context.turn.confidence, None);
    }
}

//! Capability registry: a write-once lookup from intent kind to an ordered
//! list of capability handlers.
//!
//! The registry is built during startup registration, then wrapped in an
//! `Arc` and injected into the router and executor. Nothing mutates it after
//! construction, so no synchronization is needed.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::contract::{ActionPlan, ActionRequest, ActionResult, Origin, RiskLevel};
use crate::intent::IntentKind;

/// What a capability handler hands back: a finished result, or — only when
/// called in dry-run mode by a destructive capability — a plan to confirm.
#[derive(Clone, Debug, PartialEq)]
pub enum CapabilityReply {
    Completed(ActionResult),
    Planned(ActionPlan),
}

/// Static description of a capability, registered once at startup and
/// read-only thereafter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapabilityDescriptor {
    pub intent_kind: IntentKind,
    pub declared_name: String,
    pub declared_risk: RiskLevel,
    /// Whether results originate from the web rather than a local side
    /// effect; decides the origin the contract expects.
    pub web_backed: bool,
    pub supports_dry_run: bool,
    pub requires_confirmation: bool,
}

impl CapabilityDescriptor {
    pub fn new(intent_kind: IntentKind, declared_name: impl Into<String>) -> Self {
        Self {
            intent_kind,
            declared_name: declared_name.into(),
            declared_risk: RiskLevel::Low,
            web_backed: false,
            supports_dry_run: false,
            requires_confirmation: false,
        }
    }

    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.declared_risk = risk;
        self
    }

    pub fn web_backed(mut self) -> Self {
        self.web_backed = true;
        self
    }

    /// Marks the capability destructive: plan first, confirm, then commit.
    pub fn destructive(mut self) -> Self {
        self.supports_dry_run = true;
        self.requires_confirmation = true;
        self
    }

    pub fn expected_origin(&self) -> Origin {
        if self.web_backed {
            Origin::Web
        } else {
            Origin::Capability
        }
    }

    pub fn is_two_phase(&self) -> bool {
        self.supports_dry_run && self.requires_confirmation
    }
}

#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    fn descriptor(&self) -> &CapabilityDescriptor;

    /// Executes the action. Destructive handlers return a plan when
    /// `dry_run` is set and commit a single target otherwise.
    async fn execute(&self, request: &ActionRequest, dry_run: bool) -> Result<CapabilityReply>;
}

#[derive(Clone)]
pub struct RegisteredCapability {
    pub descriptor: CapabilityDescriptor,
    pub handler: Arc<dyn CapabilityHandler>,
}

#[derive(Default)]
pub struct CapabilityRegistry {
    entries: HashMap<IntentKind, Vec<RegisteredCapability>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its declared intent kind. Registration
    /// order is preserved: the first registered handler for a kind is the
    /// one the executor dispatches.
    pub fn register(&mut self, handler: Arc<dyn CapabilityHandler>) {
        let descriptor = handler.descriptor().clone();
        tracing::debug!(
            intent = descriptor.intent_kind.label(),
            name = %descriptor.declared_name,
            "capability registered"
        );
        self.entries
            .entry(descriptor.intent_kind)
            .or_default()
            .push(RegisteredCapability { descriptor, handler });
    }

    /// Ordered handler list for an intent kind; empty when none registered.
    pub fn find_by_intent(&self, kind: IntentKind) -> &[RegisteredCapability] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_web_capability(&self) -> bool {
        !self.find_by_intent(IntentKind::WebFetch).is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

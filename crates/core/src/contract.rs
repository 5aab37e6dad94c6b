//! The action contract: what the executor hands to a capability handler and
//! what it demands back, plus the validation applied at every dispatch
//! boundary.
//!
//! Contract violations are programming defects, never recoverable business
//! errors; they carry the name of the offending field and propagate to the
//! top-level loop.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intent::Intent;

/// Closed origin set of the response contract. Every dispatch path expects a
/// specific origin and mismatches are rejected, never coerced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Model,
    Web,
    Capability,
    Local,
    Fallback,
    Memory,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Model => "model",
            Self::Web => "web",
            Self::Capability => "capability",
            Self::Local => "local",
            Self::Fallback => "fallback",
            Self::Memory => "memory",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Built by the executor immediately before dispatching to a capability
/// handler. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRequest {
    pub intent: Intent,
    pub params: BTreeMap<String, String>,
    pub action_name: Option<String>,
    pub risk: RiskLevel,
    pub metadata: BTreeMap<String, String>,
}

impl ActionRequest {
    pub fn new(intent: Intent, params: BTreeMap<String, String>) -> Self {
        Self { intent, params, action_name: None, risk: RiskLevel::Low, metadata: BTreeMap::new() }
    }

    pub fn named(mut self, action_name: impl Into<String>) -> Self {
        self.action_name = Some(action_name.into());
        self
    }

    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.risk = risk;
        self
    }

    /// Narrows the request to a single committed target of a confirmed plan.
    pub fn for_target(&self, target: &str) -> Self {
        let mut params = self.params.clone();
        params.insert("target".to_string(), target.to_string());
        Self { params, ..self.clone() }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// The validated outcome of any dispatch path.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionResult {
    pub succeeded: bool,
    pub message: String,
    pub content: Option<String>,
    pub origin: Origin,
    pub confidence: Option<f64>,
    pub data: Option<serde_json::Value>,
}

impl ActionResult {
    pub fn ok(origin: Origin, message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
            content: None,
            origin,
            confidence: None,
            data: None,
        }
    }

    pub fn failed(origin: Origin, message: impl Into<String>) -> Self {
        Self { succeeded: false, ..Self::ok(origin, message) }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The text a renderer should prefer: content when present, otherwise
    /// the status message.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or(&self.message)
    }
}

/// Returned instead of an `ActionResult` when a destructive capability is
/// called in plan (dry-run) mode.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionPlan {
    pub action_name: String,
    pub targets: Vec<String>,
    pub destructive: bool,
    /// Kind-specific preview (delete listing, move source→destination,
    /// write diff), rendered verbatim to the user before confirmation.
    pub description: String,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ContractViolation {
    #[error("field `origin` mismatch: expected {expected}, got {actual}")]
    OriginMismatch { expected: Origin, actual: Origin },
    #[error("field `confidence` out of range: {0}")]
    ConfidenceOutOfRange(f64),
    #[error("field `{0}` must carry text")]
    MissingText(&'static str),
    #[error("dispatch path expected an action result, handler returned a plan")]
    UnexpectedPlan,
    #[error("destructive dry-run expected a plan, handler returned a result")]
    MissingPlan,
}

/// Validates a result against the origin expected for the path that produced
/// it. Applied after every dispatch, regardless of path.
pub fn validate(result: &ActionResult, expected: Origin) -> Result<(), ContractViolation> {
    if result.origin != expected {
        return Err(ContractViolation::OriginMismatch { expected, actual: result.origin });
    }
    if result.message.trim().is_empty() && result.content.as_deref().unwrap_or("").trim().is_empty()
    {
        return Err(ContractViolation::MissingText("message"));
    }
    if let Some(confidence) = result.confidence {
        if !(0.0..=1.0).contains(&confidence) || confidence.is_nan() {
            return Err(ContractViolation::ConfidenceOutOfRange(confidence));
        }
    }
    Ok(())
}

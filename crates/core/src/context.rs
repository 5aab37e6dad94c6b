//! Session-scoped execution state and the turn-scoped scratch memory.

use std::collections::BTreeSet;

use crate::contract::Origin;

/// Transient per-turn fields. Cleared at the start of every turn so nothing
/// leaks from one utterance to the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnMemory {
    pub origin: Option<Origin>,
    pub confidence: Option<f64>,
}

impl TurnMemory {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn record(&mut self, origin: Origin, confidence: Option<f64>) {
        self.origin = Some(origin);
        self.confidence = confidence;
    }
}

/// Process/session-scoped state. Created once at startup; `elevated_mode` is
/// the only field mutated mid-session, and only by the enter/exit operations
/// inside the single active turn.
#[derive(Clone, Debug, Default)]
pub struct ExecutionContext {
    pub elevated_mode: bool,
    pub offline: bool,
    pub model_available: bool,
    pub permissions: BTreeSet<String>,
    pub turn: TurnMemory,
}

impl ExecutionContext {
    pub fn new(offline: bool, model_available: bool) -> Self {
        Self {
            elevated_mode: false,
            offline,
            model_available,
            permissions: BTreeSet::new(),
            turn: TurnMemory::default(),
        }
    }

    pub fn grant(&mut self, permission: impl Into<String>) {
        self.permissions.insert(permission.into());
    }

    pub fn revoke(&mut self, permission: &str) {
        self.permissions.remove(permission);
    }

    pub fn has(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Begins a new turn: wipes every turn-scoped field.
    pub fn begin_turn(&mut self) {
        self.turn.clear();
    }
}

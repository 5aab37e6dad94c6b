//! Intent taxonomy and the ordered lexical classifier.
//!
//! Classification is deterministic: an ordered list of lexical rules is
//! applied to the normalized input and the first match wins. There is no
//! scoring, no model call, and no state between turns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::params::ParamsResolver;

/// Closed intent taxonomy. Routing dispatches over this enum exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    ElevatedEnter,
    ElevatedExit,
    MemoryWrite,
    MemoryRead,
    WebFetch,
    ContentCreate,
    ContentRead,
    ContentModify,
    ContentDelete,
    ContentMove,
    Help,
    Chat,
    Unknown,
}

impl IntentKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ElevatedEnter => "elevated_enter",
            Self::ElevatedExit => "elevated_exit",
            Self::MemoryWrite => "memory_write",
            Self::MemoryRead => "memory_read",
            Self::WebFetch => "web_fetch",
            Self::ContentCreate => "content_create",
            Self::ContentRead => "content_read",
            Self::ContentModify => "content_modify",
            Self::ContentDelete => "content_delete",
            Self::ContentMove => "content_move",
            Self::Help => "help",
            Self::Chat => "chat",
            Self::Unknown => "unknown",
        }
    }
}

/// The classified purpose of one user utterance. Immutable once produced;
/// lives for the duration of a single turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub raw: String,
    pub payload: BTreeMap<String, String>,
}

impl Intent {
    pub fn new(kind: IntentKind, raw: impl Into<String>) -> Self {
        Self { kind, raw: raw.into(), payload: BTreeMap::new() }
    }

    pub fn with_payload(
        kind: IntentKind,
        raw: impl Into<String>,
        payload: BTreeMap<String, String>,
    ) -> Self {
        Self { kind, raw: raw.into(), payload }
    }

    /// Rewrites the intent toward a web fetch while keeping the raw text.
    /// Used by the router's temporal override.
    pub fn rewritten_as_web_fetch(&self) -> Self {
        let mut payload = self.payload.clone();
        payload.insert("query".to_string(), self.raw.clone());
        Self { kind: IntentKind::WebFetch, raw: self.raw.clone(), payload }
    }
}

const ELEVATED_ENTER_PHRASES: &[&str] =
    &["enter elevated mode", "elevated enter", "@elevated"];
const ELEVATED_EXIT_PHRASES: &[&str] =
    &["exit elevated mode", "leave elevated mode", "elevated exit"];

const MEMORY_WRITE_VERBS: &[&str] = &["save", "remember", "record", "memorize", "note"];
const MEMORY_READ_PHRASES: &[&str] = &[
    "what do you remember",
    "what is my name",
    "show my memory",
    "what did i ask",
    "what do you know about me",
];

const WEB_VERBS: &[&str] = &["search", "google", "browse", "lookup"];
const WEB_PHRASES: &[&str] = &["look up", "look for"];

const TIME_TOKENS: &[&str] = &["now", "today", "tonight", "currently"];
const TIME_PHRASES: &[&str] =
    &["right now", "current price", "latest news", "this morning", "at the moment"];

const CREATE_VERBS: &[&str] = &["create", "generate", "new"];
const READ_VERBS: &[&str] = &["read", "open", "show", "view", "display"];
const MODIFY_VERBS: &[&str] = &["edit", "modify", "update", "append"];
const DELETE_VERBS: &[&str] = &["delete", "remove", "erase"];
const MOVE_VERBS: &[&str] = &["move", "relocate", "rename"];

const HELP_PREFIXES: &[&str] = &["help", "how do i", "how to", "what can you do", "what is"];

/// Word-count threshold above which unmatched input is treated as open-ended
/// chat rather than unknown.
const CHAT_WORD_THRESHOLD: usize = 3;

#[derive(Clone, Debug, Default)]
pub struct IntentClassifier {
    params: ParamsResolver,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps raw text to an intent. Returns `None` only for empty or
    /// whitespace input; every other input classifies to something, even if
    /// that something is `Unknown`.
    pub fn classify(&self, text: &str) -> Option<Intent> {
        let raw = text.trim();
        if raw.is_empty() {
            return None;
        }

        let normalized = raw.to_lowercase();
        let tokens = tokenize(&normalized);

        // Rule 1: elevated-mode enter/exit. Highest priority so that later
        // content-verb rules can never shadow a mode switch.
        if contains_any_phrase(&normalized, ELEVATED_ENTER_PHRASES) {
            return Some(Intent::new(IntentKind::ElevatedEnter, raw));
        }
        if contains_any_phrase(&normalized, ELEVATED_EXIT_PHRASES) {
            return Some(Intent::new(IntentKind::ElevatedExit, raw));
        }

        // Rules 2 and 3: memory triggers. Read phrases are checked first
        // because "what do you remember" contains the write verb "remember";
        // a recall question must never be mistaken for a write.
        if contains_any_phrase(&normalized, MEMORY_READ_PHRASES) {
            return Some(Intent::new(IntentKind::MemoryRead, raw));
        }
        if contains_any_token(&tokens, MEMORY_WRITE_VERBS) {
            return Some(Intent::new(IntentKind::MemoryWrite, raw));
        }

        // Rule 4: explicit web/search verbs.
        if contains_any_token(&tokens, WEB_VERBS) || contains_any_phrase(&normalized, WEB_PHRASES)
        {
            return Some(self.web_intent(raw));
        }

        // Rule 5: lexical time-sensitivity markers. Captured before the
        // generic content/chat rules so a chat-shaped sentence with a
        // temporal marker still reaches the web path.
        if contains_any_token(&tokens, TIME_TOKENS)
            || contains_any_phrase(&normalized, TIME_PHRASES)
        {
            return Some(self.web_intent(raw));
        }

        // Rule 6: content CRUD verbs, whole tokens only ("review" must not
        // match "view").
        if let Some(kind) = self.content_kind(&tokens) {
            let payload = self.params.resolve(kind, raw);
            return Some(Intent::with_payload(kind, raw, payload));
        }

        // Rule 7: help-trigger prefixes.
        if HELP_PREFIXES.iter().any(|prefix| normalized.starts_with(prefix)) {
            return Some(Intent::new(IntentKind::Help, raw));
        }

        // Rule 8: question mark or enough words -> open-ended chat.
        if raw.contains('?') || tokens.len() > CHAT_WORD_THRESHOLD {
            return Some(Intent::new(IntentKind::Chat, raw));
        }

        Some(Intent::new(IntentKind::Unknown, raw))
    }

    fn web_intent(&self, raw: &str) -> Intent {
        let mut payload = BTreeMap::new();
        payload.insert("query".to_string(), raw.to_string());
        Intent::with_payload(IntentKind::WebFetch, raw, payload)
    }

    fn content_kind(&self, tokens: &[String]) -> Option<IntentKind> {
        if contains_any_token(tokens, CREATE_VERBS) {
            return Some(IntentKind::ContentCreate);
        }
        if contains_any_token(tokens, MODIFY_VERBS) {
            return Some(IntentKind::ContentModify);
        }
        if contains_any_token(tokens, DELETE_VERBS) {
            return Some(IntentKind::ContentDelete);
        }
        if contains_any_token(tokens, MOVE_VERBS) {
            return Some(IntentKind::ContentMove);
        }
        if contains_any_token(tokens, READ_VERBS) {
            return Some(IntentKind::ContentRead);
        }
        None
    }
}

/// Lexical time-sensitivity check shared with the router's temporal
/// override. Operates on raw text so a sentence classified as chat or
/// content can still be recognized as needing live data.
pub fn is_time_sensitive(text: &str) -> bool {
    let normalized = text.to_lowercase();
    let tokens = tokenize(&normalized);
    contains_any_token(&tokens, TIME_TOKENS) || contains_any_phrase(&normalized, TIME_PHRASES)
}

fn tokenize(normalized: &str) -> Vec<String> {
    let mut sanitized = String::with_capacity(normalized.len());
    for character in normalized.chars() {
        if character.is_alphanumeric() {
            sanitized.push(character);
        } else {
            sanitized.push(' ');
        }
    }
    sanitized.split_whitespace().map(|token| token.to_string()).collect()
}

fn contains_any_token(tokens: &[String], candidates: &[&str]) -> bool {
    tokens.iter().any(|token| candidates.contains(&token.as_str()))
}

fn contains_any_phrase(normalized: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| normalized.contains(phrase))
}

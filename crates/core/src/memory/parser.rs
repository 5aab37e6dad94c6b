//! Deterministic parsing of explicit memory phrases into structured facts.
//!
//! No inference: only fixed lead-in phrases are recognized, and the stored
//! content is the user's own wording.

use super::models::MemoryKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedFact {
    pub kind: MemoryKind,
    pub content: String,
}

const LEAD_INS: &[&str] = &[
    "remember that ",
    "note that ",
    "save that ",
    "record that ",
    "memorize that ",
    "remember ",
    "note ",
];

const NAME_MARKERS: &[&str] = &["my name is ", "i am called ", "call me "];

#[derive(Clone, Debug, Default)]
pub struct MemoryParser;

impl MemoryParser {
    /// Extracts a fact from an explicit memory-write phrase. Returns `None`
    /// when no recognizable statement follows the trigger verb.
    pub fn parse(text: &str) -> Option<ParsedFact> {
        let normalized = text.trim().to_lowercase();

        let content = LEAD_INS
            .iter()
            .find_map(|lead| normalized.strip_prefix(lead))
            .map(str::trim)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
            .or_else(|| {
                // A name statement is worth keeping even without a lead-in.
                NAME_MARKERS
                    .iter()
                    .any(|marker| normalized.contains(marker))
                    .then(|| normalized.clone())
            })?;

        Some(ParsedFact { kind: classify_kind(&content), content })
    }

    /// Pulls a capitalized name out of a stored name fact.
    pub fn extract_name(content: &str) -> Option<String> {
        let normalized = content.to_lowercase();
        let marker_end = NAME_MARKERS
            .iter()
            .find_map(|marker| normalized.find(marker).map(|idx| idx + marker.len()))?;
        let name = normalized[marker_end..]
            .split_whitespace()
            .next()?
            .trim_matches(|c: char| !c.is_alphanumeric());
        if name.is_empty() {
            return None;
        }
        let mut chars = name.chars();
        let first = chars.next()?;
        Some(first.to_uppercase().collect::<String>() + chars.as_str())
    }
}

fn classify_kind(content: &str) -> MemoryKind {
    if content.contains("prefer") || content.contains("favorite") {
        MemoryKind::Preference
    } else if content.contains("project") {
        MemoryKind::Project
    } else if content.contains("task") || content.contains("todo") {
        MemoryKind::Task
    } else {
        MemoryKind::Fact
    }
}

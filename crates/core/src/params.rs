//! Deterministic extraction of structured parameters from raw text.
//!
//! No natural-language understanding: quoted spans, dotted tokens and a few
//! fixed prepositions. Anything the resolver cannot find is simply absent
//! from the payload and the capability handler reports the missing piece.

use std::collections::BTreeMap;

use crate::intent::IntentKind;

#[derive(Clone, Debug, Default)]
pub struct ParamsResolver;

impl ParamsResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, kind: IntentKind, raw: &str) -> BTreeMap<String, String> {
        match kind {
            IntentKind::ContentCreate => self.resolve_create(raw),
            IntentKind::ContentModify => self.resolve_modify(raw),
            IntentKind::ContentMove => self.resolve_move(raw),
            IntentKind::ContentRead | IntentKind::ContentDelete => self.resolve_with_path(raw),
            _ => BTreeMap::new(),
        }
    }

    fn resolve_with_path(&self, raw: &str) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let Some(filename) = extract_filename(raw) {
            params.insert("filename".to_string(), filename);
        }
        if let Some(dir) = extract_dir_hint(raw) {
            params.insert("path".to_string(), dir);
        }
        params
    }

    fn resolve_create(&self, raw: &str) -> BTreeMap<String, String> {
        let mut params = self.resolve_with_path(raw);
        if let Some(content) = split_after(raw, " with ") {
            params.insert("content".to_string(), content);
        }
        params
    }

    fn resolve_modify(&self, raw: &str) -> BTreeMap<String, String> {
        let mut params = self.resolve_with_path(raw);
        let content =
            split_after(raw, " adding ").or_else(|| split_after(raw, " with "));
        if let Some(content) = content {
            params.insert("content".to_string(), content);
        }
        params
    }

    fn resolve_move(&self, raw: &str) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let Some(filename) = extract_filename(raw) {
            params.insert("filename".to_string(), filename);
        }
        if let (Some(from_idx), Some(_)) = (raw.find(" from "), raw.find(" to ")) {
            let after_from = &raw[from_idx + " from ".len()..];
            if let Some(to_idx) = after_from.find(" to ") {
                let source = after_from[..to_idx].trim();
                let target = after_from[to_idx + " to ".len()..].trim();
                if !source.is_empty() {
                    params.insert("source".to_string(), source.to_string());
                }
                if !target.is_empty() {
                    params.insert("destination".to_string(), target.to_string());
                }
            }
        } else if let Some(target) = split_after(raw, " to ") {
            params.insert("destination".to_string(), target);
        }
        params
    }
}

/// A double-quoted span wins; otherwise the last dotted token is taken as a
/// filename, with surrounding punctuation stripped.
fn extract_filename(raw: &str) -> Option<String> {
    if let Some(open) = raw.find('"') {
        let rest = &raw[open + 1..];
        if let Some(close) = rest.find('"') {
            let quoted = rest[..close].trim();
            if !quoted.is_empty() {
                return Some(quoted.to_string());
            }
        }
    }

    raw.split_whitespace()
        .rev()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != '_'))
        .find(|token| {
            token.contains('.') && !token.starts_with('.') && !token.ends_with('.')
        })
        .map(|token| token.to_string())
}

fn extract_dir_hint(raw: &str) -> Option<String> {
    let after = split_after(raw, " in ")?;
    let first = after.split_whitespace().next()?;
    let cleaned = first.trim_matches(|c: char| c == ',' || c == '.' || c == ';');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

fn split_after(raw: &str, separator: &str) -> Option<String> {
    raw.find(separator).map(|idx| raw[idx + separator.len()..].trim().to_string()).filter(
        |value| !value.is_empty(),
    )
}

#[cfg(test)]
mod tests {
    use super::ParamsResolver;
    use crate::intent::IntentKind;

    fn resolve(kind: IntentKind, raw: &str) -> std::collections::BTreeMap<String, String> {
        ParamsResolver::new().resolve(kind, raw)
    }

    #[test]
    fn quoted_filename_wins_over_dotted_tokens() {
        let params = resolve(IntentKind::ContentRead, "open \"final report.txt\" in archive");
        assert_eq!(params.get("filename").map(String::as_str), Some("final report.txt"));
        assert_eq!(params.get("path").map(String::as_str), Some("archive"));
    }

    #[test]
    fn dotted_token_is_taken_as_filename() {
        let params = resolve(IntentKind::ContentDelete, "delete report.txt");
        assert_eq!(params.get("filename").map(String::as_str), Some("report.txt"));
        assert_eq!(params.get("path"), None);
    }

    #[test]
    fn trailing_punctuation_is_stripped_from_filenames() {
        let params = resolve(IntentKind::ContentDelete, "remove old_notes.md, please");
        assert_eq!(params.get("filename").map(String::as_str), Some("old_notes.md"));
    }

    #[test]
    fn create_splits_content_after_with() {
        let params =
            resolve(IntentKind::ContentCreate, "create shopping.md with milk and eggs");
        assert_eq!(params.get("filename").map(String::as_str), Some("shopping.md"));
        assert_eq!(params.get("content").map(String::as_str), Some("milk and eggs"));
    }

    #[test]
    fn modify_prefers_adding_over_with() {
        let params =
            resolve(IntentKind::ContentModify, "update todo.txt adding buy stamps");
        assert_eq!(params.get("content").map(String::as_str), Some("buy stamps"));
    }

    #[test]
    fn move_extracts_source_and_target() {
        let params =
            resolve(IntentKind::ContentMove, "move notes.md from drafts to archive");
        assert_eq!(params.get("filename").map(String::as_str), Some("notes.md"));
        assert_eq!(params.get("source").map(String::as_str), Some("drafts"));
        assert_eq!(params.get("destination").map(String::as_str), Some("archive"));
    }

    #[test]
    fn move_without_source_still_finds_destination() {
        let params = resolve(IntentKind::ContentMove, "move draft.md to archive");
        assert_eq!(params.get("source"), None);
        assert_eq!(params.get("destination").map(String::as_str), Some("archive"));
    }

    #[test]
    fn non_content_kinds_resolve_to_empty() {
        assert!(resolve(IntentKind::Chat, "tell me a story").is_empty());
    }
}

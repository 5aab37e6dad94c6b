//! Local memory: the append-only store, the deterministic phrase parser and
//! the manager the LOCAL dispatch path talks to.

pub mod models;
pub mod parser;
pub mod store;

pub use models::{MemoryKind, MemoryRecord};
pub use parser::{MemoryParser, ParsedFact};
pub use store::{MemoryError, MemoryStore};

use crate::intent::{Intent, IntentKind};

pub struct MemoryManager {
    store: MemoryStore,
}

impl MemoryManager {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Entry point for the LOCAL dispatch path: takes the routed intent and
    /// produces the textual result the executor wraps.
    pub fn execute(&self, intent: &Intent) -> Result<String, MemoryError> {
        match intent.kind {
            IntentKind::MemoryWrite => self.remember(&intent.raw),
            IntentKind::MemoryRead => self.answer(&intent.raw),
            other => {
                tracing::error!(kind = other.label(), "local path received a non-memory intent");
                Ok("Nothing to do locally for that request.".to_string())
            }
        }
    }

    pub fn remember(&self, text: &str) -> Result<String, MemoryError> {
        let Some(fact) = MemoryParser::parse(text) else {
            return Ok("I could not find a statement to store.".to_string());
        };
        let record = MemoryRecord::create(fact.kind, fact.content.clone(), "user");
        self.store.append(record)?;
        Ok(format!("Noted: {}.", fact.content))
    }

    /// Answers a recall question: a name question is answered from the most
    /// recent name fact, anything else lists what is stored.
    pub fn answer(&self, question: &str) -> Result<String, MemoryError> {
        let records = self.store.load_all()?;
        if question.to_lowercase().contains("name") {
            let name = records
                .iter()
                .rev()
                .find_map(|record| MemoryParser::extract_name(&record.content));
            return Ok(match name {
                Some(name) => format!("Your name is {name}."),
                None => "I do not have your name on record.".to_string(),
            });
        }

        if records.is_empty() {
            return Ok("I have nothing stored yet.".to_string());
        }
        let mut lines = vec![format!("I remember {} item(s):", records.len())];
        for record in &records {
            lines.push(format!("- {}", record.content));
        }
        Ok(lines.join("\n"))
    }

    pub fn recall(&self, kind: Option<MemoryKind>) -> Result<Vec<MemoryRecord>, MemoryError> {
        let records = self.store.load_all()?;
        Ok(match kind {
            Some(kind) => records.into_iter().filter(|record| record.kind == kind).collect(),
            None => records,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{MemoryKind, MemoryManager, MemoryStore};
    use crate::intent::{Intent, IntentKind};

    fn manager(dir: &tempfile::TempDir) -> MemoryManager {
        MemoryManager::new(MemoryStore::open(dir.path().join("memory.json")).unwrap())
    }

    #[test]
    fn remember_then_answer_name_question() {
        let dir = tempdir().unwrap();
        let manager = manager(&dir);

        let stored = manager
            .execute(&Intent::new(IntentKind::MemoryWrite, "remember that my name is Ana"))
            .unwrap();
        assert!(stored.contains("my name is ana"));

        let answer = manager
            .execute(&Intent::new(IntentKind::MemoryRead, "what is my name?"))
            .unwrap();
        assert_eq!(answer, "Your name is Ana.");
    }

    #[test]
    fn unparseable_write_does_not_touch_the_store() {
        let dir = tempdir().unwrap();
        let manager = manager(&dir);
        let reply = manager.remember("remember").unwrap();
        assert!(reply.contains("could not find"));
        assert!(manager.recall(None).unwrap().is_empty());
    }

    #[test]
    fn generic_recall_lists_stored_items() {
        let dir = tempdir().unwrap();
        let manager = manager(&dir);
        manager.remember("remember that the deploy is on friday").unwrap();
        manager.remember("note that i prefer tea").unwrap();

        let answer = manager.answer("what do you remember").unwrap();
        assert!(answer.contains("2 item(s)"));
        assert!(answer.contains("the deploy is on friday"));
    }

    #[test]
    fn recall_filters_by_kind() {
        let dir = tempdir().unwrap();
        let manager = manager(&dir);
        manager.remember("remember that the deploy is on friday").unwrap();
        manager.remember("note that i prefer tea").unwrap();

        let preferences = manager.recall(Some(MemoryKind::Preference)).unwrap();
        assert_eq!(preferences.len(), 1);
        assert!(preferences[0].content.contains("prefer tea"));
    }
}

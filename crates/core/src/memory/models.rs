//! Persisted memory records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    Fact,
    Preference,
    Project,
    Task,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub kind: MemoryKind,
    pub content: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub confidence: f64,
}

impl MemoryRecord {
    pub fn create(kind: MemoryKind, content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            content: content.into(),
            source: source.into(),
            created_at: Utc::now(),
            confidence: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryKind, MemoryRecord};

    #[test]
    fn created_records_default_to_full_confidence() {
        let record = MemoryRecord::create(MemoryKind::Fact, "my name is Ana", "user");
        assert_eq!(record.confidence, 1.0);
        assert!(!record.id.is_empty());
    }

    #[test]
    fn records_round_trip_through_json() {
        let record = MemoryRecord::create(MemoryKind::Preference, "prefers tea", "user");
        let json = serde_json::to_string(&record).unwrap();
        let back: MemoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}

//! Short-lived cache for web lookups, keyed by the digest of the
//! normalized query. Avoids duplicate network round-trips for repeated
//! questions inside the TTL window.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use steward_core::contract::ActionResult;

pub struct WebCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, ActionResult)>>,
}

impl WebCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }

    pub fn get(&self, query: &str) -> Option<ActionResult> {
        let key = cache_key(query);
        let mut entries = self.entries.lock().expect("web cache lock");
        match entries.get(&key) {
            Some((stored_at, result)) if stored_at.elapsed() < self.ttl => Some(result.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Caches a result unless it carries no useful content.
    pub fn put(&self, query: &str, result: &ActionResult) {
        if result.content.as_deref().map(str::trim).unwrap_or("").is_empty() {
            return;
        }
        let key = cache_key(query);
        self.entries.lock().expect("web cache lock").insert(key, (Instant::now(), result.clone()));
    }
}

fn cache_key(query: &str) -> String {
    let normalized = query.trim().to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use steward_core::contract::{ActionResult, Origin};

    use super::WebCache;

    fn result(content: &str) -> ActionResult {
        ActionResult::ok(Origin::Web, "web lookup completed").with_content(content)
    }

    #[test]
    fn hit_within_ttl_and_normalized_key() {
        let cache = WebCache::new(Duration::from_secs(60));
        cache.put("Dollar Rate", &result("5.43"));
        let hit = cache.get("  dollar rate ").unwrap();
        assert_eq!(hit.content.as_deref(), Some("5.43"));
    }

    #[test]
    fn expired_entries_are_evicted() {
        let cache = WebCache::new(Duration::from_millis(0));
        cache.put("dollar rate", &result("5.43"));
        assert!(cache.get("dollar rate").is_none());
    }

    #[test]
    fn contentless_results_are_not_cached() {
        let cache = WebCache::new(Duration::from_secs(60));
        cache.put("dollar rate", &ActionResult::ok(Origin::Web, "nothing found"));
        assert!(cache.get("dollar rate").is_none());
    }
}

//! Capability handlers and the startup registration that wires them into
//! the registry.

pub mod fs;
pub mod web;
pub mod web_cache;

pub use fs::{DeleteFileHandler, MoveFileHandler, ReadFileHandler, WriteFileHandler};
pub use web::WebLookupHandler;
pub use web_cache::WebCache;

use std::sync::Arc;

use steward_core::config::AppConfig;
use steward_core::registry::CapabilityRegistry;

/// Builds the default registry: one web lookup plus the filesystem family,
/// all scoped to the configured base directory. Called once at startup; the
/// registry is injected and read-only afterwards.
pub fn default_registry(config: &AppConfig) -> CapabilityRegistry {
    let base = config.runtime.base_dir.clone();
    let mut registry = CapabilityRegistry::new();
    registry.register(Arc::new(WebLookupHandler::new(&config.web)));
    registry.register(Arc::new(ReadFileHandler::new(base.clone())));
    registry.register(Arc::new(WriteFileHandler::create(base.clone())));
    registry.register(Arc::new(WriteFileHandler::append(base.clone())));
    registry.register(Arc::new(DeleteFileHandler::new(base.clone())));
    registry.register(Arc::new(MoveFileHandler::new(base)));
    registry
}

#[cfg(test)]
mod tests {
    use steward_core::config::AppConfig;
    use steward_core::intent::IntentKind;

    use super::default_registry;

    #[test]
    fn default_registry_covers_web_and_filesystem_kinds() {
        let registry = default_registry(&AppConfig::default());
        assert!(registry.has_web_capability());
        for kind in [
            IntentKind::ContentRead,
            IntentKind::ContentCreate,
            IntentKind::ContentModify,
            IntentKind::ContentDelete,
            IntentKind::ContentMove,
        ] {
            assert_eq!(registry.find_by_intent(kind).len(), 1, "missing handler for {kind:?}");
        }
    }
}

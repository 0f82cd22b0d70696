//! Per-call reference bookkeeping for projection.

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde_json::Value as JsonValue;
use tracing::trace;

/// Discovered reference targets and the definitions emitted for them.
///
/// Owned by exactly one projection call. Registration is idempotent, so a
/// shape reached again while its own definition is being generated is not
/// queued a second time.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    discovered: HashSet<String>,
    pending: VecDeque<String>,
    definitions: BTreeMap<String, JsonValue>,
}

impl ReferenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reference target. Returns `true` the first time an identity
    /// is seen.
    pub fn register(&mut self, identity: &str) -> bool {
        if self.discovered.contains(identity) {
            return false;
        }
        trace!(identity, "Discovered reference");
        self.discovered.insert(identity.to_string());
        self.pending.push_back(identity.to_string());
        true
    }

    /// Next discovered identity that still needs a definition.
    pub fn next_pending(&mut self) -> Option<String> {
        while let Some(identity) = self.pending.pop_front() {
            if !self.definitions.contains_key(&identity) {
                return Some(identity);
            }
        }
        None
    }

    /// Record the definition for an identity. The first definition wins.
    pub fn define(&mut self, identity: String, fragment: JsonValue) {
        self.definitions.entry(identity).or_insert(fragment);
    }

    /// Check whether an identity already has a definition.
    pub fn is_defined(&self, identity: &str) -> bool {
        self.definitions.contains_key(identity)
    }

    /// Check whether an identity has been registered.
    pub fn is_discovered(&self, identity: &str) -> bool {
        self.discovered.contains(identity)
    }

    /// Number of identities registered so far.
    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// Emitted definitions, keyed by identity.
    pub fn into_definitions(self) -> BTreeMap<String, JsonValue> {
        self.definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_is_idempotent() {
        let mut store = ReferenceStore::new();
        assert!(store.register("User"));
        assert!(!store.register("User"));
        assert_eq!(store.discovered_count(), 1);
        assert_eq!(store.next_pending().as_deref(), Some("User"));
        assert_eq!(store.next_pending(), None);
    }

    #[test]
    fn test_work_list_order() {
        let mut store = ReferenceStore::new();
        store.register("A");
        store.register("B");
        assert_eq!(store.next_pending().as_deref(), Some("A"));
        store.register("C");
        assert_eq!(store.next_pending().as_deref(), Some("B"));
        assert_eq!(store.next_pending().as_deref(), Some("C"));
    }

    #[test]
    fn test_defined_identities_are_skipped() {
        let mut store = ReferenceStore::new();
        store.register("A");
        store.define("A".into(), json!({"type": "object"}));
        assert!(store.is_defined("A"));
        assert_eq!(store.next_pending(), None);

        store.define("A".into(), json!({"type": "string"}));
        assert_eq!(store.into_definitions()["A"], json!({"type": "object"}));
    }
}

//! Property Source Port

use std::collections::{BTreeMap, HashMap};

/// Read-only key/value lookup used to resolve `${...}` placeholders
pub trait PropertySource: Send + Sync {
    /// Value for `key`, if defined
    fn property(&self, key: &str) -> Option<String>;
}

impl PropertySource for BTreeMap<String, String> {
    fn property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl PropertySource for HashMap<String, String> {
    fn property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

// src/sync/list.rs
// =============================================================================
// Append-only list of names that many tasks can push into at once.
// Used by foster mode to collect dogs as listing pages come back.
// =============================================================================

use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct ThreadSafeList {
    names: Mutex<Vec<String>>,
}

impl ThreadSafeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, name: impl Into<String>) {
        self.names
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(name.into());
    }

    /// Snapshot of everything added so far, in insertion order
    pub fn get(&self) -> Vec<String> {
        self.names
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.names
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

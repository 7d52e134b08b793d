// src/sync/flag.rs
// =============================================================================
// A thread-safe boolean used only as the "stop issuing pages" signal.
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    pub fn get(&self) -> bool {
        self.value.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::SeqCst);
    }
}

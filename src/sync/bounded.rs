// src/sync/bounded.rs
// =============================================================================
// A wait group that also limits how many units may be outstanding at once.
//
// Spawning one task per URL is easy in tokio, but it would also open one
// connection per URL. This group gives each task an admission slot first:
//
//   group.add(1).await;     // waits while `capacity` units are outstanding
//   tokio::spawn(... group.done() ...);
//   group.wait().await;     // returns once every unit called done()
//
// `admit()` wraps add/done in a guard so a task cannot forget to release.
//
// Rust concepts:
// - tokio::sync::Semaphore: the admission limit
// - tokio::sync::watch: lets wait() sleep until the counter hits zero
// =============================================================================

use std::sync::Arc;
use tokio::sync::{watch, Semaphore};

#[derive(Debug)]
pub struct BoundedConcurrencyGroup {
    capacity: usize,
    permits: Semaphore,
    outstanding: watch::Sender<usize>,
}

impl BoundedConcurrencyGroup {
    /// Creates a group allowing `capacity` outstanding units.
    ///
    /// A zero capacity would make every `add` wait forever, so it is
    /// treated as 1. `Config::validate` rejects zero before we get here.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (outstanding, _) = watch::channel(0);
        Self {
            capacity,
            permits: Semaphore::new(capacity),
            outstanding,
        }
    }

    /// Number of units added but not yet done
    pub fn outstanding(&self) -> usize {
        *self.outstanding.borrow()
    }

    /// Waits until `count` more units fit under the capacity, then records
    /// them as outstanding.
    ///
    /// Asking for more than `capacity` units at once never completes.
    pub async fn add(&self, count: usize) {
        if count == 0 {
            return;
        }
        let permits = match u32::try_from(count) {
            Ok(permits) if count <= self.capacity => permits,
            // More than the group can ever hold: wait forever
            _ => return std::future::pending().await,
        };
        match self.permits.acquire_many(permits).await {
            // The group owns the slot now, done() hands it back
            Ok(permit) => permit.forget(),
            Err(_) => unreachable!("admission semaphore is never closed"),
        }
        self.outstanding.send_modify(|n| *n += count);
    }

    /// Releases one unit.
    ///
    /// # Panics
    ///
    /// When no unit is outstanding. That is a bug in the caller, not a
    /// runtime condition.
    pub fn done(&self) {
        let mut released = false;
        self.outstanding.send_modify(|n| {
            if *n > 0 {
                *n -= 1;
                released = true;
            }
        });
        assert!(released, "done() called without an outstanding add()");
        self.permits.add_permits(1);
    }

    /// Waits until every added unit has called `done()`
    pub async fn wait(&self) {
        let mut outstanding = self.outstanding.subscribe();
        // The sender lives in self, so the channel cannot close under us
        let _ = outstanding.wait_for(|n| *n == 0).await;
    }

    /// Adds one unit and returns a guard that calls `done()` when dropped
    pub async fn admit(self: &Arc<Self>) -> Slot {
        self.add(1).await;
        Slot {
            group: Arc::clone(self),
        }
    }
}

/// One admitted unit of a [`BoundedConcurrencyGroup`]
#[derive(Debug)]
pub struct Slot {
    group: Arc<BoundedConcurrencyGroup>,
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.group.done();
    }
}

// src/sync/mod.rs
// =============================================================================
// Shared state used by the crawl and download tasks.
//
// Submodules:
// - flag: "stop crawling" signal
// - bounded: wait group with an admission limit
// - names: the set of dog names we are looking for
// - list: append-only list of names (foster mode)
//
// Everything here is safe to share between tokio tasks behind an Arc.
// =============================================================================

mod bounded; // src/sync/bounded.rs - wait group with a concurrency limit
mod flag; // src/sync/flag.rs - the stop flag
mod list; // src/sync/list.rs - mutex-guarded list of names
mod names; // src/sync/names.rs - wanted names and which were found

pub use bounded::{BoundedConcurrencyGroup, Slot};
pub use flag::AtomicFlag;
pub use list::ThreadSafeList;
pub use names::{normalize_name, NameMatchSet};

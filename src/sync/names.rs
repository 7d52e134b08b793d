// src/sync/names.rs
// =============================================================================
// The set of dog names a run is looking for.
//
// Each name starts as "not found" and flips to "found" exactly once, the
// first time a listing shows a dog whose (normalized) name contains it.
// Nothing ever flips it back.
//
// Matching is substring containment, not equality: "rex" matches "rexy".
// That is how the rescue's listing has always been searched (display names
// often carry suffixes like "Fido Jr"), so short names can over-match.
// =============================================================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Lowercases, drops double quotes and trims a dog name.
///
/// The result is used both for matching and as the dog's directory name.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace('"', "").trim().to_string()
}

#[derive(Debug, Default)]
pub struct NameMatchSet {
    // normalized name -> found
    entries: Mutex<HashMap<String, bool>>,
}

impl NameMatchSet {
    /// Builds the set from raw names. Duplicates collapse, and names that
    /// normalize to an empty string are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = names
            .into_iter()
            .map(|name| normalize_name(name.as_ref()))
            .filter(|name| !name.is_empty())
            .map(|name| (name, false))
            .collect();

        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Builds the set from a comma separated list, e.g. `"Fido, Rex"`
    pub fn from_comma_separated(names: &str) -> Self {
        Self::new(names.split(','))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, bool>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks the first unfound entry contained in `candidate` as found.
    ///
    /// `candidate` must already be normalized. Returns false, without
    /// touching anything, when no unfound entry matches.
    pub fn is_match(&self, candidate: &str) -> bool {
        let mut entries = self.lock();
        match entries
            .iter_mut()
            .find(|(name, found)| !**found && candidate.contains(name.as_str()))
        {
            Some((_, found)) => {
                *found = true;
                true
            }
            None => false,
        }
    }

    /// True once every entry is found (and for an empty set)
    pub fn is_complete(&self) -> bool {
        self.lock().values().all(|found| *found)
    }

    /// Entries that were never found, in no particular order
    pub fn get_missing(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(_, found)| !**found)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! String interning.
//!
//! Identifiers are deduplicated into `Atom` handles so that name comparison
//! is an integer compare and symbol nodes stay `Copy`-friendly. The interner
//! is thread-safe: binding and relation resolution run on multiple threads
//! and intern names concurrently.

use dashmap::DashMap;
use std::sync::RwLock;

/// Interned string handle.
///
/// Two atoms from the same [`Interner`] are equal iff the strings they were
/// interned from are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

/// Thread-safe string interner.
///
/// Lookup by string goes through a sharded map; resolution back to the
/// string goes through an append-only table.
pub struct Interner {
    map: DashMap<String, Atom>,
    strings: RwLock<Vec<String>>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
            strings: RwLock::new(Vec::new()),
        }
    }

    /// Intern a string, returning its atom. Idempotent.
    pub fn intern(&self, s: &str) -> Atom {
        if let Some(existing) = self.map.get(s) {
            return *existing;
        }
        let mut strings = self.strings.write().unwrap_or_else(|e| e.into_inner());
        // Re-check under the write lock: another thread may have won the race.
        if let Some(existing) = self.map.get(s) {
            return *existing;
        }
        let atom = Atom(strings.len() as u32);
        strings.push(s.to_string());
        self.map.insert(s.to_string(), atom);
        atom
    }

    /// Resolve an atom back to its string.
    pub fn resolve(&self, atom: Atom) -> String {
        let strings = self.strings.read().unwrap_or_else(|e| e.into_inner());
        strings[atom.0 as usize].clone()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

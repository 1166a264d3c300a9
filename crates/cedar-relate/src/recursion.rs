//! Recursion guard for cycle detection and depth limiting.
//!
//! The managed-kind field scan and transitive constraint satisfaction both
//! recurse over graphs that may contain cycles. The guard combines a
//! visiting set with a depth limit so either walk terminates on any input.
//!
//! Bounds resolution does not use this guard; it carries an immutable
//! cons-list of in-progress parameters instead (see `bounds::InProgress`),
//! because a detected cycle there is a user-facing diagnostic, not an
//! internal limit.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Transitive field scan for the unmanaged constraint.
    ///
    /// depth = 50
    FieldScan,
    /// Transitive type-parameter constraint satisfaction.
    ///
    /// depth = 50
    ConstraintSatisfaction,
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::FieldScan => 50,
            Self::ConstraintSatisfaction => 50,
        }
    }
}

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited.
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

/// Tracks recursion state for cycle detection and depth limiting.
///
/// Callers pair every successful [`enter`](RecursionGuard::enter) with a
/// [`leave`](RecursionGuard::leave) of the same key.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    max_depth: u32,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            max_depth: profile.max_depth(),
        }
    }

    /// Try to enter a recursive computation for `key`.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        if self.depth >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }
        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave a computation entered for `key`.
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(was_present, "leave without a matching enter");
        self.depth = self.depth.saturating_sub(1);
    }
}

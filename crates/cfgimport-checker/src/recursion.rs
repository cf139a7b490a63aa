//! Recursion guard for cycle detection and depth limiting in
//! declaration-pair comparison.
//!
//! # Design
//!
//! Comparing a named type can re-enter class comparison, and class graphs are
//! routinely self- or mutually-referential. `RecursionGuard` tracks the
//! declaration pairs currently being compared:
//! 1. **Cycle detection** via a visiting map (`FxHashMap<K, depth>`)
//! 2. **Depth limiting** to prevent stack overflow
//!
//! The guard records the depth at which each key was entered, so a caller
//! that hits a cycle knows which in-progress comparison it is relying on.
//! Keys on the stack are distinct, so a depth limit no smaller than the
//! number of distinct keys is never reached.
//!
//! # Safety
//!
//! - **Debug leak detection**: In debug builds, dropping a guard with active entries
//!   triggers a panic, catching forgotten `leave()` calls.
//! - **Debug double-leave detection**: In debug builds, leaving a key that isn't in
//!   the visiting set triggers a panic.

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited (cycle).
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
}

/// Tracks recursion state for cycle detection and depth limiting.
///
/// ```ignore
/// match guard.enter(key.clone()) {
///     RecursionResult::Entered => {
///         let result = do_work();
///         guard.leave(&key);
///         result
///     }
///     RecursionResult::Cycle => assume_related(),
///     RecursionResult::DepthExceeded => defer(),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Clone> {
    /// Key -> depth at which it was entered (1-based).
    visiting: FxHashMap<K, u32>,
    depth: u32,
    max_depth: u32,
}

impl<K: Hash + Eq + Clone> RecursionGuard<K> {
    pub fn new(max_depth: u32) -> Self {
        Self {
            visiting: FxHashMap::default(),
            depth: 0,
            max_depth,
        }
    }

    /// Try to enter a recursive computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller **must** call
    /// [`leave`](Self::leave) with the same key when done.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        if self.visiting.contains_key(&key) {
            return RecursionResult::Cycle;
        }
        if self.depth >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }

        self.depth += 1;
        self.visiting.insert(key, self.depth);
        RecursionResult::Entered
    }

    /// Leave a recursive computation for `key`.
    ///
    /// # Debug panics
    ///
    /// In debug builds, panics if `key` is not in the visiting set.
    pub fn leave(&mut self, key: &K) {
        let was_present = self.visiting.remove(key).is_some();

        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set. \
             This indicates a double-leave or a leave without a matching enter()."
        );

        self.depth = self.depth.saturating_sub(1);
    }

    /// Depth at which `key` was entered, if it is currently being visited.
    #[inline]
    pub fn entry_depth(&self, key: &K) -> Option<u32> {
        self.visiting.get(key).copied()
    }

    /// Current recursion depth (number of active entries on the stack).
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Clone> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set. \
                 This indicates leaked enter() calls without matching leave() calls.",
                self.visiting.len(),
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;

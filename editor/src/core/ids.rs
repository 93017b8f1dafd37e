//! Deterministic id allocation.
//!
//! Fresh ids are derived from the ids already present in a document, so the
//! same document always yields the same next id.

use std::collections::HashSet;

pub const UNIT_PREFIX: &str = "rule";
pub const CONDITION_PREFIX: &str = "cond";
pub const ACTION_PREFIX: &str = "action";

/// Tracks ids in use and hands out `<prefix>-<n>` ids above the highest
/// existing suffix for that prefix.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    used: HashSet<String>,
}

impl IdAllocator {
    pub fn new(used: HashSet<String>) -> Self {
        Self { used }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    /// Record `id` as used. Returns false when it was already taken or empty.
    pub fn claim(&mut self, id: &str) -> bool {
        !id.is_empty() && self.used.insert(id.to_string())
    }

    /// Keep `id` when it is non-empty and unused, otherwise allocate a fresh
    /// one under `prefix`.
    pub fn claim_or_fresh(&mut self, id: &str, prefix: &str) -> String {
        if self.claim(id) {
            return id.to_string();
        }
        self.fresh(prefix)
    }

    /// Allocate `<prefix>-<max+1>`. When the highest suffix is `u64::MAX`,
    /// the lowest unused `<prefix>-<n>` from 1 upward is issued instead.
    pub fn fresh(&mut self, prefix: &str) -> String {
        let above = self
            .used
            .iter()
            .filter_map(|id| suffix_number(id, prefix))
            .max()
            .map_or(Some(1), |max| max.checked_add(1));
        let mut next = above.unwrap_or(1);
        while self.contains(&format!("{prefix}-{next}")) {
            next += 1;
        }
        let id = format!("{prefix}-{next}");
        self.used.insert(id.clone());
        id
    }
}

fn suffix_number(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.strip_prefix('-')?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocator(ids: &[&str]) -> IdAllocator {
        IdAllocator::new(ids.iter().map(|id| id.to_string()).collect())
    }

    #[test]
    fn fresh_starts_at_one() {
        assert_eq!(allocator(&[]).fresh("rule"), "rule-1");
    }

    #[test]
    fn fresh_goes_above_highest_suffix() {
        let mut ids = allocator(&["rule-1", "rule-7", "cond-40", "custom"]);
        assert_eq!(ids.fresh("rule"), "rule-8");
        assert_eq!(ids.fresh("rule"), "rule-9");
        assert_eq!(ids.fresh("cond"), "cond-41");
    }

    #[test]
    fn claim_or_fresh_replaces_duplicates_and_blanks() {
        let mut ids = allocator(&["action-1"]);
        assert_eq!(ids.claim_or_fresh("mine", "action"), "mine");
        assert_eq!(ids.claim_or_fresh("mine", "action"), "action-2");
        assert_eq!(ids.claim_or_fresh("", "action"), "action-3");
    }

    #[test]
    fn fresh_wraps_to_lowest_free_suffix_after_max() {
        let mut ids = allocator(&["rule-18446744073709551615", "rule-1", "rule-3"]);
        assert_eq!(ids.fresh("rule"), "rule-2");
        assert_eq!(ids.fresh("rule"), "rule-4");
        assert!(ids.contains("rule-2"));
    }

    #[test]
    fn fresh_never_reissues_a_used_id() {
        let mut ids = allocator(&["cond-18446744073709551615"]);
        let first = ids.fresh("cond");
        let second = ids.fresh("cond");
        assert_eq!(first, "cond-1");
        assert_eq!(second, "cond-2");
        assert!(!ids.claim("cond-18446744073709551615"));
    }
}

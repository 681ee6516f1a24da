//! Ordering keys for stack registrations.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Process-wide insertion counter shared by every key.
static NEXT_ORDER: AtomicU64 = AtomicU64::new(0);

/// Priority tier of a stack element.
///
/// Higher tiers always win over lower ones; within a tier the most recent
/// registration wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicStackPriority {
    #[default]
    Low,
    Normal,
    High,
    /// Any other tier, compared by its raw value.
    Custom(i32),
}

impl MusicStackPriority {
    /// Raw tier value used for ordering.
    pub fn value(self) -> i32 {
        match self {
            MusicStackPriority::Low => 0,
            MusicStackPriority::Normal => 50,
            MusicStackPriority::High => 100,
            MusicStackPriority::Custom(value) => value,
        }
    }
}

impl From<MusicStackPriority> for i32 {
    fn from(priority: MusicStackPriority) -> Self {
        priority.value()
    }
}

/// Sort key for a registration in the music stack.
///
/// Keys sort by priority descending, then by insertion order descending, so
/// the smallest key in an ordered map is the element in control. Every key
/// draws a fresh insertion order, which makes two keys equal only if one is a
/// copy of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriorityKey {
    priority: i32,
    order: u64,
}

impl PriorityKey {
    /// Create a key for `priority` using the next insertion order.
    pub fn new(priority: impl Into<i32>) -> Self {
        Self {
            priority: priority.into(),
            order: NEXT_ORDER.fetch_add(1, AtomicOrdering::Relaxed),
        }
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn order(&self) -> u64 {
        self.order
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PriorityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(priority: {}, order: {})", self.priority, self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn higher_priority_sorts_first() {
        let low = PriorityKey::new(MusicStackPriority::Low);
        let high = PriorityKey::new(MusicStackPriority::High);
        assert!(high < low);
    }

    #[test]
    fn newest_wins_within_a_tier() {
        let first = PriorityKey::new(MusicStackPriority::Normal);
        let second = PriorityKey::new(MusicStackPriority::Normal);
        assert!(second < first);
        assert_ne!(first, second);
    }

    #[test]
    fn priority_beats_recency() {
        let high = PriorityKey::new(MusicStackPriority::High);
        let newer_normal = PriorityKey::new(MusicStackPriority::Normal);
        assert!(high < newer_normal);
    }

    #[test]
    fn first_map_entry_is_top() {
        let mut map = BTreeMap::new();
        let a = PriorityKey::new(MusicStackPriority::Low);
        let b = PriorityKey::new(MusicStackPriority::High);
        let c = PriorityKey::new(MusicStackPriority::Low);
        map.insert(a, "a");
        map.insert(b, "b");
        map.insert(c, "c");

        let order: Vec<_> = map.values().copied().collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn custom_tiers_compare_by_value() {
        assert_eq!(MusicStackPriority::Custom(75).value(), 75);
        let custom = PriorityKey::new(MusicStackPriority::Custom(75));
        let normal = PriorityKey::new(MusicStackPriority::Normal);
        let high = PriorityKey::new(MusicStackPriority::High);
        assert!(custom < normal);
        assert!(high < custom);
    }

    #[test]
    fn copies_compare_equal() {
        let key = PriorityKey::new(MusicStackPriority::Normal);
        let copy = key;
        assert_eq!(key, copy);
        assert_eq!(key.cmp(&copy), Ordering::Equal);
    }
}

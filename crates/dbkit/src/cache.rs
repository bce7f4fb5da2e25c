//! In-process key/value cache partitioned into named groups.

use crate::value::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Group used when none is given.
pub const DEFAULT_GROUP: &str = "default";

/// Grouped key/value store shared across tasks.
///
/// ```ignore
/// let cache = Cache::new();
/// cache.set("user:1", "Tom", None);
/// cache.set("hits", 3, Some("stats"));
/// assert_eq!(cache.get("hits", Some("stats")), Some(Value::Int(3)));
/// ```
#[derive(Debug)]
pub struct Cache<V = Value> {
    groups: Mutex<HashMap<String, HashMap<String, V>>>,
}

impl<V> Default for Cache<V> {
    fn default() -> Self {
        let mut groups = HashMap::new();
        groups.insert(DEFAULT_GROUP.to_string(), HashMap::new());
        Self {
            groups: Mutex::new(groups),
        }
    }
}

impl<V: Clone> Cache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, creating the group on first use.
    pub fn set(&self, key: &str, value: impl Into<V>, group: Option<&str>) {
        let group = group.unwrap_or(DEFAULT_GROUP);
        let mut groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Clone of the value stored under `key`, if any.
    pub fn get(&self, key: &str, group: Option<&str>) -> Option<V> {
        let group = group.unwrap_or(DEFAULT_GROUP);
        let groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        groups.get(group)?.get(key).cloned()
    }

    /// Remove and return the value stored under `key`.
    pub fn remove(&self, key: &str, group: Option<&str>) -> Option<V> {
        let group = group.unwrap_or(DEFAULT_GROUP);
        let mut groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        groups.get_mut(group)?.remove(key)
    }

    pub fn contains(&self, key: &str, group: Option<&str>) -> bool {
        let group = group.unwrap_or(DEFAULT_GROUP);
        let groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        groups.get(group).is_some_and(|g| g.contains_key(key))
    }

    /// Drop every entry of `group`.
    pub fn clear_group(&self, group: &str) {
        let mut groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entries) = groups.get_mut(group) {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_group_round_trip() {
        let cache: Cache = Cache::new();
        cache.set("name", "Tom", None);
        assert_eq!(cache.get("name", None), Some(Value::String("Tom".into())));
        assert_eq!(cache.get("name", Some(DEFAULT_GROUP)), Some(Value::String("Tom".into())));
    }

    #[test]
    fn groups_are_isolated() {
        let cache: Cache = Cache::new();
        cache.set("k", 1, Some("a"));
        cache.set("k", 2, Some("b"));
        assert_eq!(cache.get("k", Some("a")), Some(Value::Int(1)));
        assert_eq!(cache.get("k", Some("b")), Some(Value::Int(2)));
        assert_eq!(cache.get("k", None), None);
    }

    #[test]
    fn missing_group_or_key_is_none() {
        let cache: Cache = Cache::new();
        assert_eq!(cache.get("k", Some("nope")), None);
        assert_eq!(cache.remove("k", Some("nope")), None);
        assert!(!cache.contains("k", None));
    }

    #[test]
    fn remove_and_clear() {
        let cache: Cache<String> = Cache::new();
        cache.set("a", "1", None);
        cache.set("b", "2", None);
        assert_eq!(cache.remove("a", None).as_deref(), Some("1"));
        assert!(!cache.contains("a", None));
        cache.clear_group(DEFAULT_GROUP);
        assert!(!cache.contains("b", None));
    }
}

//! Ordered secondary index.
//!
//! Maps keys to the rids of the records carrying them. Duplicate keys keep
//! their rids in insertion order; keys are visited in ascending order.

use crate::traits::KeyRange;
use shoal_core::{Error, Result, Rid};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct OrderedIndex<K> {
    name: String,
    map: BTreeMap<K, Vec<Rid>>,
    unique: bool,
    len: usize,
}

impl<K: Ord + Clone + core::fmt::Debug> OrderedIndex<K> {
    pub fn new(name: impl Into<String>, unique: bool) -> Self {
        Self {
            name: name.into(),
            map: BTreeMap::new(),
            unique,
            len: 0,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Number of (key, rid) entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds an entry. A unique index rejects a second rid for the same key.
    pub fn insert_entry(&mut self, key: K, rid: Rid) -> Result<()> {
        let rids = self.map.entry(key).or_default();
        if self.unique && !rids.is_empty() {
            return Err(Error::invalid_argument(format!(
                "duplicate key in unique index {}",
                self.name
            )));
        }
        rids.push(rid);
        self.len += 1;
        tracing::trace!(index = %self.name, %rid, "index entry inserted");
        Ok(())
    }

    /// Removes the entry `(key, rid)`.
    pub fn delete_entry(&mut self, key: &K, rid: Rid) -> Result<()> {
        let Some(rids) = self.map.get_mut(key) else {
            return Err(Error::not_found(format!("key {key:?} in index {}", self.name)));
        };
        let Some(pos) = rids.iter().position(|r| *r == rid) else {
            return Err(Error::not_found(format!("rid {rid} in index {}", self.name)));
        };
        rids.remove(pos);
        if rids.is_empty() {
            self.map.remove(key);
        }
        self.len -= 1;
        tracing::trace!(index = %self.name, %rid, "index entry deleted");
        Ok(())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Point lookup.
    pub fn get(&self, key: &K) -> Vec<Rid> {
        self.map.get(key).cloned().unwrap_or_default()
    }

    /// Rids of every entry whose key lies in `range`, in key order.
    pub fn scan(&self, range: &KeyRange<K>) -> Vec<Rid> {
        if range.is_empty() {
            return Vec::new();
        }
        self.map
            .range::<K, _>(range.bounds())
            .flat_map(|(_, rids)| rids.iter().copied())
            .collect()
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.len = 0;
    }
}

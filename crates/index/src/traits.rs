//! Index trait definitions.
//!
//! `KeyRange` describes the keys an ordered scan visits; `VectorIndex` is the
//! capability the vector index scan operator drives.

use shoal_core::{Result, Rid};
use std::ops::Bound;

/// The keys an ordered scan visits, as a pair of `std` bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyRange<K> {
    low: Bound<K>,
    high: Bound<K>,
}

fn edge<K>(side: Option<(K, bool)>) -> Bound<K> {
    match side {
        None => Bound::Unbounded,
        Some((key, true)) => Bound::Included(key),
        Some((key, false)) => Bound::Excluded(key),
    }
}

impl<K: Ord> KeyRange<K> {
    pub fn all() -> Self {
        Self {
            low: Bound::Unbounded,
            high: Bound::Unbounded,
        }
    }

    pub fn only(key: K) -> Self
    where
        K: Clone,
    {
        Self {
            low: Bound::Included(key.clone()),
            high: Bound::Included(key),
        }
    }

    /// Builds a range from optional `(key, inclusive)` sides; a missing side
    /// is unbounded.
    pub fn from_parts(low: Option<(K, bool)>, high: Option<(K, bool)>) -> Self {
        Self {
            low: edge(low),
            high: edge(high),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        let above = match &self.low {
            Bound::Unbounded => true,
            Bound::Included(low) => key >= low,
            Bound::Excluded(low) => key > low,
        };
        let below = match &self.high {
            Bound::Unbounded => true,
            Bound::Included(high) => key <= high,
            Bound::Excluded(high) => key < high,
        };
        above && below
    }

    /// True when no key can satisfy the range. `BTreeMap::range` panics on
    /// such ranges, so scans check this first.
    pub fn is_empty(&self) -> bool {
        match (&self.low, &self.high) {
            (Bound::Included(low), Bound::Included(high)) => low > high,
            (Bound::Included(low) | Bound::Excluded(low), Bound::Included(high) | Bound::Excluded(high)) => {
                low >= high
            }
            _ => false,
        }
    }

    pub fn bounds(&self) -> (Bound<&K>, Bound<&K>) {
        (self.low.as_ref(), self.high.as_ref())
    }
}

/// A k-nearest-neighbour index over fixed-dimension float vectors.
pub trait VectorIndex {
    /// Dimension of every indexed vector.
    fn dim(&self) -> usize;

    /// Brings persisted entries into memory. Loading twice is a no-op.
    fn load(&mut self) -> Result<()>;

    /// Indexes `vector` under `rid`, replacing a previous entry for the rid.
    fn insert(&mut self, rid: Rid, vector: &[f32]) -> Result<()>;

    /// Removes the entry for `rid`. Returns false if there was none.
    fn remove(&mut self, rid: Rid) -> bool;

    /// Returns up to `limit` rids nearest to `vector`, closest first, along
    /// with their distances.
    fn query(&self, vector: &[f32], limit: usize) -> Result<(Vec<Rid>, Vec<f32>)>;

    /// Persists the in-memory entries.
    fn sync(&self) -> Result<()>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_and_only() {
        let all: KeyRange<i32> = KeyRange::all();
        assert!(all.contains(&i32::MIN) && all.contains(&0));

        let only = KeyRange::only(5);
        assert!(!only.contains(&4));
        assert!(only.contains(&5));
        assert!(!only.contains(&6));
    }

    #[test]
    fn test_half_open_sides() {
        let at_least = KeyRange::from_parts(Some((5, true)), None);
        assert!(!at_least.contains(&4) && at_least.contains(&5));

        let above = KeyRange::from_parts(Some((5, false)), None);
        assert!(!above.contains(&5) && above.contains(&6));

        // [5, 10)
        let range = KeyRange::from_parts(Some((5, true)), Some((10, false)));
        assert!(range.contains(&5));
        assert!(range.contains(&9));
        assert!(!range.contains(&10));
        assert_eq!(range.bounds(), (Bound::Included(&5), Bound::Excluded(&10)));
    }

    #[test]
    fn test_empty_range() {
        assert!(KeyRange::from_parts(Some((5, true)), Some((3, true))).is_empty());
        assert!(KeyRange::from_parts(Some((5, false)), Some((5, true))).is_empty());
        assert!(!KeyRange::from_parts(Some((5, true)), Some((5, true))).is_empty());
        assert!(!KeyRange::from_parts(Some((5, true)), None).is_empty());
    }
}

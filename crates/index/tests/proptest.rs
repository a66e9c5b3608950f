//! Property-based tests for shoal-index using proptest.

use proptest::prelude::*;
use shoal_core::{Rid, Value};
use shoal_index::{DistanceMetric, FlatVectorIndex, IndexKey, KeyRange, OrderedIndex, VectorIndex};

proptest! {
    /// Every inserted entry is found by a point lookup.
    #[test]
    fn ordered_insert_get_roundtrip(keys in prop::collection::vec(0i32..10000, 1..300)) {
        let mut index = OrderedIndex::new("idx", false);
        for (i, &key) in keys.iter().enumerate() {
            index.insert_entry(key, Rid::new(0, i as u32)).unwrap();
        }
        for (i, &key) in keys.iter().enumerate() {
            prop_assert!(index.get(&key).contains(&Rid::new(0, i as u32)));
        }
        prop_assert_eq!(index.len(), keys.len());
    }

    /// A range scan returns exactly the entries whose keys fall in the range.
    #[test]
    fn ordered_range_scan_matches_filter(
        keys in prop::collection::vec(-500i32..500, 1..200),
        low in -600i32..600,
        span in 0i32..400,
        low_ex in any::<bool>(),
        high_ex in any::<bool>(),
    ) {
        let mut index = OrderedIndex::new("idx", false);
        for (i, &key) in keys.iter().enumerate() {
            index.insert_entry(key, Rid::new(0, i as u32)).unwrap();
        }
        let range = KeyRange::from_parts(Some((low, !low_ex)), Some((low + span, !high_ex)));
        let mut expected: Vec<(i32, Rid)> = keys
            .iter()
            .enumerate()
            .filter(|(_, k)| range.contains(k))
            .map(|(i, &k)| (k, Rid::new(0, i as u32)))
            .collect();
        expected.sort();
        let expected: Vec<Rid> = expected.into_iter().map(|(_, r)| r).collect();
        prop_assert_eq!(index.scan(&range), expected);
    }

    /// Deleting every entry empties the index.
    #[test]
    fn ordered_delete_all(keys in prop::collection::vec(0i32..100, 1..100)) {
        let mut index = OrderedIndex::new("idx", false);
        for (i, &key) in keys.iter().enumerate() {
            index.insert_entry(key, Rid::new(0, i as u32)).unwrap();
        }
        for (i, &key) in keys.iter().enumerate() {
            index.delete_entry(&key, Rid::new(0, i as u32)).unwrap();
        }
        prop_assert!(index.is_empty());
    }

    /// Composite keys order like the corresponding integer tuples.
    #[test]
    fn index_key_orders_like_tuples(a in (0i32..50, 0i32..50), b in (0i32..50, 0i32..50)) {
        let ka = IndexKey::new(vec![Value::Int(a.0), Value::Int(a.1)]);
        let kb = IndexKey::new(vec![Value::Int(b.0), Value::Int(b.1)]);
        prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
    }

    /// The nearest neighbour under L2 is the exact match when one exists.
    #[test]
    fn flat_index_finds_exact_match(
        vectors in prop::collection::vec(prop::collection::vec(-100.0f32..100.0, 3), 1..50),
        pick in any::<prop::sample::Index>(),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FlatVectorIndex::create(dir.path().join("v.idx"), 3, DistanceMetric::L2).unwrap();
        for (i, v) in vectors.iter().enumerate() {
            index.insert(Rid::new(0, i as u32), v).unwrap();
        }
        let target = pick.index(vectors.len());
        let (_, distances) = index.query(&vectors[target], 1).unwrap();
        prop_assert_eq!(distances[0], 0.0);
    }
}

//! Property-based tests using `proptest`.
//!
//! Membership guarantees that must hold for any set of keys: no false
//! negatives, deterministic hashing, lossless serialization and the
//! superset/subset behaviour of union and intersection.

use dynamic_bloom_rs::{
    BloomFilter, BloomFilterOps, DynamicBloomFilter, HashGenerator,
};
use proptest::prelude::*;

fn keys_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("\\PC{0,24}", 0..60)
}

fn bloom_with(keys: &[String]) -> BloomFilter {
    let mut filter = BloomFilter::with_capacity(100, 0.01).unwrap();
    for key in keys {
        filter.insert(key).unwrap();
    }
    filter
}

fn dynamic_with(keys: &[String]) -> DynamicBloomFilter {
    let mut filter = DynamicBloomFilter::with_params(8, 64, 0.05).unwrap();
    for key in keys {
        filter.insert(key).unwrap();
    }
    filter
}

// ---------- Fixed filter ----------

proptest! {
    #[test]
    fn bloom_has_no_false_negatives(keys in keys_strategy()) {
        let filter = bloom_with(&keys);
        for key in &keys {
            prop_assert!(filter.contains(key));
        }
    }

    #[test]
    fn bloom_round_trips(keys in keys_strategy()) {
        let filter = bloom_with(&keys);
        let restored = BloomFilter::deserialize(&filter.serialize()).unwrap();
        prop_assert_eq!(&restored, &filter);
        for key in &keys {
            prop_assert!(restored.contains(key));
        }
    }

    #[test]
    fn bloom_union_is_superset(a in keys_strategy(), b in keys_strategy()) {
        let (fa, fb) = (bloom_with(&a), bloom_with(&b));
        let union = fa.union(&fb).unwrap();
        for key in a.iter().chain(b.iter()) {
            prop_assert!(union.contains(key));
        }
    }

    #[test]
    fn bloom_intersection_keeps_common(a in keys_strategy(), b in keys_strategy()) {
        let (fa, fb) = (bloom_with(&a), bloom_with(&b));
        let intersection = fa.intersection(&fb).unwrap();
        for key in a.iter().chain(b.iter()) {
            if fa.contains(key) && fb.contains(key) {
                prop_assert!(intersection.contains(key));
            }
        }
    }

    #[test]
    fn hash_is_deterministic(
        key in "\\PC*",
        num_slices in 1usize..40,
        bits_per_slice in 1usize..100_000,
    ) {
        let generator = HashGenerator::new(num_slices, bits_per_slice).unwrap();
        let first = generator.hash(&key);
        prop_assert_eq!(first.len(), num_slices);
        prop_assert!(first.iter().all(|h| *h < bits_per_slice));
        prop_assert_eq!(generator.hash(&key), first);
    }

    #[test]
    fn deserialize_never_panics(s in "\\PC{0,200}") {
        let _ = BloomFilter::deserialize(&s);
        let _ = DynamicBloomFilter::deserialize(&s);
    }
}

// ---------- Dynamic filter ----------

proptest! {
    #[test]
    fn dynamic_has_no_false_negatives(keys in keys_strategy()) {
        let filter = dynamic_with(&keys);
        for key in &keys {
            prop_assert!(filter.contains(key));
        }
    }

    #[test]
    fn dynamic_round_trips(keys in keys_strategy()) {
        let filter = dynamic_with(&keys);
        let restored =
            DynamicBloomFilter::deserialize(&filter.serialize()).unwrap();
        prop_assert_eq!(&restored, &filter);
    }

    #[test]
    fn dynamic_union_is_superset(a in keys_strategy(), b in keys_strategy()) {
        let (fa, fb) = (dynamic_with(&a), dynamic_with(&b));
        let union = fa.union(&fb).unwrap();
        for key in a.iter().chain(b.iter()) {
            prop_assert!(union.contains(key));
        }
    }

    #[test]
    fn dynamic_intersection_keeps_common(
        a in keys_strategy(),
        b in keys_strategy(),
    ) {
        let (fa, fb) = (dynamic_with(&a), dynamic_with(&b));
        let intersection = fa.intersection(&fb).unwrap();
        for key in a.iter().chain(b.iter()) {
            if fa.contains(key) && fb.contains(key) {
                prop_assert!(intersection.contains(key));
            }
        }
    }
}

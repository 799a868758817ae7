// BucketHashMap public API suite.
//
// Each test documents what behavior is being verified. The core
// invariants exercised:
// - Uniqueness: duplicate insert returns false without side effects.
// - Resize: capacity is a power of two, at least 16, and follows the
//   0.25/0.75 load-factor bounds one doubling or halving at a time.
// - Iteration: begin..end and iter() each cover every entry once.
// - Equality: by content, not by bucket layout.
use bucket_hashmap::{BucketHashMap, Error, ResizePolicy, START_CAPACITY};
use std::collections::BTreeMap;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Test: 20 distinct keys from a fresh map.
// Verifies: 13th insert pushes 13/16 over 0.75 and doubles to 32; the
// remaining inserts leave it there (20/32 = 0.625).
#[test]
fn twenty_inserts_grow_to_32() {
    init_logging();
    let mut m = BucketHashMap::new();
    assert_eq!(m.capacity(), START_CAPACITY);
    for i in 0..20u64 {
        assert!(m.insert(i, i * i));
    }
    assert_eq!(m.len(), 20);
    assert_eq!(m.capacity(), 32);
}

// Test: grow then erase most entries.
// Verifies: capacity halves back toward 16 as the load factor drops under
// 0.25 and never goes below 16.
#[test]
fn sixteen_inserts_then_thirteen_erases_shrink_to_16() {
    init_logging();
    let mut m = BucketHashMap::new();
    for i in 0..16u32 {
        m.insert(i, ());
    }
    assert_eq!(m.capacity(), 32);
    for i in 0..13u32 {
        assert!(m.erase(&i));
        assert!(m.capacity() >= START_CAPACITY);
    }
    assert_eq!(m.len(), 3);
    assert_eq!(m.capacity(), 16);
    for i in 13..16u32 {
        assert!(m.erase(&i));
    }
    assert!(m.is_empty());
    assert_eq!(m.capacity(), 16);
}

// Test: mismatched parallel sequences.
// Verifies: construction fails with LengthMismatch; no map is produced.
#[test]
fn mismatched_lengths_fail() {
    let r = BucketHashMap::<&str, &str>::from_keys_values(["x", "y"], ["1"]);
    match r {
        Err(Error::LengthMismatch { keys: 2, values: 1 }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

// Test: bulk construction from a large input.
// Verifies: capacity converges to what incremental growth would reach and
// every pair is retrievable.
#[test]
fn bulk_construction_converges() {
    init_logging();
    let keys: Vec<String> = (0..5000).map(|i| format!("key-{i}")).collect();
    let values: Vec<usize> = (0..5000).collect();
    let m = BucketHashMap::from_keys_values(keys, values).unwrap();
    assert_eq!(m.len(), 5000);
    // 5000 / 8192 = 0.61; 5000 / 4096 = 1.22.
    assert_eq!(m.capacity(), 8192);
    for i in 0..5000 {
        assert_eq!(m.at(format!("key-{i}").as_str()), Ok(&i));
    }
}

// Test: round trip until erase.
// Verifies: at(k) == v for every inserted key; rejected overwrite keeps v.
#[test]
fn round_trip_until_erase() {
    let mut m: BucketHashMap<String, String> = BucketHashMap::new();
    for i in 0..50 {
        assert!(m.insert(format!("k{i}"), format!("v{i}")));
    }
    for i in 0..50 {
        assert!(!m.insert(format!("k{i}"), "overwrite".to_string()));
    }
    for i in 0..50 {
        assert_eq!(m.at(format!("k{i}").as_str()).unwrap(), &format!("v{i}"));
    }
    assert!(m.erase("k7"));
    assert_eq!(m.at("k7"), Err(Error::KeyNotFound));
    assert_eq!(m.len(), 49);
}

// Test: full traversal through both iteration forms.
// Verifies: begin..end and iter() yield exactly len() distinct keys that
// match the stored contents.
#[test]
fn iteration_is_complete() {
    let mut m = BucketHashMap::new();
    let mut model = BTreeMap::new();
    for i in 0..300u32 {
        let k = i.wrapping_mul(2_654_435_761);
        m.insert(k, i);
        model.insert(k, i);
    }
    for i in (0..300u32).step_by(3) {
        let k = i.wrapping_mul(2_654_435_761);
        m.erase(&k);
        model.remove(&k);
    }

    let via_iter: BTreeMap<u32, u32> = m.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(via_iter, model);
    assert_eq!(m.iter().len(), m.len());

    let mut via_cursor = BTreeMap::new();
    let mut c = m.begin();
    let end = m.end();
    let mut steps = 0;
    while c != end {
        let (k, v) = m.entry_at(c).expect("cursor before end");
        assert!(via_cursor.insert(*k, *v).is_none(), "key visited twice");
        m.advance(&mut c);
        steps += 1;
    }
    assert_eq!(steps, m.len());
    assert_eq!(via_cursor, model);
}

// Test: clear twice.
// Verifies: size drops to 0 and capacity is unchanged both times.
#[test]
fn clear_is_idempotent() {
    let mut m: BucketHashMap<u32, u32> = (0..40).map(|i| (i, i)).collect();
    let cap = m.capacity();
    m.clear();
    assert_eq!((m.len(), m.capacity()), (0, cap));
    m.clear();
    assert_eq!((m.len(), m.capacity()), (0, cap));
    assert_eq!(m.begin(), m.end());
}

// Test: copies and assignment.
// Verifies: clone is deep and keeps capacity; clone_from replaces the old
// contents entirely.
#[test]
fn copies_are_deep() {
    let original: BucketHashMap<String, Vec<u8>> =
        (0..30u8).map(|i| (format!("k{i}"), vec![i])).collect();
    let mut copy = original.clone();
    assert_eq!(copy.capacity(), original.capacity());
    copy.get_mut("k3").unwrap().push(99);
    assert_eq!(original["k3"], vec![3]);
    assert_eq!(copy["k3"], vec![3, 99]);

    let mut target: BucketHashMap<String, Vec<u8>> = BucketHashMap::new();
    target.insert("stale".to_string(), vec![]);
    target.clone_from(&original);
    assert_eq!(target, original);
    assert!(!target.contains_key("stale"));
}

// Test: equality semantics.
// Verifies: same pairs compare equal regardless of insertion order or
// capacity; a differing value or missing key does not.
#[test]
fn equality_by_content() {
    let a: BucketHashMap<&str, i32> = [("x", 1), ("y", 2), ("z", 3)].into_iter().collect();
    let b: BucketHashMap<&str, i32> = [("z", 3), ("x", 1), ("y", 2)].into_iter().collect();
    assert_eq!(a, b);

    let mut c = b.clone();
    *c.get_mut(&"z").unwrap() = 4;
    assert_ne!(a, c);

    let mut d = b.clone();
    d.erase(&"z");
    assert_ne!(a, d);
}

// Test: indexing a missing key.
// Verifies: panics rather than inserting or returning another entry.
#[test]
#[should_panic(expected = "key not found")]
fn index_missing_panics() {
    let m: BucketHashMap<String, i32> = BucketHashMap::new();
    let _v: &i32 = &m["ghost"];
}

// Test: lenient lookup kept for legacy callers.
// Verifies: the first iterated value stands in for a missing key.
#[test]
fn get_or_first_falls_back_to_first_entry() {
    let m: BucketHashMap<&str, i32> = [("only", 42)].into_iter().collect();
    assert_eq!(m.get_or_first(&"only"), Some(&42));
    assert_eq!(m.get_or_first(&"missing"), Some(&42));
}

// Test: custom policy.
// Verifies: a tighter upper bound grows earlier and an invalid policy is
// rejected up front.
#[test]
fn custom_policy() {
    let policy = ResizePolicy::new(8, 0.25, 0.5).unwrap();
    let mut m = BucketHashMap::with_policy(policy);
    assert_eq!(m.capacity(), 8);
    for i in 0..5u8 {
        m.insert(i, i);
    }
    // 5/8 > 0.5
    assert_eq!(m.capacity(), 16);
    assert_eq!(m.policy(), &policy);

    assert!(matches!(
        ResizePolicy::new(10, 0.25, 0.75),
        Err(Error::InvalidPolicy { .. })
    ));
}

// Test: errors render human-readable messages.
#[test]
fn error_messages() {
    assert_eq!(Error::KeyNotFound.to_string(), "key not found");
    assert_eq!(
        Error::LengthMismatch { keys: 2, values: 1 }.to_string(),
        "key and value sequences differ in length (keys: 2, values: 1)"
    );
    assert_eq!(
        Error::InvalidKey.to_string(),
        "invalid key: not present in dictionary"
    );
}

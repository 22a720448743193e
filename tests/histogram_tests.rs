// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use serde_json::json;
use std::ops::ControlFlow;
use swiftset::*;

const EPSILON: f64 = 1e-12;

// ============================================================================
// Counting
// ============================================================================

#[test]
fn test_add_and_count() {
    let mut hist = Histogram::new();
    hist.add("a").unwrap();
    hist.add("b").unwrap();
    hist.add("a").unwrap();
    hist.add_count("c", 5).unwrap();

    assert_eq!(hist.size(), 3);
    assert_eq!(hist.count(&"a"), 2);
    assert_eq!(hist.count(&"b"), 1);
    assert_eq!(hist.count(&"c"), 5);
    assert_eq!(hist.count(&"z"), 0);
    assert_eq!(hist.max(), 5);
    assert!(hist.has(&"a"));
    assert!(!hist.has(&"z"));
}

#[test]
fn test_first_item_is_representative() {
    let first = json!({"id": 1, "name": "first"});
    let second = json!({"id": 1, "name": "second"});
    let hist =
        Histogram::from_items_with(vec![first.clone(), second.clone()], KeyPolicy::property("id"))
            .unwrap();

    assert_eq!(hist.size(), 1);
    assert_eq!(hist.count(&second), 2);
    assert_eq!(hist.items().next(), Some(&first));
    assert_eq!(hist.get(&second).map(|e| &e.item), Some(&first));
}

#[test]
fn test_remove_deletes_whole_entry() {
    let mut hist = Histogram::from_items(vec![1, 1, 1, 2]).unwrap();
    assert!(hist.remove(&1));
    assert_eq!(hist.count(&1), 0);
    assert_eq!(hist.size(), 1);
    assert!(!hist.remove(&1));
    assert_eq!(hist.max(), 1);
}

#[test]
fn test_remove_items() {
    let mut hist = Histogram::from_items(vec![1, 2, 3, 4]).unwrap();
    let removed = hist.remove_items(&[2, 4, 6]);
    assert_eq!(removed, 2);
    assert_eq!(hist.size(), 2);
    assert!(hist.has(&1) && hist.has(&3));
}

#[test]
fn test_missing_property_is_invalid_key() {
    let items = vec![json!({"id": "o1"}), json!({"name": "anon"}), json!({"id": "o3"})];
    let mut hist = Histogram::with_policy(KeyPolicy::property("id"));
    let err = hist.add_items(items).unwrap_err();

    assert!(matches!(err, SetError::InvalidKey(_)));
    // Items before the failure stay counted.
    assert_eq!(hist.size(), 1);
    assert!(hist.has(&json!({"id": "o1"})));
    assert!(!hist.has(&json!({"name": "anon"})));
}

#[test]
fn test_function_key_policy() {
    let hist = Histogram::from_items_with(
        vec!["Apple", "apple", "APPLE", "pear"],
        KeyPolicy::function(|s: &&str| s.to_lowercase()),
    )
    .unwrap();
    assert_eq!(hist.size(), 2);
    assert_eq!(hist.count(&"ApPlE"), 3);
}

#[test]
fn test_own_key_is_used_by_default() {
    let hist = Histogram::from_items(vec![
        json!({"key": "k1", "v": 1}),
        json!({"key": "k1", "v": 2}),
        json!({"v": 3}),
    ])
    .unwrap();
    assert_eq!(hist.size(), 2);
    assert_eq!(hist.count(&json!({"key": "k1"})), 2);
}

// ============================================================================
// Merge & Normalize
// ============================================================================

#[test]
fn test_merge_sums_counts() {
    let mut a = Histogram::from_items(vec!['x', 'x', 'y']).unwrap();
    let b = Histogram::from_items(vec!['y', 'z', 'z', 'z']).unwrap();
    a.merge(&b).unwrap();

    assert_eq!(a.count(&'x'), 2);
    assert_eq!(a.count(&'y'), 2);
    assert_eq!(a.count(&'z'), 3);
    assert_eq!(a.max(), 3);
    assert_eq!(a.total(), 7);
}

#[test]
fn test_merge_encodes_provenance() {
    let mut a = Histogram::from_items(vec![1, 2, 3]).unwrap();
    let mut b = Histogram::from_items(vec![2, 3, 3, 4]).unwrap();
    b.normalize(2).unwrap();
    a.merge(&b).unwrap();

    assert_eq!(a.count(&1), ONLY_IN_A);
    assert_eq!(a.count(&2), IN_BOTH);
    assert_eq!(a.count(&3), IN_BOTH);
    assert_eq!(a.count(&4), ONLY_IN_B);
    assert_eq!(a.keyify(), "{1:1,2:3,3:3,4:2}");
}

#[test]
fn test_count_overflow_is_rejected() {
    let mut hist = Histogram::from_items(vec![1u8]).unwrap();
    let err = hist.add_count(1, u64::MAX).unwrap_err();

    assert!(matches!(err, SetError::InvalidCount(_)));
    assert_eq!(hist.count(&1), 1);
    assert_eq!(hist.max(), 1);
    assert_eq!(hist.keyify(), "{1:1}");
}

#[test]
fn test_merge_overflow_is_rejected() {
    let mut a = Histogram::new();
    a.add_count('x', u64::MAX - 1).unwrap();
    let mut b = Histogram::new();
    b.add_count('x', 2).unwrap();

    assert!(matches!(a.merge(&b), Err(SetError::InvalidCount(_))));
    assert_eq!(a.count(&'x'), u64::MAX - 1);
}

#[test]
fn test_total_saturates() {
    let mut hist = Histogram::new();
    hist.add_count(1, u64::MAX).unwrap();
    hist.add_count(2, 1).unwrap();

    assert_eq!(hist.max(), u64::MAX);
    assert_eq!(hist.total(), u64::MAX);
    assert!(hist.average().is_finite());
    assert!(hist.entropy() >= 0.0);
}

#[test]
fn test_normalize() {
    let mut hist = Histogram::from_items(vec![1, 1, 1, 2, 3, 3]).unwrap();
    hist.normalize(1).unwrap();
    assert_eq!(hist.counts().collect::<Vec<_>>(), vec![1, 1, 1]);
    assert_eq!(hist.max(), 1);

    hist.normalize(4).unwrap();
    assert_eq!(hist.min(), 4);
    assert_eq!(hist.max(), 4);
}

#[test]
fn test_copy_is_independent() {
    let original = Histogram::from_items(vec![1, 2, 2]).unwrap();
    let mut copy = original.copy();
    copy.add(3).unwrap();
    copy.remove(&1);

    assert_eq!(original.keyify(), "{1:1,2:2}");
    assert_eq!(copy.keyify(), "{2:2,3:1}");
}

// ============================================================================
// Iteration
// ============================================================================

#[test]
fn test_each_visits_all_entries() {
    let hist = Histogram::from_items(vec![7, 8, 8, 9, 9, 9]).unwrap();
    let mut seen = Vec::new();
    let flow = hist.each(|item, count, key| {
        seen.push((*item, count, key.to_string()));
        ControlFlow::Continue(())
    });
    seen.sort();

    assert_eq!(flow, ControlFlow::Continue(()));
    assert_eq!(
        seen,
        vec![(7, 1, "7".to_string()), (8, 2, "8".to_string()), (9, 3, "9".to_string())]
    );
}

#[test]
fn test_each_stops_early() {
    let hist = Histogram::from_items(1..=10).unwrap();
    let mut visits = 0;
    let flow = hist.each(|_, _, _| {
        visits += 1;
        if visits == 3 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    assert_eq!(flow, ControlFlow::Break(()));
    assert_eq!(visits, 3);
}

#[test]
fn test_items_counts_keys_line_up() {
    let hist = Histogram::from_items(vec!["a", "b", "b"]).unwrap();
    let items: Vec<_> = hist.items().copied().collect();
    let counts: Vec<_> = hist.counts().collect();
    let keys: Vec<_> = hist.keys().collect();

    for ((item, count), key) in items.iter().zip(&counts).zip(&keys) {
        assert_eq!(item, key);
        assert_eq!(hist.count(item), *count);
    }
    assert_eq!(hist.map(|_, count, _| count * 10).iter().sum::<u64>(), 30);
}

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_statistics() {
    let hist = Histogram::from_items(vec![7, 7, 8, 8, 9]).unwrap();
    assert_eq!(hist.min(), 1);
    assert_eq!(hist.max(), 2);
    assert_eq!(hist.total(), 5);
    assert!((hist.average() - 5.0 / 3.0).abs() < EPSILON);
}

#[test]
fn test_entropy() {
    let fair_coin = Histogram::from_items(vec!["h", "t"]).unwrap();
    assert!((fair_coin.entropy() - 1.0).abs() < EPSILON);

    let four_sides = Histogram::from_items(vec![1, 1, 2, 2, 3, 3, 4, 4]).unwrap();
    assert!((four_sides.entropy() - 2.0).abs() < EPSILON);

    let constant = Histogram::from_items(vec![5, 5, 5]).unwrap();
    assert!(constant.entropy().abs() < EPSILON);

    let skewed = Histogram::from_items(vec!['a', 'a', 'a', 'b']).unwrap();
    let expected = -(0.75f64 * 0.75f64.log2() + 0.25f64 * 0.25f64.log2());
    assert!((skewed.entropy() - expected).abs() < EPSILON);
}

#[test]
fn test_empty_statistics() {
    let hist = Histogram::<i32>::new();
    assert_eq!(hist.size(), 0);
    assert_eq!(hist.max(), 0);
    assert_eq!(hist.min(), 0);
    assert_eq!(hist.total(), 0);
    assert!(hist.average().is_nan());
    assert!(hist.entropy().is_nan());
}

// ============================================================================
// Equality & Serialization
// ============================================================================

#[test]
fn test_keyify_and_equals() {
    let a = Histogram::from_items(vec![3, 1, 2, 2]).unwrap();
    let b = Histogram::from_items(vec![2, 1, 2, 3]).unwrap();
    let c = Histogram::from_items(vec![1, 2, 3]).unwrap();

    assert_eq!(a.keyify(), "{1:1,2:2,3:1}");
    assert!(a.equals(&b));
    assert_eq!(a, b);
    assert!(!a.equals(&c));
    assert_eq!(format!("{}", c), "{1:1,2:1,3:1}");
}

#[test]
fn test_keyify_sorts_as_strings() {
    let hist = Histogram::from_items(vec![10, 9, 100]).unwrap();
    assert_eq!(hist.keyify(), "{100:1,10:1,9:1}");
}

#[test]
fn test_keyify_sorts_by_utf16_code_units() {
    // U+10000 encodes as a surrogate pair (0xD800 ..), below U+FF61.
    let hist = Histogram::from_items(vec!['\u{FF61}', '\u{10000}']).unwrap();
    assert_eq!(hist.keyify(), "{\u{10000}:1,\u{FF61}:1}");
}

#[test]
fn test_serialize_as_map() {
    let hist = Histogram::from_items(vec!["a", "b", "b"]).unwrap();
    let value = serde_json::to_value(&hist).unwrap();
    assert_eq!(
        value,
        json!({
            "a": {"item": "a", "count": 1},
            "b": {"item": "b", "count": 2}
        })
    );
}

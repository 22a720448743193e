// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Set operations on plain collections.
//!
//! These run the same provenance protocol as the [`Set`](crate::Set) methods but
//! without building histograms or sets: one map from key to `(item, provenance)`
//! is filled from `a`, then updated from `b`. Items are moved, never cloned.
//! Results match the corresponding `Set` operation as sets; their order is
//! unspecified.
//!
//! The key policy is passed explicitly to every call.
//!
//! # Example
//!
//! ```
//! use swiftset::{ops, KeyPolicy};
//!
//! let mut both = ops::intersection(vec![1, 1, 2], vec![2, 2, 3], KeyPolicy::Default).unwrap();
//! both.sort();
//! assert_eq!(both, vec![2]);
//!
//! assert!(ops::equals(vec![1, 1, 2], vec![1, 2, 2], KeyPolicy::Default).unwrap());
//! assert!(!ops::equals(vec![1, 1, 2], vec![1, 2, 3], KeyPolicy::Default).unwrap());
//! ```

use crate::enums::SetOperation;
use crate::key::{Key, KeyPolicy};
use crate::set::{IN_BOTH, ONLY_IN_A, ONLY_IN_B};
use crate::traits::{Keyable, SetError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

struct Tally<T> {
    item: T,
    provenance: u64,
}

fn process<T, A, B>(a: A, b: B, policy: KeyPolicy<T>) -> Result<HashMap<Key, Tally<T>>, SetError>
where
    T: Keyable + 'static,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let selector = policy.resolve();
    let mut tallies: HashMap<Key, Tally<T>> = HashMap::new();

    for item in a {
        let key = selector.key_of(&item)?;
        tallies.entry(key).or_insert(Tally {
            item,
            provenance: ONLY_IN_A,
        });
    }

    for item in b {
        let key = selector.key_of(&item)?;
        match tallies.entry(key) {
            Entry::Occupied(mut occupied) => {
                let tally = occupied.get_mut();
                if tally.provenance == ONLY_IN_A {
                    tally.provenance = IN_BOTH;
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Tally {
                    item,
                    provenance: ONLY_IN_B,
                });
            }
        }
    }

    Ok(tallies)
}

/// Runs the named operation on `a` and `b`.
pub fn apply<T, A, B>(op: SetOperation, a: A, b: B, policy: KeyPolicy<T>) -> Result<Vec<T>, SetError>
where
    T: Keyable + 'static,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let tallies = process(a, b, policy)?;
    let merged = tallies.len();
    let evaluator = op.evaluator();
    let out: Vec<T> = tallies
        .into_values()
        .filter(|tally| evaluator.keeps(tally.provenance))
        .map(|tally| tally.item)
        .collect();
    tracing::trace!(operation = %op, merged, selected = out.len(), "collection set operation");
    Ok(out)
}

/// Items from either collection, once per key.
pub fn union<T, A, B>(a: A, b: B, policy: KeyPolicy<T>) -> Result<Vec<T>, SetError>
where
    T: Keyable + 'static,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    apply(SetOperation::Union, a, b, policy)
}

/// Items whose key appears in both collections.
pub fn intersection<T, A, B>(a: A, b: B, policy: KeyPolicy<T>) -> Result<Vec<T>, SetError>
where
    T: Keyable + 'static,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    apply(SetOperation::Intersection, a, b, policy)
}

/// Items whose key appears in exactly one collection.
pub fn difference<T, A, B>(a: A, b: B, policy: KeyPolicy<T>) -> Result<Vec<T>, SetError>
where
    T: Keyable + 'static,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    apply(SetOperation::Difference, a, b, policy)
}

/// Items of `a` whose key does not appear in `b`.
pub fn complement<T, A, B>(a: A, b: B, policy: KeyPolicy<T>) -> Result<Vec<T>, SetError>
where
    T: Keyable + 'static,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    apply(SetOperation::Complement, a, b, policy)
}

/// Returns true if both collections hold the same keys. Two empty collections
/// are equal.
pub fn equals<T, A, B>(a: A, b: B, policy: KeyPolicy<T>) -> Result<bool, SetError>
where
    T: Keyable + 'static,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let tallies = process(a, b, policy)?;
    Ok(tallies.values().all(|tally| tally.provenance == IN_BOTH))
}

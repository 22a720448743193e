// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::enums::{Evaluator, SetOperation};
use crate::histogram::Histogram;
use crate::key::{KeyPolicy, KeySelector};
use crate::traits::{Envelope, Keyable, SetError};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::ops::ControlFlow;

/// Merged count of a key present only in the receiver of a set operation.
pub const ONLY_IN_A: u64 = 1;
/// Merged count of a key present only in the operand of a set operation.
pub const ONLY_IN_B: u64 = 2;
/// Merged count of a key present in both sets.
pub const IN_BOTH: u64 = ONLY_IN_A + ONLY_IN_B;

/// Set: unique items, backed by a [`Histogram`] whose counts are always 1.
///
/// Membership is decided by key, so items are deduplicated under the set's
/// [`KeyPolicy`]. The first item added for a key is the one the set keeps.
///
/// # Set Operations
///
/// The binary operations merge two histograms built from the receiver (A) and
/// the operand (B). A is counted once per key; B is normalized to a count of 2.
/// After the merge, each key's count records where it came from:
///
/// | count | meaning        |
/// |-------|----------------|
/// | 1     | only in A      |
/// | 2     | only in B      |
/// | 3     | in both        |
///
/// `union` keeps every key, `intersection` keeps 3, `difference` (symmetric)
/// keeps 1 and 2, `complement` (A minus B) keeps 1.
///
/// # Example
///
/// ```
/// use swiftset::Set;
///
/// let set = Set::new(vec![1, 2, 2, 3, 3, 3]).unwrap();
/// assert_eq!(set.size(), 3);
///
/// let both = set.intersection(vec![2, 3, 4]).unwrap();
/// assert_eq!(both.keyify(), "{2:1,3:1}");
///
/// let only_a = set.complement(&both).unwrap();
/// assert_eq!(only_a.keyify(), "{1:1}");
/// ```
pub struct Set<T> {
    hist: Histogram<T>,
}

impl<T: Keyable + 'static> Set<T> {
    /// Builds a set from `items` using the default key policy.
    pub fn new<I>(items: I) -> Result<Self, SetError>
    where
        I: IntoIterator<Item = T>,
    {
        Self::with_policy(items, KeyPolicy::Default)
    }

    /// Builds a set from `items` using the given key policy.
    pub fn with_policy<I>(items: I, policy: KeyPolicy<T>) -> Result<Self, SetError>
    where
        I: IntoIterator<Item = T>,
    {
        Self::with_selector(items, policy.resolve())
    }

    /// An empty set using the default key policy.
    pub fn empty() -> Self {
        Self {
            hist: Histogram::new(),
        }
    }
}

impl<T: Keyable + 'static> Default for Set<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Set<T> {
    /// Builds a set from `items` sharing an already resolved key selector.
    pub fn with_selector<I>(items: I, selector: KeySelector<T>) -> Result<Self, SetError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self {
            hist: Histogram::with_selector(selector),
        };
        set.add_items(items)?;
        Ok(set)
    }

    /// The backing histogram.
    pub fn histogram(&self) -> &Histogram<T> {
        &self.hist
    }

    pub fn selector(&self) -> &KeySelector<T> {
        self.hist.selector()
    }

    /// Adds `item` unless its key is already present. Returns true if added.
    pub fn add(&mut self, item: T) -> Result<bool, SetError> {
        self.hist.add_unique(item)
    }

    /// Adds each item in order. Stops at the first item without a derivable key.
    pub fn add_items<I>(&mut self, items: I) -> Result<(), SetError>
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.hist.add_unique(item)?;
        }
        Ok(())
    }

    /// Removes `item`'s key. Returns true if it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        self.hist.remove(item)
    }

    /// Removes each item's key. Returns how many were present.
    pub fn remove_items<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.hist.remove_items(items)
    }

    /// Discards every member and refills the set from `items` with the same key
    /// policy.
    pub fn clear<I>(&mut self, items: I) -> Result<(), SetError>
    where
        I: IntoIterator<Item = T>,
    {
        tracing::trace!(previous = self.size(), policy = self.selector().label(), "clearing set");
        self.hist.clear();
        self.add_items(items)
    }

    /// The members, in histogram order.
    pub fn items(&self) -> impl Iterator<Item = &T> + '_ {
        self.hist.items()
    }

    /// The members with any wrapper envelopes stripped.
    pub fn unwrap(&self) -> impl Iterator<Item = &T::Inner> + '_
    where
        T: Envelope,
    {
        self.hist.unwrap()
    }

    /// Consumes the set, returning its members.
    pub fn into_items(self) -> Vec<T> {
        self.hist.into_items()
    }

    /// Visits every member as `(item, count, key)` until the visitor breaks.
    /// The count is always 1.
    pub fn each<F>(&self, visitor: F) -> ControlFlow<()>
    where
        F: FnMut(&T, u64, &str) -> ControlFlow<()>,
    {
        self.hist.each(visitor)
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.hist.size()
    }

    pub fn is_empty(&self) -> bool {
        self.hist.is_empty()
    }

    /// Returns true if `item`'s key is a member.
    pub fn has(&self, item: &T) -> bool {
        self.hist.has(item)
    }

    /// Canonical, order-independent encoding of the members' keys, e.g.
    /// `{7:1,8:1,9:1}`.
    pub fn keyify(&self) -> String {
        self.hist.keyify()
    }
}

impl<T: Clone> Set<T> {
    /// Merges the receiver (counted once per key) with `other` (normalized to 2)
    /// and returns the merged histogram, whose counts are
    /// [`ONLY_IN_A`], [`ONLY_IN_B`] or [`IN_BOTH`].
    ///
    /// `other` may be any collection of items, including another set.
    pub fn provenance<I>(&self, other: I) -> Result<Histogram<T>, SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut a = Histogram::with_selector(self.selector().clone());
        for item in self.items() {
            a.add(item.clone())?;
        }

        let mut b = Histogram::with_selector(self.selector().clone());
        for item in other {
            b.add(item.borrow().clone())?;
        }
        b.set_counts(ONLY_IN_B);

        a.merge(&b)?;
        Ok(a)
    }

    fn process<I>(&self, other: I, op: SetOperation) -> Result<Set<T>, SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut merged = self.provenance(other)?;
        let merged_size = merged.size();
        let evaluator: Evaluator = op.evaluator();
        merged.retain(|entry| evaluator.keeps(entry.count));
        merged.set_counts(1);
        tracing::trace!(
            operation = %op,
            receiver = self.size(),
            merged = merged_size,
            selected = merged.size(),
            "set operation"
        );
        Ok(Set { hist: merged })
    }

    /// Runs the named operation.
    pub fn apply<I>(&self, op: SetOperation, other: I) -> Result<Set<T>, SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.process(other, op)
    }

    /// Items from either set.
    pub fn union<I>(&self, other: I) -> Result<Set<T>, SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.process(other, SetOperation::Union)
    }

    /// Items common to both sets.
    pub fn intersection<I>(&self, other: I) -> Result<Set<T>, SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.process(other, SetOperation::Intersection)
    }

    /// Symmetric difference: items in exactly one of the sets. For disjoint sets
    /// this is the union.
    pub fn difference<I>(&self, other: I) -> Result<Set<T>, SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.process(other, SetOperation::Difference)
    }

    /// Relative complement: items of this set that are not in `other`.
    pub fn complement<I>(&self, other: I) -> Result<Set<T>, SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.process(other, SetOperation::Complement)
    }

    /// Returns true if `other` holds exactly the same keys as this set. Two empty
    /// sets are equal.
    pub fn equals<I>(&self, other: I) -> Result<bool, SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let merged = self.provenance(other)?;
        Ok(merged.is_empty() || (merged.min() == IN_BOTH && merged.max() == IN_BOTH))
    }

    /// Replaces this set's members with the result of the named operation.
    pub fn apply_in_place<I>(&mut self, op: SetOperation, other: I) -> Result<(), SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.hist = self.process(other, op)?.hist;
        Ok(())
    }

    /// In-place [`union`](Self::union).
    pub fn union_with<I>(&mut self, other: I) -> Result<(), SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.apply_in_place(SetOperation::Union, other)
    }

    /// In-place [`intersection`](Self::intersection).
    pub fn intersect_with<I>(&mut self, other: I) -> Result<(), SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.apply_in_place(SetOperation::Intersection, other)
    }

    /// In-place [`difference`](Self::difference).
    pub fn difference_with<I>(&mut self, other: I) -> Result<(), SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.apply_in_place(SetOperation::Difference, other)
    }

    /// In-place [`complement`](Self::complement).
    pub fn complement_with<I>(&mut self, other: I) -> Result<(), SetError>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.apply_in_place(SetOperation::Complement, other)
    }
}

impl<T: Clone> Clone for Set<T> {
    fn clone(&self) -> Self {
        Self {
            hist: self.hist.clone(),
        }
    }
}

impl<T> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.keyify() == other.keyify()
    }
}

impl<T> fmt::Display for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyify())
    }
}

impl<T: fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items()).finish()
    }
}

/// Sets can be members of other sets; they are keyed by their contents.
impl<T> Keyable for Set<T> {
    fn identity(&self) -> String {
        self.keyify()
    }
}

impl<T: Serialize> Serialize for Set<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.size()))?;
        for item in self.items() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = Box<dyn Iterator<Item = &'a T> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.items())
    }
}

impl<T> From<Histogram<T>> for Set<T> {
    /// Keeps every key of the histogram, dropping its counts.
    fn from(mut hist: Histogram<T>) -> Self {
        hist.set_counts(1);
        Set { hist }
    }
}

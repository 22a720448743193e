// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::key::{Key, KeyPolicy, KeySelector};
use crate::traits::{Envelope, Keyable, SetError};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;

/// A single histogram slot: the representative item for a key and how many
/// times that key has been counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramEntry<T> {
    /// The first item added under this key.
    pub item: T,
    /// Occurrence count, always at least 1.
    pub count: u64,
}

/// Histogram: an exact frequency count of items, keyed by a pluggable key policy.
///
/// Each distinct key maps to one [`HistogramEntry`]. Adding an item whose key is
/// already present only grows the count; the first item seen for a key remains
/// its representative. Merging sums counts key by key, which is what the
/// [`Set`](crate::Set) operations are built on.
///
/// # Invariants
///
/// - `size()` equals the number of distinct keys.
/// - `max()` equals the largest count (0 when empty).
/// - Every present key has a count of at least 1.
///
/// # Example
///
/// ```
/// use swiftset::Histogram;
///
/// let hist = Histogram::from_items(vec![7, 7, 8, 8, 9, 9]).unwrap();
/// assert_eq!(hist.size(), 3);
/// assert_eq!(hist.max(), 2);
/// assert_eq!(hist.count(&8), 2);
/// assert_eq!(hist.keyify(), "{7:2,8:2,9:2}");
/// ```
pub struct Histogram<T> {
    entries: HashMap<Key, HistogramEntry<T>>,
    max: u64,
    selector: KeySelector<T>,
}

impl<T: Keyable + 'static> Histogram<T> {
    /// Creates an empty histogram using the default key policy.
    pub fn new() -> Self {
        Self::with_policy(KeyPolicy::Default)
    }

    /// Creates an empty histogram using the given key policy.
    pub fn with_policy(policy: KeyPolicy<T>) -> Self {
        Self::with_selector(policy.resolve())
    }

    /// Builds a histogram from `items` using the default key policy.
    pub fn from_items<I>(items: I) -> Result<Self, SetError>
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_items_with(items, KeyPolicy::Default)
    }

    /// Builds a histogram from `items` using the given key policy.
    pub fn from_items_with<I>(items: I, policy: KeyPolicy<T>) -> Result<Self, SetError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut hist = Self::with_policy(policy);
        hist.add_items(items)?;
        Ok(hist)
    }
}

impl<T: Keyable + 'static> Default for Histogram<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Histogram<T> {
    /// Creates an empty histogram sharing an already resolved key selector.
    pub fn with_selector(selector: KeySelector<T>) -> Self {
        Self {
            entries: HashMap::new(),
            max: 0,
            selector,
        }
    }

    /// The key selector this histogram derives keys with.
    pub fn selector(&self) -> &KeySelector<T> {
        &self.selector
    }

    /// Derives the key of `item` under this histogram's policy.
    pub fn key_of(&self, item: &T) -> Result<Key, SetError> {
        self.selector.key_of(item)
    }

    /// Counts one occurrence of `item`.
    pub fn add(&mut self, item: T) -> Result<(), SetError> {
        self.add_count(item, 1)
    }

    /// Counts `count` occurrences of `item`.
    ///
    /// If the key is new, `item` becomes its representative. Otherwise only the
    /// count grows and `item` is dropped. A count that would overflow `u64` is
    /// rejected and the histogram is left unchanged.
    pub fn add_count(&mut self, item: T, count: u64) -> Result<(), SetError> {
        if count == 0 {
            return Err(SetError::InvalidCount(
                "histogram counts must be at least 1".to_string(),
            ));
        }
        let key = self.selector.key_of(&item)?;
        let updated = match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let current = occupied.get().count;
                let summed = current.checked_add(count).ok_or_else(|| {
                    SetError::InvalidCount(format!(
                        "count for key `{}` overflows: {} + {}",
                        occupied.key(),
                        current,
                        count
                    ))
                })?;
                occupied.get_mut().count = summed;
                summed
            }
            Entry::Vacant(vacant) => vacant.insert(HistogramEntry { item, count }).count,
        };
        self.max = self.max.max(updated);
        Ok(())
    }

    /// Counts one occurrence of each item, in order.
    ///
    /// Stops at the first item whose key cannot be derived; items before it stay
    /// counted.
    pub fn add_items<I>(&mut self, items: I) -> Result<(), SetError>
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.add(item)?;
        }
        Ok(())
    }

    /// Removes the entry for `item`'s key entirely. Returns true if an entry was
    /// removed. Items without a derivable key are never present, so removing
    /// them is a no-op.
    pub fn remove(&mut self, item: &T) -> bool {
        let Ok(key) = self.selector.key_of(item) else {
            return false;
        };
        match self.entries.remove(&key) {
            Some(removed) => {
                if removed.count == self.max {
                    self.max = self.entries.values().map(|e| e.count).max().unwrap_or(0);
                }
                true
            }
            None => false,
        }
    }

    /// Removes each item's entry. Returns how many entries were removed.
    pub fn remove_items<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut removed = 0;
        for item in items {
            if self.remove(item.borrow()) {
                removed += 1;
            }
        }
        removed
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.max = 0;
    }

    /// Sets every entry's count to `count`.
    pub fn normalize(&mut self, count: u64) -> Result<(), SetError> {
        if count == 0 {
            return Err(SetError::InvalidCount(
                "cannot normalize a histogram to 0".to_string(),
            ));
        }
        self.set_counts(count);
        Ok(())
    }

    pub(crate) fn set_counts(&mut self, count: u64) {
        for entry in self.entries.values_mut() {
            entry.count = count;
        }
        self.max = if self.entries.is_empty() { 0 } else { count };
    }

    /// Keeps only the entries `keep` accepts.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&HistogramEntry<T>) -> bool,
    {
        self.entries.retain(|_, entry| keep(entry));
        self.max = self.entries.values().map(|e| e.count).max().unwrap_or(0);
    }

    /// Inserts `item` with a count of 1 unless its key is already present.
    /// Returns true if the item was inserted.
    pub(crate) fn add_unique(&mut self, item: T) -> Result<bool, SetError> {
        let key = self.selector.key_of(&item)?;
        if self.entries.contains_key(&key) {
            return Ok(false);
        }
        self.entries.insert(key, HistogramEntry { item, count: 1 });
        self.max = self.max.max(1);
        Ok(true)
    }

    /// Adds every entry of `other` into this histogram, summing counts of
    /// matching keys. Keys are re-derived with this histogram's policy; keys new
    /// to this histogram take `other`'s item as their representative.
    pub fn merge(&mut self, other: &Histogram<T>) -> Result<(), SetError>
    where
        T: Clone,
    {
        for entry in other.entries.values() {
            self.add_count(entry.item.clone(), entry.count)?;
        }
        Ok(())
    }

    /// Visits every `(item, count, key)` triple until the visitor breaks.
    ///
    /// Visiting order is unspecified but stable as long as the histogram is not
    /// mutated.
    pub fn each<F>(&self, mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(&T, u64, &str) -> ControlFlow<()>,
    {
        for (key, entry) in &self.entries {
            if visitor(&entry.item, entry.count, key).is_break() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Iterator over `(item, count, key)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&T, u64, &str)> + '_ {
        self.entries
            .iter()
            .map(|(key, entry)| (&entry.item, entry.count, key.as_str()))
    }

    /// Iterator over the entries.
    pub fn entries(&self) -> impl Iterator<Item = &HistogramEntry<T>> + '_ {
        self.entries.values()
    }

    /// Collects a transformation of every `(item, count, key)` triple.
    pub fn map<U, F>(&self, mut action: F) -> Vec<U>
    where
        F: FnMut(&T, u64, &str) -> U,
    {
        self.iter().map(|(item, count, key)| action(item, count, key)).collect()
    }

    /// Folds all counts into a single value.
    pub fn reduce<A, F>(&self, initial: A, action: F) -> A
    where
        F: FnMut(A, u64) -> A,
    {
        self.counts().fold(initial, action)
    }

    /// The representative items.
    pub fn items(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.values().map(|entry| &entry.item)
    }

    /// Consumes the histogram, returning the representative items.
    pub fn into_items(self) -> Vec<T> {
        self.entries.into_values().map(|entry| entry.item).collect()
    }

    /// The counts, in the same order as [`items`](Self::items).
    pub fn counts(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.values().map(|entry| entry.count)
    }

    /// The keys, in the same order as [`items`](Self::items).
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// The representative items with any wrapper envelopes stripped.
    pub fn unwrap(&self) -> impl Iterator<Item = &T::Inner> + '_
    where
        T: Envelope,
    {
        self.items().map(Envelope::inner)
    }

    /// Returns the entry for `item`'s key.
    pub fn get(&self, item: &T) -> Option<&HistogramEntry<T>> {
        let key = self.selector.key_of(item).ok()?;
        self.entries.get(&key)
    }

    /// Returns true if an entry exists for `item`'s key.
    pub fn has(&self, item: &T) -> bool {
        self.get(item).is_some()
    }

    /// The count recorded for `item`'s key, 0 if absent.
    pub fn count(&self, item: &T) -> u64 {
        self.get(item).map_or(0, |entry| entry.count)
    }

    /// Number of distinct keys.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest count, 0 when empty.
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Smallest count, 0 when empty.
    pub fn min(&self) -> u64 {
        self.counts().min().unwrap_or(0)
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.reduce(0, u64::saturating_add)
    }

    fn total_f64(&self) -> f64 {
        self.reduce(0.0, |sum, count| sum + count as f64)
    }

    /// Mean count per key. NaN when empty.
    pub fn average(&self) -> f64 {
        self.total_f64() / self.size() as f64
    }

    /// Shannon entropy of the count distribution, in bits per symbol. NaN when
    /// empty.
    pub fn entropy(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        let total = self.total_f64();
        self.reduce(0.0, |entropy, count| {
            let p = count as f64 / total;
            entropy - p * p.log2()
        })
    }

    /// Canonical, order-independent encoding of keys and counts, e.g.
    /// `{7:1,8:2,9:3}`. Tokens are sorted by UTF-16 code units; keys are not
    /// escaped.
    pub fn keyify(&self) -> String {
        keyify_tokens(self.iter().map(|(_, count, key)| format!("{}:{},", key, count)))
    }

    /// Two histograms are equal when their [`keyify`](Self::keyify) encodings are.
    pub fn equals(&self, other: &Histogram<T>) -> bool {
        self.keyify() == other.keyify()
    }

    /// A shallow copy: same items (cloned as `T` clones), counts and policy.
    pub fn copy(&self) -> Self
    where
        T: Clone,
    {
        self.clone()
    }
}

/// Sorts `token,` fragments, joins them and wraps the result in braces.
pub(crate) fn keyify_tokens<I>(tokens: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut tokens: Vec<String> = tokens.into_iter().collect();
    // UTF-16 code unit order, so supplementary-plane keys sort before U+E000..U+FFFF.
    tokens.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
    let mut joined = tokens.concat();
    joined.pop();
    format!("{{{}}}", joined)
}

impl<T: Clone> Clone for Histogram<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            max: self.max,
            selector: self.selector.clone(),
        }
    }
}

impl<T> PartialEq for Histogram<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<T> fmt::Display for Histogram<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyify())
    }
}

impl<T: fmt::Debug> fmt::Debug for Histogram<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Histogram")
            .field("entries", &self.entries)
            .field("max", &self.max)
            .field("selector", &self.selector)
            .finish()
    }
}

impl<T: Serialize> Serialize for Histogram<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl<'a, T> IntoIterator for &'a Histogram<T> {
    type Item = &'a T;
    type IntoIter = Box<dyn Iterator<Item = &'a T> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.items())
    }
}

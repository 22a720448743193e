// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::enums::ValueKind;
use crate::key::Key;
use thiserror::Error;

/// Error type for histogram and set operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Invalid count: {0}")]
    InvalidCount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Keyable trait - describes how an item identifies itself to a histogram.
///
/// Every item stored in a [`Histogram`](crate::Histogram) or [`Set`](crate::Set)
/// is looked up by a string key. Which key is used is decided by the container's
/// [`KeyPolicy`](crate::KeyPolicy); this trait supplies the raw material each
/// policy draws from.
///
/// Only [`identity`](Keyable::identity) is required. The remaining methods
/// default to "not present".
///
/// # Example
///
/// ```
/// use swiftset::{Keyable, Set};
///
/// #[derive(Clone)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// impl Keyable for User {
///     fn identity(&self) -> String {
///         self.name.clone()
///     }
///
///     fn own_key(&self) -> Option<String> {
///         Some(self.id.to_string())
///     }
/// }
///
/// let set = Set::new(vec![
///     User { id: 1, name: "ann".into() },
///     User { id: 1, name: "ann (dup)".into() },
///     User { id: 2, name: "bob".into() },
/// ])
/// .unwrap();
/// assert_eq!(set.size(), 2);
/// ```
pub trait Keyable {
    /// The item's natural string conversion.
    fn identity(&self) -> String;

    /// The item's own `key`, if it carries one. Takes precedence over
    /// [`identity`](Keyable::identity) under the default policy.
    fn own_key(&self) -> Option<Key> {
        None
    }

    /// Looks up a named property, used by [`KeyPolicy::Property`](crate::KeyPolicy::Property).
    fn property(&self, _name: &str) -> Option<Key> {
        None
    }

    /// Type discriminant folded into default wrapper keys.
    fn kind(&self) -> ValueKind {
        ValueKind::Object
    }
}

/// Envelope trait - access to the value inside an optional wrapper.
///
/// Implemented by [`Wrapper`](crate::Wrapper) and [`MaybeWrapped`](crate::MaybeWrapped)
/// so that `unwrap()` on histograms and sets can strip envelopes.
pub trait Envelope {
    type Inner;

    /// The enclosed value.
    fn inner(&self) -> &Self::Inner;

    /// Returns true if this value is a wrapper envelope.
    fn is_wrapped(&self) -> bool;
}

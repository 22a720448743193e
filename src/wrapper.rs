// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Wrappers that give values a type-aware key.
//!
//! Under the default key policy the number `1` and the string `"1"` share the
//! key `"1"`. Wrapping them with [`wrap_obj`] folds a type discriminant into the
//! key (`(1:4)` versus `(1:5)`), so both can live in the same set. A custom
//! stringification can be supplied with [`wrap_obj_with`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use swiftset::{wrap_obj, Set};
//!
//! let wrap = wrap_obj();
//! let set = Set::new(vec![wrap(json!(1)), wrap(json!("1")), wrap(json!(1))]).unwrap();
//! assert_eq!(set.size(), 2);
//! assert!(set.has(&wrap(json!("1"))));
//! ```

use crate::enums::ValueKind;
use crate::key::Key;
use crate::traits::{Envelope, Keyable};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

type ToKey<T> = dyn Fn(&T) -> String + Send + Sync;

/// Wrapper: an item plus the function that turns it into a key string.
pub struct Wrapper<T> {
    /// The wrapped value.
    pub item: T,
    to_key: Arc<ToKey<T>>,
}

/// `(<identity>:<type code>)`
fn default_key<T: Keyable>(item: &T) -> String {
    format!("({}:{})", item.identity(), item.kind().code())
}

impl<T: Keyable + 'static> Wrapper<T> {
    /// Wraps `item` with the default type-aware key.
    pub fn new(item: T) -> Self {
        Self {
            item,
            to_key: Arc::new(default_key::<T>),
        }
    }
}

impl<T> Wrapper<T> {
    /// Wraps `item` with a custom key function.
    pub fn with_key<F>(item: T, to_key: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            item,
            to_key: Arc::new(to_key),
        }
    }

    /// The key string of this wrapper.
    pub fn key(&self) -> Key {
        (self.to_key)(&self.item)
    }

    pub fn into_inner(self) -> T {
        self.item
    }
}

/// Returns a function that wraps values with the default type-aware key.
pub fn wrap_obj<T: Keyable + 'static>() -> impl Fn(T) -> Wrapper<T> + Clone {
    let to_key: Arc<ToKey<T>> = Arc::new(default_key::<T>);
    move |item| Wrapper {
        item,
        to_key: Arc::clone(&to_key),
    }
}

/// Returns a function that wraps values with a custom key function.
pub fn wrap_obj_with<T, F>(to_key: F) -> impl Fn(T) -> Wrapper<T> + Clone
where
    T: 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    let to_key: Arc<ToKey<T>> = Arc::new(to_key);
    move |item| Wrapper {
        item,
        to_key: Arc::clone(&to_key),
    }
}

/// Returns true if `value` is a wrapper envelope.
pub fn is_wrapped<E: Envelope>(value: &E) -> bool {
    value.is_wrapped()
}

impl<T> Keyable for Wrapper<T> {
    fn identity(&self) -> String {
        self.key()
    }
}

impl<T> Envelope for Wrapper<T> {
    type Inner = T;

    fn inner(&self) -> &T {
        &self.item
    }

    fn is_wrapped(&self) -> bool {
        true
    }
}

impl<T: Clone> Clone for Wrapper<T> {
    fn clone(&self) -> Self {
        Self {
            item: self.item.clone(),
            to_key: Arc::clone(&self.to_key),
        }
    }
}

impl<T> PartialEq for Wrapper<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> fmt::Display for Wrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl<T: fmt::Debug> fmt::Debug for Wrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper")
            .field("item", &self.item)
            .field("key", &self.key())
            .finish()
    }
}

impl<T: Serialize> Serialize for Wrapper<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.item.serialize(serializer)
    }
}

/// A value that may or may not be wrapped, for collections mixing both.
#[derive(Clone, Debug, PartialEq)]
pub enum MaybeWrapped<T> {
    Plain(T),
    Wrapped(Wrapper<T>),
}

impl<T> MaybeWrapped<T> {
    pub fn plain(item: T) -> Self {
        MaybeWrapped::Plain(item)
    }
}

impl<T> From<Wrapper<T>> for MaybeWrapped<T> {
    fn from(wrapper: Wrapper<T>) -> Self {
        MaybeWrapped::Wrapped(wrapper)
    }
}

impl<T: Keyable> Keyable for MaybeWrapped<T> {
    fn identity(&self) -> String {
        match self {
            MaybeWrapped::Plain(item) => item.identity(),
            MaybeWrapped::Wrapped(wrapper) => wrapper.identity(),
        }
    }

    fn own_key(&self) -> Option<Key> {
        match self {
            MaybeWrapped::Plain(item) => item.own_key(),
            MaybeWrapped::Wrapped(_) => None,
        }
    }

    fn property(&self, name: &str) -> Option<Key> {
        match self {
            MaybeWrapped::Plain(item) => item.property(name),
            MaybeWrapped::Wrapped(_) => None,
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            MaybeWrapped::Plain(item) => item.kind(),
            MaybeWrapped::Wrapped(_) => ValueKind::Object,
        }
    }
}

impl<T> Envelope for MaybeWrapped<T> {
    type Inner = T;

    fn inner(&self) -> &T {
        match self {
            MaybeWrapped::Plain(item) => item,
            MaybeWrapped::Wrapped(wrapper) => &wrapper.item,
        }
    }

    fn is_wrapped(&self) -> bool {
        matches!(self, MaybeWrapped::Wrapped(_))
    }
}

impl<T: Serialize> Serialize for MaybeWrapped<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner().serialize(serializer)
    }
}

// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Key derivation.
//!
//! Histograms look items up by a string [`Key`]. How that key is obtained is a
//! construction-time choice expressed as a [`KeyPolicy`]:
//!
//! - [`KeyPolicy::Default`]: the item's own key ([`Keyable::own_key`]) if it has
//!   one, otherwise its natural string identity ([`Keyable::identity`]).
//! - [`KeyPolicy::Property`]: a named property ([`Keyable::property`]). Items
//!   without the property fail with [`SetError::InvalidKey`].
//! - [`KeyPolicy::Function`]: an arbitrary closure.
//!
//! A policy is resolved once into a [`KeySelector`], a single closure stored with
//! the container and shared by its clones.

use crate::enums::ValueKind;
use crate::traits::{Keyable, SetError};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Lookup key of an item.
pub type Key = String;

type KeyFn<T> = dyn Fn(&T) -> Result<Key, SetError> + Send + Sync;

/// Key derivation policy chosen when a histogram or set is built.
pub enum KeyPolicy<T> {
    Default,
    Property(String),
    Function(Arc<dyn Fn(&T) -> Key + Send + Sync>),
}

impl<T> KeyPolicy<T> {
    /// Keys items by the named property.
    pub fn property(name: impl Into<String>) -> Self {
        KeyPolicy::Property(name.into())
    }

    /// Keys items by the result of `f`.
    pub fn function<F, K>(f: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
        K: Into<Key>,
    {
        KeyPolicy::Function(Arc::new(move |item: &T| f(item).into()))
    }

    fn label(&self) -> String {
        match self {
            KeyPolicy::Default => "default".to_string(),
            KeyPolicy::Property(name) => format!("property({})", name),
            KeyPolicy::Function(_) => "function".to_string(),
        }
    }
}

impl<T: Keyable + 'static> KeyPolicy<T> {
    /// Resolves this policy into a key extraction closure.
    pub fn resolve(self) -> KeySelector<T> {
        let label: Arc<str> = Arc::from(self.label());
        let derive: Arc<KeyFn<T>> = match self {
            KeyPolicy::Default => Arc::new(|item: &T| {
                Ok(item.own_key().unwrap_or_else(|| item.identity()))
            }),
            KeyPolicy::Property(name) => Arc::new(move |item: &T| {
                item.property(&name).ok_or_else(|| {
                    let identity = item.identity();
                    tracing::debug!(item = %identity, property = %name, "key derivation failed");
                    SetError::InvalidKey(format!(
                        "item `{}` has no property `{}`",
                        identity, name
                    ))
                })
            }),
            KeyPolicy::Function(f) => Arc::new(move |item: &T| Ok(f(item))),
        };
        KeySelector { derive, label }
    }
}

impl<T> Default for KeyPolicy<T> {
    fn default() -> Self {
        KeyPolicy::Default
    }
}

impl<T> Clone for KeyPolicy<T> {
    fn clone(&self) -> Self {
        match self {
            KeyPolicy::Default => KeyPolicy::Default,
            KeyPolicy::Property(name) => KeyPolicy::Property(name.clone()),
            KeyPolicy::Function(f) => KeyPolicy::Function(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for KeyPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPolicy::{}", self.label())
    }
}

impl<T> From<&str> for KeyPolicy<T> {
    fn from(name: &str) -> Self {
        KeyPolicy::property(name)
    }
}

/// A resolved key policy.
pub struct KeySelector<T> {
    derive: Arc<KeyFn<T>>,
    label: Arc<str>,
}

impl<T> KeySelector<T> {
    /// Derives the key of `item`.
    #[inline]
    pub fn key_of(&self, item: &T) -> Result<Key, SetError> {
        (self.derive)(item)
    }

    /// Short description of the policy this selector was resolved from.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<T> Clone for KeySelector<T> {
    fn clone(&self) -> Self {
        Self {
            derive: Arc::clone(&self.derive),
            label: Arc::clone(&self.label),
        }
    }
}

impl<T> fmt::Debug for KeySelector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeySelector").field(&self.label).finish()
    }
}

// ============================================================================
// Keyable Implementations
// ============================================================================

macro_rules! keyable_number {
    ($($t:ty),*) => {
        $(
            impl Keyable for $t {
                fn identity(&self) -> String {
                    self.to_string()
                }

                fn kind(&self) -> ValueKind {
                    ValueKind::Number
                }
            }
        )*
    };
}

keyable_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Keyable for bool {
    fn identity(&self) -> String {
        self.to_string()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Boolean
    }
}

impl Keyable for char {
    fn identity(&self) -> String {
        self.to_string()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::String
    }
}

impl Keyable for str {
    fn identity(&self) -> String {
        self.to_string()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::String
    }
}

impl Keyable for String {
    fn identity(&self) -> String {
        self.clone()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::String
    }
}

/// JSON values behave like dynamically typed items: strings and numbers key by
/// their text, objects expose their fields as properties (and `key` as their own
/// key), arrays expose their elements by index.
impl Keyable for Value {
    fn identity(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn own_key(&self) -> Option<Key> {
        match self {
            Value::Object(map) => map.get("key").map(|v| v.identity()),
            _ => None,
        }
    }

    fn property(&self, name: &str) -> Option<Key> {
        match self {
            Value::Object(map) => map.get(name).map(|v| v.identity()),
            Value::Array(items) => name
                .parse::<usize>()
                .ok()
                .and_then(|idx| items.get(idx))
                .map(|v| v.identity()),
            _ => None,
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

macro_rules! keyable_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Keyable + ?Sized> Keyable for $ptr<T> {
                fn identity(&self) -> String {
                    (**self).identity()
                }

                fn own_key(&self) -> Option<Key> {
                    (**self).own_key()
                }

                fn property(&self, name: &str) -> Option<Key> {
                    (**self).property(name)
                }

                fn kind(&self) -> ValueKind {
                    (**self).kind()
                }
            }
        )*
    };
}

keyable_pointer!(Box, Rc, Arc);

impl<T: Keyable + ?Sized> Keyable for &T {
    fn identity(&self) -> String {
        (**self).identity()
    }

    fn own_key(&self) -> Option<Key> {
        (**self).own_key()
    }

    fn property(&self, name: &str) -> Option<Key> {
        (**self).property(name)
    }

    fn kind(&self) -> ValueKind {
        (**self).kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_policy_uses_identity() {
        let selector = KeyPolicy::<i32>::Default.resolve();
        assert_eq!(selector.key_of(&7).unwrap(), "7");

        let selector = KeyPolicy::<&str>::Default.resolve();
        assert_eq!(selector.key_of(&"7").unwrap(), "7");
    }

    #[test]
    fn default_policy_prefers_own_key() {
        let selector = KeyPolicy::<Value>::Default.resolve();
        assert_eq!(selector.key_of(&json!({"key": "k1", "id": 4})).unwrap(), "k1");
        assert_eq!(selector.key_of(&json!({"key": 12})).unwrap(), "12");
        assert_eq!(selector.key_of(&json!({"id": 4})).unwrap(), r#"{"id":4}"#);
    }

    #[test]
    fn property_policy_reads_fields() {
        let selector = KeyPolicy::<Value>::property("id").resolve();
        assert_eq!(selector.key_of(&json!({"id": "o1"})).unwrap(), "o1");
        assert_eq!(selector.key_of(&json!(["a", "b"])).unwrap_err(), SetError::InvalidKey(
            r#"item `["a","b"]` has no property `id`"#.to_string()
        ));

        let by_index = KeyPolicy::<Value>::property("1").resolve();
        assert_eq!(by_index.key_of(&json!(["a", "b"])).unwrap(), "b");
    }

    #[test]
    fn property_policy_rejects_primitives() {
        let selector = KeyPolicy::<i64>::property("id").resolve();
        assert!(matches!(selector.key_of(&3), Err(SetError::InvalidKey(_))));
    }

    #[test]
    fn function_policy_applies_closure() {
        let selector = KeyPolicy::<Value>::function(|v: &Value| {
            v["name"].as_str().unwrap_or_default().to_uppercase()
        })
        .resolve();
        assert_eq!(selector.key_of(&json!({"name": "one"})).unwrap(), "ONE");
        assert_eq!(selector.label(), "function");
    }

    #[test]
    fn json_kinds() {
        assert_eq!(json!(1).kind(), ValueKind::Number);
        assert_eq!(json!("1").kind(), ValueKind::String);
        assert_eq!(json!(null).kind(), ValueKind::Null);
        assert_eq!(json!([1]).kind(), ValueKind::Array);
        assert_eq!(json!(1).identity(), json!("1").identity());
    }

    #[test]
    fn pointers_delegate() {
        let shared = Rc::new(json!({"id": "o1"}));
        assert_eq!(shared.property("id").as_deref(), Some("o1"));
        assert_eq!(Arc::new(5u8).kind(), ValueKind::Number);
        assert_eq!(Box::new('x').identity(), "x");
    }
}

//! # swiftset
//!
//! Histogram-backed sets with fast set operations.
//!
//! A [`Histogram`] counts how often each distinct key occurs in a collection.
//! A [`Set`] is a histogram that keeps each key once. The set operations merge
//! two histograms with different base counts (1 for the receiver, 2 for the
//! operand) and classify every key by its summed count, so union, intersection,
//! symmetric difference, relative complement and equivalence all fall out of a
//! single merge.
//!
//! The [`ops`] module runs the same protocol directly on plain collections.
//!
//! ```
//! use swiftset::{Set, Histogram};
//!
//! let words = "the cat and the hat".split(' ');
//! let hist = Histogram::from_items(words).unwrap();
//! assert_eq!(hist.count(&"the"), 2);
//!
//! let set = Set::new(vec![1, 2, 3]).unwrap();
//! assert!(set.equals(vec![3, 2, 1, 1]).unwrap());
//! ```

pub mod enums;
pub mod histogram;
pub mod key;
pub mod ops;
pub mod set;
pub mod traits;
pub mod wrapper;

// Re-export core traits
pub use traits::{Envelope, Keyable, SetError};

pub use enums::{SetOperation, ValueKind};
pub use histogram::{Histogram, HistogramEntry};
pub use key::{Key, KeyPolicy, KeySelector};
pub use set::{Set, IN_BOTH, ONLY_IN_A, ONLY_IN_B};
pub use wrapper::{is_wrapped, wrap_obj, wrap_obj_with, MaybeWrapped, Wrapper};

// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::traits::SetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse type of an item, encoded into default wrapper keys so that values with
/// the same text but different types (`1` and `"1"`) get different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Array,
    Boolean,
    Number,
    String,
    Object,
}

impl ValueKind {
    /// Numeric code used inside wrapper keys.
    pub fn code(self) -> u8 {
        match self {
            ValueKind::Null => 0,
            ValueKind::Array => 2,
            ValueKind::Boolean => 3,
            ValueKind::Number => 4,
            ValueKind::String => 5,
            ValueKind::Object => 6,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => write!(f, "Null"),
            ValueKind::Array => write!(f, "Array"),
            ValueKind::Boolean => write!(f, "Boolean"),
            ValueKind::Number => write!(f, "Number"),
            ValueKind::String => write!(f, "String"),
            ValueKind::Object => write!(f, "Object"),
        }
    }
}

/// The four binary set operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOperation {
    /// Items from either set.
    Union,
    /// Items common to both sets.
    Intersection,
    /// Symmetric difference: items in exactly one of the sets.
    Difference,
    /// Relative complement: items of the receiver that are not in the operand.
    Complement,
}

impl SetOperation {
    pub const ALL: [SetOperation; 4] = [
        SetOperation::Union,
        SetOperation::Intersection,
        SetOperation::Difference,
        SetOperation::Complement,
    ];

    pub(crate) fn evaluator(self) -> Evaluator {
        match self {
            SetOperation::Union => Evaluator::All,
            SetOperation::Intersection => Evaluator::CountEquals(crate::set::IN_BOTH),
            SetOperation::Difference => Evaluator::CountBelow(crate::set::IN_BOTH),
            SetOperation::Complement => Evaluator::CountEquals(crate::set::ONLY_IN_A),
        }
    }
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOperation::Union => write!(f, "Union"),
            SetOperation::Intersection => write!(f, "Intersection"),
            SetOperation::Difference => write!(f, "Difference"),
            SetOperation::Complement => write!(f, "Complement"),
        }
    }
}

impl FromStr for SetOperation {
    type Err = SetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "").to_lowercase().as_str() {
            "union" => Ok(SetOperation::Union),
            "intersection" => Ok(SetOperation::Intersection),
            "difference" | "symmetricdifference" => Ok(SetOperation::Difference),
            "complement" | "relativecomplement" => Ok(SetOperation::Complement),
            _ => Err(SetError::InvalidInput(format!("Unknown set operation: {}", s))),
        }
    }
}

/// Selects merged entries by provenance count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Evaluator {
    All,
    CountEquals(u64),
    CountBelow(u64),
}

impl Evaluator {
    pub(crate) fn keeps(self, count: u64) -> bool {
        match self {
            Evaluator::All => true,
            Evaluator::CountEquals(n) => count == n,
            Evaluator::CountBelow(n) => count < n,
        }
    }
}

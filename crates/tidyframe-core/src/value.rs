//! Cell values and the total ordering used by sorting and grouping.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::schema::DataType;

/// Shared missing marker for call sites that need a `&Value` with a
/// `'static` lifetime.
pub static MISSING: Value = Value::Missing;

/// One cell of a table: a typed value or the explicit missing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// The declared type this value satisfies, if it is not missing.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Missing => None,
            Value::Bool(_) => Some(DataType::Bool),
            Value::Int(_) => Some(DataType::Int),
            Value::Float(_) => Some(DataType::Float),
            Value::Str(_) => Some(DataType::Str),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// True when this value may legally occupy a column of `dt`.
    /// Missing is acceptable for any type; nullability is checked separately.
    pub fn fits(&self, dt: DataType) -> bool {
        match self.data_type() {
            None => true,
            Some(got) => got == dt,
        }
    }

    /// Canonical string rendering, used by the gather coerce-to-string
    /// policy. Missing has no rendering and stays missing.
    pub fn render(&self) -> Option<String> {
        match self {
            Value::Missing => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Str(s) => Some(s.clone()),
        }
    }
}

/// Compare two values for sorting.
///
/// Missing orders after every concrete value, so an ascending sort puts
/// missing last and a descending sort (the reversed comparator) puts it
/// first. NaN orders after all other floats; NaN compares equal to NaN.
pub fn value_cmp(a: &Value, b: &Value) -> Ordering {
    use Value::*;

    match (a, b) {
        (Missing, Missing) => Ordering::Equal,
        (Missing, _) => Ordering::Greater,
        (_, Missing) => Ordering::Less,
        (Bool(x), Bool(y)) => x.cmp(y),
        (Int(x), Int(y)) => x.cmp(y),
        (Float(x), Float(y)) => {
            if x.is_nan() && y.is_nan() {
                Ordering::Equal
            } else if x.is_nan() {
                Ordering::Greater
            } else if y.is_nan() {
                Ordering::Less
            } else {
                x.partial_cmp(y).unwrap_or(Ordering::Equal)
            }
        }
        (Str(x), Str(y)) => x.cmp(y),
        // Mixed types cannot occur within a well-typed column; order by
        // variant so the comparator stays total anyway.
        _ => type_order(a).cmp(&type_order(b)),
    }
}

/// Assign a numeric order to value variants for mixed-type comparisons
/// and for hashing discriminants.
pub(crate) fn type_order(v: &Value) -> u8 {
    use Value::*;
    match v {
        Missing => 0,
        Bool(_) => 1,
        Int(_) => 2,
        Float(_) => 3,
        Str(_) => 4,
    }
}

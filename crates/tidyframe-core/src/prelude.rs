//! Convenient re-exports for downstream crates.

pub use crate::config::{CoercionPolicy, EngineConfig, MissingPolicy};
pub use crate::error::{Error, Result};
pub use crate::key::{hash_key, KeyHash};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::selector::Selector;
pub use crate::table::{Row, Table, TableBuilder};
pub use crate::value::{value_cmp, Value};

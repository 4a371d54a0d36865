//! The common verb surface.
//!
//! The pipeline composer calls `output_schema(...)` to validate a chain
//! before running it, then `apply(...)` stage by stage. Binary verbs (join)
//! hold their right-hand table internally so every stage stays
//! Table → Table.

use tidyframe_core::prelude::{Result, Schema, Table};

/// Trait that all verbs implement.
///
/// Invariants:
/// - `apply` must be deterministic given the same input table.
/// - `apply` never mutates its input; it builds a fresh `Table`.
/// - `output_schema` performs the full up-front validation; `apply` on a
///   table matching the validated schema must not fail for schema reasons.
pub trait Verb: Send + Sync {
    /// Human-readable verb name (stable).
    fn name(&self) -> &'static str;

    /// Given the input schema, return the output schema or the validation
    /// error describing the misuse.
    fn output_schema(&self, input: &Schema) -> Result<Schema>;

    /// Transform one table into the next.
    fn apply(&self, input: &Table) -> Result<Table>;
}

//! Tracing hooks (starter).
//!
//! This module purposefully avoids pulling heavy telemetry stacks.
//! Wire these up to a subscriber in the binary layer.

#[cfg(feature = "tracing")]
pub fn stage_executed(index: usize, name: &str, rows_in: usize, rows_out: usize) {
    tracing::trace!(index, name, rows_in, rows_out, "executed stage");
}

#[cfg(not(feature = "tracing"))]
pub fn stage_executed(_index: usize, _name: &str, _rows_in: usize, _rows_out: usize) { /* no-op */
}

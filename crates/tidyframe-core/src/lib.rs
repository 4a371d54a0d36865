#![forbid(unsafe_code)]
//! tidyframe-core: the data model shared by every engine crate.
//!
//! Pure in-memory value types: `Value`, `Schema`, `Table`, column
//! `Selector`s, composite-key hashing, the engine error taxonomy, and
//! policy configuration. No I/O and no async anywhere in this crate.

pub mod config;
pub mod error;
pub mod key;
pub mod prelude;
pub mod schema;
pub mod selector;
pub mod table;
pub mod value;

/// Engine version string for provenance (run reports embed it).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#![forbid(unsafe_code)]
//! tidyframe-verbs: the reshape and relational verbs.
//!
//! Design intent:
//! - Keep this crate pure and synchronous (no async, no I/O).
//! - Every verb consumes an immutable `Table` and produces a new one.
//! - Each verb validates its schema up front via `output_schema` so that
//!   selector/type errors surface before any row work.

pub mod traits;

pub mod arrange;
pub mod filter;
pub mod mutate;
pub mod select;
pub mod summarize;

pub mod join;
pub mod reshape;

pub use arrange::{Arrange, Direction, SortKey};
pub use filter::{CmpOp, Filter, Predicate};
pub use join::{Join, JoinMode};
pub use mutate::Mutate;
pub use reshape::{Gather, Reducer, Spread};
pub use select::Select;
pub use summarize::{Aggregate, GroupSummarize, NamedAggregate};
pub use traits::Verb;

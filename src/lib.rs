#![forbid(unsafe_code)]
//! tidyframe: an in-memory tidy-data reshaping and relational engine.
//!
//! The engine's only boundary is the immutable [`Table`] value: callers
//! build one (or load one through an external loader), chain verbs through
//! a [`Pipeline`], and hand the resulting table to whatever presentation
//! layer they like.
//!
//! ```
//! use tidyframe::prelude::*;
//!
//! let schema = Schema::new(vec![
//!     Field::new("name", DataType::Str, false),
//!     Field::new("members_1830", DataType::Int, false),
//!     Field::new("members_1840", DataType::Int, false),
//! ])?;
//! let table = Table::from_rows(schema, vec![
//!     vec![Value::Str("First Presbyterian".into()), Value::Int(12), Value::Int(25)],
//! ])?;
//!
//! let long = Pipeline::new()
//!     .then(Gather::new("year", "members", Selector::columns(["members_1830", "members_1840"])))
//!     .run(&table)?;
//! assert_eq!(long.n_rows(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use tidyframe_core::{config, error, key, schema, selector, table, value, VERSION};
pub use tidyframe_pipeline::{Pipeline, PipelineError, RunReport, StageReport};
pub use tidyframe_verbs as verbs;

pub mod prelude {
    pub use tidyframe_core::prelude::*;
    pub use tidyframe_pipeline::{Pipeline, PipelineError, RunReport};
    pub use tidyframe_verbs::{
        Aggregate, Arrange, CmpOp, Filter, Gather, GroupSummarize, Join, JoinMode, Mutate,
        NamedAggregate, Predicate, Reducer, Select, SortKey, Spread, Verb,
    };
}

#![forbid(unsafe_code)]
//! tidyframe-pipeline: sequential, fail-fast composition of verbs.
//!
//! A pipeline is a chain where stage *n*'s output table is stage *n+1*'s
//! input. The first stage error aborts the remainder of the chain and is
//! surfaced with its stage index and verb name; no partial results are
//! returned. Purely sequential, no parallelism.

pub mod metrics;
pub mod pipeline;

pub use pipeline::{Pipeline, PipelineError, RunReport, StageReport};

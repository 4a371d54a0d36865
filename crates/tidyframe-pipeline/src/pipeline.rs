//! The pipeline composer and its run report.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tidyframe_core::prelude::{Result as CoreResult, Schema, Table};
use tidyframe_verbs::Verb;

use crate::metrics;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("stage {index} ({name}): {source}")]
    Stage {
        index: usize,
        name: &'static str,
        #[source]
        source: tidyframe_core::error::Error,
    },
}

/// Per-stage accounting emitted by `run_with_report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub name: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub elapsed_ms: u64,
}

/// Deterministic run summary for audit/inspection: what ran, in what
/// order, over how many rows, and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub engine_version: String,
    pub stages: Vec<StageReport>,
    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

/// An ordered chain of verbs. Built once, runnable any number of times;
/// the same pipeline may serve concurrent callers since verbs are
/// `Send + Sync` and tables are immutable.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Verb>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage.
    pub fn then(mut self, verb: impl Verb + 'static) -> Self {
        self.stages.push(Box::new(verb));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Validate the whole chain against an input schema without touching
    /// any rows. Returns the final output schema. A data-dependent verb
    /// (spread) can only promise its identifier columns here, so a chain
    /// selecting spread-widened columns validates at run time instead.
    pub fn validate(&self, input: &Schema) -> Result<Schema, PipelineError> {
        let mut schema = input.clone();
        for (index, stage) in self.stages.iter().enumerate() {
            schema = self.lift(index, stage.output_schema(&schema))?;
        }
        Ok(schema)
    }

    /// Run the chain. Fail-fast: the first stage error aborts the rest and
    /// is returned with its position; no partial result survives.
    pub fn run(&self, input: &Table) -> Result<Table, PipelineError> {
        let (table, _) = self.run_with_report(input)?;
        Ok(table)
    }

    /// Run the chain and also return per-stage accounting.
    pub fn run_with_report(&self, input: &Table) -> Result<(Table, RunReport), PipelineError> {
        let started_ms = unix_ms();
        let mut stages = Vec::with_capacity(self.stages.len());
        let mut current = input.clone();

        for (index, stage) in self.stages.iter().enumerate() {
            let rows_in = current.n_rows();
            let t0 = Instant::now();
            current = self.lift(index, stage.apply(&current))?;
            let elapsed_ms = t0.elapsed().as_millis() as u64;

            metrics::stage_executed(index, stage.name(), rows_in, current.n_rows());
            stages.push(StageReport {
                name: stage.name().to_string(),
                rows_in,
                rows_out: current.n_rows(),
                elapsed_ms,
            });
        }

        let report = RunReport {
            engine_version: tidyframe_core::VERSION.to_string(),
            stages,
            started_ms,
            finished_ms: unix_ms(),
        };
        Ok((current, report))
    }

    fn lift<T>(&self, index: usize, result: CoreResult<T>) -> Result<T, PipelineError> {
        result.map_err(|source| PipelineError::Stage {
            index,
            name: self.stages[index].name(),
            source,
        })
    }
}

fn unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

//! Engine policy configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

/// How gather treats type-heterogeneous column sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoercionPolicy {
    /// Fail with `TypeConflict` when gathered columns disagree in type
    /// (after Int/Float widening).
    #[default]
    Strict,
    /// Render every gathered value into the string type; missing stays missing.
    CoerceToString,
}

/// How column aggregates treat missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// A missing value inside an aggregated cell is a `MissingValue` error.
    #[default]
    Strict,
    /// Missing values are skipped; an all-missing group yields a zero sum
    /// and a missing mean/min/max.
    Skip,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default policy handed to `Gather` when built from a config.
    pub gather_coercion: CoercionPolicy,

    /// Default policy for sum/mean/min/max aggregates.
    pub aggregate_missing: MissingPolicy,
}

impl EngineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TIDYFRAME_GATHER_COERCION`: `strict` | `string`
    /// - `TIDYFRAME_AGGREGATE_MISSING`: `strict` | `skip`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TIDYFRAME_GATHER_COERCION") {
            match s.to_ascii_lowercase().as_str() {
                "strict" => cfg.gather_coercion = CoercionPolicy::Strict,
                "string" => cfg.gather_coercion = CoercionPolicy::CoerceToString,
                _ => {}
            }
        }

        if let Ok(s) = std::env::var("TIDYFRAME_AGGREGATE_MISSING") {
            match s.to_ascii_lowercase().as_str() {
                "strict" => cfg.aggregate_missing = MissingPolicy::Strict,
                "skip" => cfg.aggregate_missing = MissingPolicy::Skip,
                _ => {}
            }
        }

        cfg
    }
}

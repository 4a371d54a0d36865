//! Grouped aggregation: split-apply-combine as one explicit verb.
//!
//! Rows are partitioned by the distinct combinations of the group-key
//! columns; each named aggregate reduces one group to one cell. Output
//! groups appear in first-occurrence order of their key combination, which
//! makes the result deterministic without requiring a sort.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tidyframe_core::key::hash_key;
use tidyframe_core::prelude::{
    DataType, Error, Field, MissingPolicy, Result, Schema, Table, TableBuilder, Value,
};
use tidyframe_core::value::value_cmp;

use crate::traits::Verb;

/// Aggregation kinds. All but `Count` name the column they reduce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregate {
    Count,
    Sum(String),
    Mean(String),
    Min(String),
    Max(String),
}

impl Aggregate {
    fn input_column(&self) -> Option<&str> {
        match self {
            Aggregate::Count => None,
            Aggregate::Sum(c) | Aggregate::Mean(c) | Aggregate::Min(c) | Aggregate::Max(c) => {
                Some(c)
            }
        }
    }
}

/// One output column of a summarize: an aggregate, its alias, and the
/// missing-value policy. The default policy is strict: a missing value
/// inside sum/mean/min/max raises `MissingValue` rather than silently
/// skewing the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAggregate {
    pub alias: String,
    pub aggregate: Aggregate,
    pub on_missing: MissingPolicy,
}

impl NamedAggregate {
    pub fn new(alias: impl Into<String>, aggregate: Aggregate) -> Self {
        Self {
            alias: alias.into(),
            aggregate,
            on_missing: MissingPolicy::Strict,
        }
    }

    pub fn skip_missing(mut self) -> Self {
        self.on_missing = MissingPolicy::Skip;
        self
    }

    /// Set the missing-value policy, typically from `EngineConfig`.
    pub fn with_policy(mut self, policy: MissingPolicy) -> Self {
        self.on_missing = policy;
        self
    }
}

/// Partitions rows by the distinct group-key combinations and reduces each
/// partition to one output row: the key values plus one column per
/// aggregate. An empty key list summarizes the whole table into one row.
pub struct GroupSummarize {
    pub group_by: Vec<String>,
    pub aggregates: Vec<NamedAggregate>,
}

impl GroupSummarize {
    pub fn new<I, S>(group_by: I, aggregates: Vec<NamedAggregate>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_by: group_by.into_iter().map(Into::into).collect(),
            aggregates,
        }
    }

    fn output_field(&self, agg: &NamedAggregate, input: &Schema) -> Result<Field> {
        let (dtype, nullable) = match &agg.aggregate {
            Aggregate::Count => (DataType::Int, false),
            Aggregate::Sum(col) => {
                let dt = numeric_input(input, col, "sum")?;
                // Skip over an all-missing group still yields a zero sum.
                (dt, false)
            }
            Aggregate::Mean(col) => {
                numeric_input(input, col, "mean")?;
                // Nullable: a skipped-to-empty or zero-row group has no mean.
                (DataType::Float, true)
            }
            Aggregate::Min(col) | Aggregate::Max(col) => {
                let idx = input.require(col)?;
                (input.fields[idx].data_type, true)
            }
        };
        Ok(Field::new(agg.alias.clone(), dtype, nullable))
    }
}

fn numeric_input(schema: &Schema, column: &str, what: &str) -> Result<DataType> {
    let idx = schema.require(column)?;
    let dt = schema.fields[idx].data_type;
    match dt {
        DataType::Int | DataType::Float => Ok(dt),
        other => Err(Error::TypeConflict(format!(
            "{} over column '{}' of type {}",
            what, column, other
        ))),
    }
}

impl Verb for GroupSummarize {
    fn name(&self) -> &'static str {
        "group_summarize"
    }

    fn output_schema(&self, input: &Schema) -> Result<Schema> {
        let mut fields = Vec::with_capacity(self.group_by.len() + self.aggregates.len());
        for key in &self.group_by {
            let idx = input.require(key)?;
            fields.push(input.fields[idx].clone());
        }
        for agg in &self.aggregates {
            if self.group_by.iter().any(|k| k == &agg.alias)
                || self
                    .aggregates
                    .iter()
                    .filter(|a| a.alias == agg.alias)
                    .count()
                    > 1
            {
                return Err(Error::SchemaConflict(format!(
                    "aggregate alias '{}' collides with another output column",
                    agg.alias
                )));
            }
            fields.push(self.output_field(agg, input)?);
        }
        Schema::new(fields)
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let schema = self.output_schema(input.schema())?;

        let key_cols: Vec<usize> = self
            .group_by
            .iter()
            .map(|k| input.schema().require(k))
            .collect::<Result<_>>()?;

        // Partition row indices by key hash, keeping first-occurrence order.
        let mut group_of: HashMap<_, usize> = HashMap::new();
        let mut group_keys: Vec<Vec<Value>> = Vec::new();
        let mut group_rows: Vec<Vec<usize>> = Vec::new();

        if key_cols.is_empty() {
            // Whole-table summary: a single group, even over zero rows.
            group_keys.push(Vec::new());
            group_rows.push((0..input.n_rows()).collect());
        } else {
            for row_idx in 0..input.n_rows() {
                let key_values = input.key_tuple(row_idx, &key_cols);
                let hash = hash_key(&key_values);
                let group = *group_of.entry(hash).or_insert_with(|| {
                    group_keys.push(key_values.iter().map(|v| (*v).clone()).collect());
                    group_rows.push(Vec::new());
                    group_keys.len() - 1
                });
                group_rows[group].push(row_idx);
            }
        }

        let mut out = TableBuilder::new(schema);
        for (key_values, rows) in group_keys.into_iter().zip(&group_rows) {
            let mut row = key_values;
            for agg in &self.aggregates {
                row.push(reduce_group(input, rows, agg)?);
            }
            out.push_row(row)?;
        }
        out.finish()
    }
}

/// Reduce one group to one cell for a single aggregate.
fn reduce_group(input: &Table, rows: &[usize], agg: &NamedAggregate) -> Result<Value> {
    let column = match agg.aggregate.input_column() {
        None => return Ok(Value::Int(rows.len() as i64)),
        Some(c) => c,
    };
    let col = input.schema().require(column)?;

    // Collect present values, enforcing the missing policy.
    let mut present: Vec<&Value> = Vec::with_capacity(rows.len());
    for &row_idx in rows {
        match input.value(row_idx, col) {
            Some(Value::Missing) | None => match agg.on_missing {
                MissingPolicy::Strict => {
                    return Err(Error::MissingValue(format!(
                        "{} over column '{}' hit a missing value at row {}",
                        agg.alias, column, row_idx
                    )))
                }
                MissingPolicy::Skip => {}
            },
            Some(v) => present.push(v),
        }
    }

    Ok(match &agg.aggregate {
        Aggregate::Count => unreachable!("count handled above"),
        Aggregate::Sum(_) => sum_values(&present, input.schema().fields[col].data_type),
        Aggregate::Mean(_) => mean_values(&present),
        Aggregate::Min(_) => extremum(&present, std::cmp::Ordering::Less),
        Aggregate::Max(_) => extremum(&present, std::cmp::Ordering::Greater),
    })
}

fn sum_values(values: &[&Value], dtype: DataType) -> Value {
    match dtype {
        DataType::Int => {
            let mut acc: i64 = 0;
            for v in values {
                if let Value::Int(i) = v {
                    acc += i;
                }
            }
            Value::Int(acc)
        }
        _ => {
            let mut acc: f64 = 0.0;
            for v in values {
                match v {
                    Value::Float(f) => acc += f,
                    Value::Int(i) => acc += *i as f64,
                    _ => {}
                }
            }
            Value::Float(acc)
        }
    }
}

fn mean_values(values: &[&Value]) -> Value {
    if values.is_empty() {
        return Value::Missing;
    }
    let mut acc: f64 = 0.0;
    for v in values {
        match v {
            Value::Float(f) => acc += f,
            Value::Int(i) => acc += *i as f64,
            _ => {}
        }
    }
    Value::Float(acc / values.len() as f64)
}

fn extremum(values: &[&Value], keep: std::cmp::Ordering) -> Value {
    let mut best: Option<&Value> = None;
    for &v in values {
        best = Some(match best {
            None => v,
            Some(b) => {
                if value_cmp(v, b) == keep {
                    v
                } else {
                    b
                }
            }
        });
    }
    best.cloned().unwrap_or(Value::Missing)
}

//! Spread: the inverse of gather. Distinct values of the key column become
//! new column names; each remaining (identifier) combination becomes one
//! output row with the matching value-column cells placed under the new
//! columns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tidyframe_core::key::{hash_key, KeyHash};
use tidyframe_core::prelude::{
    DataType, Error, Field, Result, Schema, Table, TableBuilder, Value,
};
use tidyframe_core::value::{value_cmp, MISSING};

use crate::traits::Verb;

/// How to resolve duplicate (identifier-combination, key) pairs. Without a
/// reducer, duplicates are a `DuplicateKey` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reducer {
    First,
    Last,
    Sum,
    Mean,
    Min,
    Max,
    Count,
}

pub struct Spread {
    pub key: String,
    pub value: String,
    pub on_duplicate: Option<Reducer>,
}

impl Spread {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            on_duplicate: None,
        }
    }

    pub fn resolve_duplicates(mut self, reducer: Reducer) -> Self {
        self.on_duplicate = Some(reducer);
        self
    }

    fn check(&self, input: &Schema) -> Result<(usize, usize, Vec<usize>)> {
        let key_idx = input.require(&self.key)?;
        let value_idx = input.require(&self.value)?;
        if key_idx == value_idx {
            return Err(Error::AmbiguousSelection(
                "spread key and value name the same column".into(),
            ));
        }
        if input.fields[key_idx].data_type != DataType::Str {
            return Err(Error::SchemaViolation(format!(
                "spread key column '{}' must be str, found {}",
                self.key, input.fields[key_idx].data_type
            )));
        }
        if matches!(self.on_duplicate, Some(Reducer::Sum | Reducer::Mean))
            && !matches!(
                input.fields[value_idx].data_type,
                DataType::Int | DataType::Float
            )
        {
            return Err(Error::TypeConflict(format!(
                "numeric reducer over value column '{}' of type {}",
                self.value, input.fields[value_idx].data_type
            )));
        }
        let identifiers: Vec<usize> = (0..input.len())
            .filter(|&i| i != key_idx && i != value_idx)
            .collect();
        Ok((key_idx, value_idx, identifiers))
    }

    fn value_dtype(&self, input: &Schema, value_idx: usize) -> DataType {
        match self.on_duplicate {
            Some(Reducer::Count) => DataType::Int,
            Some(Reducer::Mean) => DataType::Float,
            _ => input.fields[value_idx].data_type,
        }
    }
}

impl Verb for Spread {
    fn name(&self) -> &'static str {
        "spread"
    }

    /// The output schema depends on the key column's *values*, which a
    /// schema alone cannot provide; identifier columns are all that can be
    /// promised here. `apply` builds the full widened schema.
    fn output_schema(&self, input: &Schema) -> Result<Schema> {
        let (_, _, identifiers) = self.check(input)?;
        Schema::new(identifiers.iter().map(|&i| input.fields[i].clone()).collect())
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let (key_idx, value_idx, identifiers) = self.check(input.schema())?;

        // Pass 1: discover key values (new columns) and identifier
        // combinations (output rows), both in first-appearance order, and
        // collect every contributing cell.
        let mut col_of: HashMap<String, usize> = HashMap::new();
        let mut key_names: Vec<String> = Vec::new();
        let mut row_of: HashMap<KeyHash, usize> = HashMap::new();
        let mut id_tuples: Vec<Vec<Value>> = Vec::new();
        // cells[row][col] = values contributed by input rows.
        let mut cells: Vec<Vec<Vec<Value>>> = Vec::new();

        for row_idx in 0..input.n_rows() {
            let key_name = match input.value(row_idx, key_idx).unwrap_or(&MISSING) {
                Value::Str(s) => s.clone(),
                Value::Missing => {
                    return Err(Error::SchemaViolation(format!(
                        "spread key column '{}' has a missing value at row {}",
                        self.key, row_idx
                    )))
                }
                other => {
                    return Err(Error::SchemaViolation(format!(
                        "spread key column '{}' holds non-string value {:?}",
                        self.key, other
                    )))
                }
            };

            let col = match col_of.get(&key_name) {
                Some(&c) => c,
                None => {
                    let c = key_names.len();
                    col_of.insert(key_name.clone(), c);
                    key_names.push(key_name);
                    for row_cells in &mut cells {
                        row_cells.push(Vec::new());
                    }
                    c
                }
            };

            let id_values = input.key_tuple(row_idx, &identifiers);
            let hash = hash_key(&id_values);
            let row = match row_of.get(&hash) {
                Some(&r) => r,
                None => {
                    let r = id_tuples.len();
                    row_of.insert(hash, r);
                    id_tuples.push(id_values.iter().map(|v| (*v).clone()).collect());
                    cells.push(vec![Vec::new(); key_names.len()]);
                    r
                }
            };

            let value = input.value(row_idx, value_idx).cloned().unwrap_or(Value::Missing);
            cells[row][col].push(value);
        }

        for name in &key_names {
            if identifiers
                .iter()
                .any(|&i| &input.schema().fields[i].name == name)
            {
                return Err(Error::SchemaConflict(format!(
                    "spread key value '{}' collides with an existing column",
                    name
                )));
            }
        }

        // A cell is a hole when its identifier combination never saw this
        // key; holes force the widened columns nullable.
        let has_holes = cells.iter().any(|r| r.iter().any(Vec::is_empty));
        let value_dtype = self.value_dtype(input.schema(), value_idx);
        let nullable = has_holes || input.schema().fields[value_idx].nullable;

        let mut fields: Vec<Field> = identifiers
            .iter()
            .map(|&i| input.schema().fields[i].clone())
            .collect();
        for name in &key_names {
            fields.push(Field::new(name.clone(), value_dtype, nullable));
        }
        let schema = Schema::new(fields)?;

        // Pass 2: place cells, reducing duplicates if a reducer was given.
        let mut out = TableBuilder::new(schema);
        for (id_tuple, row_cells) in id_tuples.into_iter().zip(cells) {
            let mut row = id_tuple;
            for (col, bucket) in row_cells.into_iter().enumerate() {
                row.push(self.place(&key_names[col], bucket)?);
            }
            out.push_row(row)?;
        }
        out.finish()
    }
}

impl Spread {
    fn place(&self, key_name: &str, bucket: Vec<Value>) -> Result<Value> {
        if bucket.is_empty() {
            return Ok(Value::Missing);
        }
        // A reducer reduces even singleton buckets so the widened columns
        // stay uniformly typed (mean is always float, count always int).
        if let Some(reducer) = self.on_duplicate {
            return Ok(reduce(reducer, bucket));
        }
        if bucket.len() > 1 {
            return Err(Error::DuplicateKey(format!(
                "spread found {} rows for key '{}' within one identifier combination",
                bucket.len(),
                key_name
            )));
        }
        Ok(bucket.into_iter().next().unwrap_or(Value::Missing))
    }
}

fn reduce(reducer: Reducer, bucket: Vec<Value>) -> Value {
    match reducer {
        Reducer::First => bucket.into_iter().next().unwrap_or(Value::Missing),
        Reducer::Last => bucket.into_iter().next_back().unwrap_or(Value::Missing),
        Reducer::Count => Value::Int(bucket.len() as i64),
        Reducer::Min | Reducer::Max => {
            let keep = if reducer == Reducer::Min {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            };
            let mut best: Option<Value> = None;
            for v in bucket {
                if v.is_missing() {
                    continue;
                }
                best = Some(match best {
                    None => v,
                    Some(b) => {
                        if value_cmp(&v, &b) == keep {
                            v
                        } else {
                            b
                        }
                    }
                });
            }
            best.unwrap_or(Value::Missing)
        }
        Reducer::Sum | Reducer::Mean => {
            let mut acc = 0.0f64;
            let mut n = 0usize;
            let mut all_int = true;
            for v in bucket {
                match v {
                    Value::Int(i) => {
                        acc += i as f64;
                        n += 1;
                    }
                    Value::Float(f) => {
                        acc += f;
                        n += 1;
                        all_int = false;
                    }
                    _ => {}
                }
            }
            if reducer == Reducer::Mean {
                if n == 0 {
                    Value::Missing
                } else {
                    Value::Float(acc / n as f64)
                }
            } else if all_int {
                Value::Int(acc as i64)
            } else {
                Value::Float(acc)
            }
        }
    }
}

//! Hash joins over shared key columns.
//!
//! The right-hand table is held by the verb itself, so a join stage remains
//! Table → Table like every other verb; a codebook/lookup table is just an
//! ordinary right-hand side. Keys must share names and types on both
//! sides; mismatched names are resolved by an explicit rename (mutate or
//! select) before joining, never implicitly here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tidyframe_core::key::{hash_key, KeyHash};
use tidyframe_core::prelude::{Error, Result, Schema, Table, TableBuilder, Value};

use crate::traits::Verb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinMode {
    Inner,
    Left,
    Right,
    Full,
    Semi,
    Anti,
}

impl JoinMode {
    /// Semi/anti filter the left side and never add right columns.
    fn filtering(self) -> bool {
        matches!(self, JoinMode::Semi | JoinMode::Anti)
    }
}

pub struct Join {
    pub right: Table,
    pub on: Vec<String>,
    pub mode: JoinMode,
}

impl Join {
    pub fn new<I, S>(right: Table, on: I, mode: JoinMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            right,
            on: on.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    /// Indices of right-side columns that are not join keys, in schema order.
    fn right_extra(&self) -> Vec<usize> {
        (0..self.right.schema().len())
            .filter(|&i| {
                let name = &self.right.schema().fields[i].name;
                !self.on.iter().any(|k| k == name)
            })
            .collect()
    }

    fn check(&self, left: &Schema) -> Result<()> {
        if self.on.is_empty() {
            return Err(Error::AmbiguousSelection("join requires at least one key".into()));
        }
        let right = self.right.schema();
        for key in &self.on {
            let l = left
                .index_of(key)
                .ok_or_else(|| Error::SchemaConflict(format!("join key '{}' absent from left side", key)))?;
            let r = right
                .index_of(key)
                .ok_or_else(|| Error::SchemaConflict(format!("join key '{}' absent from right side", key)))?;
            if left.fields[l].data_type != right.fields[r].data_type {
                return Err(Error::SchemaConflict(format!(
                    "join key '{}' is {} on the left but {} on the right",
                    key, left.fields[l].data_type, right.fields[r].data_type
                )));
            }
        }
        if !self.mode.filtering() {
            for field in &right.fields {
                if !self.on.iter().any(|k| k == &field.name) && left.index_of(&field.name).is_some()
                {
                    return Err(Error::SchemaConflict(format!(
                        "non-key column '{}' exists on both sides; rename before joining",
                        field.name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Verb for Join {
    fn name(&self) -> &'static str {
        "join"
    }

    fn output_schema(&self, input: &Schema) -> Result<Schema> {
        self.check(input)?;

        if self.mode.filtering() {
            return Ok(input.clone());
        }

        // Left schema first (keys appear once, from the left), then the
        // right-only columns. Sides that can go unmatched become nullable.
        let left_nullable = matches!(self.mode, JoinMode::Right | JoinMode::Full);
        let right_nullable = matches!(self.mode, JoinMode::Left | JoinMode::Full);

        let mut fields = Vec::with_capacity(input.len() + self.right_extra().len());
        for f in &input.fields {
            let mut f = f.clone();
            if left_nullable {
                match self.right.schema().index_of(&f.name) {
                    // Unmatched right rows supply the key cells, so a key
                    // nullable on either side stays nullable in the output.
                    Some(r) if self.on.iter().any(|k| k == &f.name) => {
                        f.nullable = f.nullable || self.right.schema().fields[r].nullable;
                    }
                    _ => f.nullable = true,
                }
            }
            fields.push(f);
        }
        for &i in &self.right_extra() {
            let mut f = self.right.schema().fields[i].clone();
            if right_nullable {
                f.nullable = true;
            }
            fields.push(f);
        }
        Schema::new(fields)
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let schema = self.output_schema(input.schema())?;

        let left_keys: Vec<usize> = self
            .on
            .iter()
            .map(|k| input.schema().require(k))
            .collect::<Result<_>>()?;
        let right_keys: Vec<usize> = self
            .on
            .iter()
            .map(|k| self.right.schema().require(k))
            .collect::<Result<_>>()?;
        let right_extra = self.right_extra();

        // Bucket the right side by key hash. Missing key cells hash like any
        // other value, so missing matches missing (dplyr semantics).
        let mut buckets: HashMap<KeyHash, Vec<usize>> = HashMap::new();
        for r in 0..self.right.n_rows() {
            let key = self.right.key_tuple(r, &right_keys);
            buckets.entry(hash_key(&key)).or_default().push(r);
        }

        let mut out = TableBuilder::new(schema);
        let mut right_matched = vec![false; self.right.n_rows()];

        // Probe from the left, preserving left row order; multiple matches
        // multiply in right-side order.
        for l in 0..input.n_rows() {
            let key = input.key_tuple(l, &left_keys);
            let matches = buckets.get(&hash_key(&key)).map(Vec::as_slice).unwrap_or(&[]);

            match self.mode {
                JoinMode::Semi => {
                    if !matches.is_empty() {
                        out.push_row(row_values(input, l))?;
                    }
                }
                JoinMode::Anti => {
                    if matches.is_empty() {
                        out.push_row(row_values(input, l))?;
                    }
                }
                JoinMode::Inner | JoinMode::Left | JoinMode::Right | JoinMode::Full => {
                    for &r in matches {
                        right_matched[r] = true;
                        let mut row = row_values(input, l);
                        for &c in &right_extra {
                            row.push(self.right.value(r, c).cloned().unwrap_or(Value::Missing));
                        }
                        out.push_row(row)?;
                    }
                    if matches.is_empty()
                        && matches!(self.mode, JoinMode::Left | JoinMode::Full)
                    {
                        let mut row = row_values(input, l);
                        row.extend(right_extra.iter().map(|_| Value::Missing));
                        out.push_row(row)?;
                    }
                }
            }
        }

        // Right/full: append right rows that never matched, key cells taken
        // from the right row and left-only cells missing.
        if matches!(self.mode, JoinMode::Right | JoinMode::Full) {
            for (r, matched) in right_matched.iter().enumerate() {
                if *matched {
                    continue;
                }
                let mut row = Vec::with_capacity(input.n_cols() + right_extra.len());
                for f in &input.schema().fields {
                    match self.on.iter().position(|k| k == &f.name) {
                        Some(key_pos) => {
                            let c = right_keys[key_pos];
                            row.push(self.right.value(r, c).cloned().unwrap_or(Value::Missing));
                        }
                        None => row.push(Value::Missing),
                    }
                }
                for &c in &right_extra {
                    row.push(self.right.value(r, c).cloned().unwrap_or(Value::Missing));
                }
                out.push_row(row)?;
            }
        }

        out.finish()
    }
}

fn row_values(table: &Table, row: usize) -> Vec<Value> {
    (0..table.n_cols())
        .map(|c| table.value(row, c).cloned().unwrap_or(Value::Missing))
        .collect()
}

//! Stable multi-key sorting.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use tidyframe_core::prelude::{Result, Schema, Table};
use tidyframe_core::value::{value_cmp, MISSING};

use crate::traits::Verb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: Direction,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Descending,
        }
    }
}

/// Stable multi-key sort: keys compared in order, ties broken by
/// subsequent keys, final ties keep the original relative order.
///
/// Missing sorts last in ascending order; descending is the reversed
/// comparator, so missing sorts first there.
pub struct Arrange {
    pub keys: Vec<SortKey>,
}

impl Arrange {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }
}

impl Verb for Arrange {
    fn name(&self) -> &'static str {
        "arrange"
    }

    fn output_schema(&self, input: &Schema) -> Result<Schema> {
        for key in &self.keys {
            input.require(&key.column)?;
        }
        Ok(input.clone())
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let schema = self.output_schema(input.schema())?;

        let key_cols: Vec<usize> = self
            .keys
            .iter()
            .map(|k| schema.require(&k.column))
            .collect::<Result<_>>()?;

        // Sort row indices, then reindex every column (cheaper than
        // shuffling whole rows around).
        let mut order: Vec<usize> = (0..input.n_rows()).collect();
        order.sort_by(|&a, &b| {
            for (key, &col) in self.keys.iter().zip(&key_cols) {
                let va = input.value(a, col).unwrap_or(&MISSING);
                let vb = input.value(b, col).unwrap_or(&MISSING);
                let ord = match key.direction {
                    Direction::Ascending => value_cmp(va, vb),
                    Direction::Descending => value_cmp(vb, va),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        let columns = (0..input.n_cols())
            .map(|c| {
                let source = input.column(c).unwrap_or_default();
                order.iter().map(|&i| source[i].clone()).collect()
            })
            .collect();

        Table::new(schema, columns)
    }
}

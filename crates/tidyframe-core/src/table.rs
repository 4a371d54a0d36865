//! The immutable columnar table value type.
//!
//! A `Table` is a `Schema` plus one value vector per field, all of equal
//! length. Construction validates every cell against its declared column
//! type; after that the table is never mutated and every engine operation
//! builds a fresh `Table` via `Table::new`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::{Field, Schema};
use crate::value::{Value, MISSING};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    schema: Schema,
    /// One vector per schema field, column-major.
    columns: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table from a schema and column-major data, validating that
    /// every column has the same length and every cell fits its declared
    /// type. Missing cells require a nullable column.
    pub fn new(schema: Schema, columns: Vec<Vec<Value>>) -> Result<Self> {
        if schema.len() != columns.len() {
            return Err(Error::SchemaViolation(format!(
                "schema declares {} columns but {} were supplied",
                schema.len(),
                columns.len()
            )));
        }

        let n_rows = columns.first().map(|c| c.len()).unwrap_or(0);
        for (field, column) in schema.fields.iter().zip(&columns) {
            if column.len() != n_rows {
                return Err(Error::SchemaViolation(format!(
                    "column '{}' has {} rows, expected {}",
                    field.name,
                    column.len(),
                    n_rows
                )));
            }
            for (row_idx, value) in column.iter().enumerate() {
                check_cell(field, value, row_idx)?;
            }
        }

        Ok(Self { schema, columns })
    }

    /// Row-major convenience constructor.
    pub fn from_rows(schema: Schema, rows: Vec<Vec<Value>>) -> Result<Self> {
        let width = schema.len();
        let mut columns: Vec<Vec<Value>> = (0..width)
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(Error::SchemaViolation(format!(
                    "row {} has {} values, expected {}",
                    row_idx,
                    row.len(),
                    width
                )));
            }
            for (col, value) in columns.iter_mut().zip(row) {
                col.push(value);
            }
        }

        Self::new(schema, columns)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.schema.len()
    }

    pub fn column(&self, idx: usize) -> Option<&[Value]> {
        self.columns.get(idx).map(|c| c.as_slice())
    }

    pub fn column_by_name(&self, name: &str) -> Option<&[Value]> {
        self.schema.index_of(name).and_then(|i| self.column(i))
    }

    pub fn value(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col).and_then(|c| c.get(row))
    }

    /// Borrow the cells of `cols` in one row as a key tuple for hashing.
    /// Out-of-range cells read as missing.
    pub fn key_tuple(&self, row: usize, cols: &[usize]) -> Vec<&Value> {
        cols.iter()
            .map(|&c| self.value(row, c).unwrap_or(&MISSING))
            .collect()
    }

    /// A lazy, restartable iterator over row views. Restart by calling
    /// `rows()` again; nothing is materialized per row.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            next: 0,
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a table from `to_json` output. Cells are revalidated
    /// against the embedded schema; hand-edited JSON cannot smuggle in an
    /// ill-typed table.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Table = serde_json::from_str(json)?;
        Self::new(raw.schema, raw.columns)
    }
}

fn check_cell(field: &Field, value: &Value, row_idx: usize) -> Result<()> {
    if value.is_missing() {
        if !field.nullable {
            return Err(Error::SchemaViolation(format!(
                "missing value in non-nullable column '{}' at row {}",
                field.name, row_idx
            )));
        }
        return Ok(());
    }
    if !value.fits(field.data_type) {
        return Err(Error::SchemaViolation(format!(
            "column '{}' declared {} but row {} holds {:?}",
            field.name, field.data_type, row_idx, value
        )));
    }
    Ok(())
}

/// Borrowed view of a single row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    idx: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.table
            .schema
            .index_of(name)
            .and_then(|col| self.table.value(self.idx, col))
    }

    /// Clone the row out as an owned value tuple in schema order.
    pub fn to_vec(&self) -> Vec<Value> {
        (0..self.table.n_cols())
            .map(|c| self.table.value(self.idx, c).cloned().unwrap_or(Value::Missing))
            .collect()
    }
}

pub struct Rows<'a> {
    table: &'a Table,
    next: usize,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Row<'a>> {
        if self.next >= self.table.n_rows() {
            return None;
        }
        let row = Row {
            table: self.table,
            idx: self.next,
        };
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.table.n_rows().saturating_sub(self.next);
        (rem, Some(rem))
    }
}

impl<'a> ExactSizeIterator for Rows<'a> {}

/// Builder that accumulates rows against a fixed schema and validates once
/// at the end. Engine verbs use this when producing their output tables.
pub struct TableBuilder {
    schema: Schema,
    columns: Vec<Vec<Value>>,
}

impl TableBuilder {
    pub fn new(schema: Schema) -> Self {
        let columns = (0..schema.len()).map(|_| Vec::new()).collect();
        Self { schema, columns }
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.schema.len() {
            return Err(Error::SchemaViolation(format!(
                "builder row has {} values, expected {}",
                row.len(),
                self.schema.len()
            )));
        }
        for (col, value) in self.columns.iter_mut().zip(row) {
            col.push(value);
        }
        Ok(())
    }

    pub fn finish(self) -> Result<Table> {
        Table::new(self.schema, self.columns)
    }
}

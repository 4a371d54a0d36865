//! Derived columns.

use std::sync::Arc;

use tidyframe_core::prelude::{DataType, Error, Field, Result, Row, Schema, Table, Value};

use crate::traits::Verb;

/// Appends one computed column, or replaces an existing column of the same
/// name in place. The compute function must be pure: it sees one row at a
/// time and nothing else. Row count is unchanged.
pub struct Mutate {
    pub column: String,
    pub data_type: DataType,
    compute: Arc<dyn Fn(&Row<'_>) -> Value + Send + Sync>,
}

impl Mutate {
    pub fn new<F>(column: impl Into<String>, data_type: DataType, compute: F) -> Self
    where
        F: Fn(&Row<'_>) -> Value + Send + Sync + 'static,
    {
        Self {
            column: column.into(),
            data_type,
            compute: Arc::new(compute),
        }
    }

    // The produced field is nullable: compute functions may return Missing.
    fn new_field(&self) -> Field {
        Field::new(self.column.clone(), self.data_type, true)
    }
}

impl Verb for Mutate {
    fn name(&self) -> &'static str {
        "mutate"
    }

    fn output_schema(&self, input: &Schema) -> Result<Schema> {
        let mut fields = input.fields.clone();
        match input.index_of(&self.column) {
            Some(idx) => fields[idx] = self.new_field(),
            None => fields.push(self.new_field()),
        }
        Schema::new(fields)
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let schema = self.output_schema(input.schema())?;

        let mut computed = Vec::with_capacity(input.n_rows());
        for row in input.rows() {
            let value = (self.compute)(&row);
            if !value.fits(self.data_type) {
                return Err(Error::SchemaViolation(format!(
                    "mutate '{}' declared {} but produced {:?} at row {}",
                    self.column,
                    self.data_type,
                    value,
                    row.index()
                )));
            }
            computed.push(value);
        }

        let replaced = input.schema().index_of(&self.column);
        let mut columns: Vec<Vec<Value>> = (0..input.n_cols())
            .map(|c| input.column(c).unwrap_or_default().to_vec())
            .collect();
        match replaced {
            Some(idx) => columns[idx] = computed,
            None => columns.push(computed),
        }

        Table::new(schema, columns)
    }
}

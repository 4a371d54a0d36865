//! Gather: collapse a set of columns into (key, value) pairs, lengthening
//! the table. Columns not matched by the selector are identifiers and are
//! repeated once per gathered column.

use tidyframe_core::prelude::{
    CoercionPolicy, DataType, Error, Field, Result, Schema, Selector, Table, TableBuilder, Value,
};

use crate::traits::Verb;

pub struct Gather {
    pub key: String,
    pub value: String,
    pub selector: Selector,
    pub on_conflict: CoercionPolicy,
}

impl Gather {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        selector: Selector,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            selector,
            on_conflict: CoercionPolicy::Strict,
        }
    }

    /// Opt into rendering heterogeneous gathered values as strings instead
    /// of failing with `TypeConflict`.
    pub fn coerce_to_string(mut self) -> Self {
        self.on_conflict = CoercionPolicy::CoerceToString;
        self
    }

    pub fn with_policy(mut self, policy: CoercionPolicy) -> Self {
        self.on_conflict = policy;
        self
    }

    /// (identifier column indices, gathered column indices, value field).
    fn split(&self, input: &Schema) -> Result<(Vec<usize>, Vec<usize>, Field)> {
        let gathered = self.selector.resolve(input)?;

        let identifiers: Vec<usize> = (0..input.len())
            .filter(|i| !gathered.contains(i))
            .collect();

        for &i in &identifiers {
            let name = &input.fields[i].name;
            if name == &self.key || name == &self.value {
                return Err(Error::SchemaConflict(format!(
                    "gather output column '{}' collides with identifier column",
                    name
                )));
            }
        }

        let value_field = self.unify(input, &gathered)?;
        Ok((identifiers, gathered, value_field))
    }

    /// The value column's type is the common type of the gathered columns:
    /// identical types carry through, Int widens with Float, and anything
    /// else follows the configured policy.
    fn unify(&self, input: &Schema, gathered: &[usize]) -> Result<Field> {
        let nullable = gathered.iter().any(|&i| input.fields[i].nullable);

        let mut unified: Option<DataType> = None;
        let mut conflict = false;
        for &i in gathered {
            let dt = input.fields[i].data_type;
            unified = Some(match unified {
                None => dt,
                Some(u) if u == dt => u,
                Some(DataType::Int) if dt == DataType::Float => DataType::Float,
                Some(DataType::Float) if dt == DataType::Int => DataType::Float,
                Some(u) => {
                    conflict = true;
                    u
                }
            });
        }

        let dtype = match (conflict, self.on_conflict) {
            (false, _) => unified.unwrap_or(DataType::Str),
            (true, CoercionPolicy::CoerceToString) => DataType::Str,
            (true, CoercionPolicy::Strict) => {
                return Err(Error::TypeConflict(format!(
                    "gathered columns disagree in type; rename or use \
                     CoercionPolicy::CoerceToString for '{}'",
                    self.value
                )))
            }
        };

        Ok(Field::new(self.value.clone(), dtype, nullable))
    }
}

impl Verb for Gather {
    fn name(&self) -> &'static str {
        "gather"
    }

    fn output_schema(&self, input: &Schema) -> Result<Schema> {
        let (identifiers, _, value_field) = self.split(input)?;

        let mut fields: Vec<Field> = identifiers
            .iter()
            .map(|&i| input.fields[i].clone())
            .collect();
        fields.push(Field::new(self.key.clone(), DataType::Str, false));
        fields.push(value_field);
        Schema::new(fields)
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let schema = self.output_schema(input.schema())?;
        let (identifiers, gathered, value_field) = self.split(input.schema())?;

        let coerce = value_field.data_type == DataType::Str
            && gathered
                .iter()
                .any(|&i| input.schema().fields[i].data_type != DataType::Str);

        // One output row per (input row, gathered column), in selector order.
        let mut out = TableBuilder::new(schema);
        for row_idx in 0..input.n_rows() {
            for &g in &gathered {
                let mut row: Vec<Value> = identifiers
                    .iter()
                    .map(|&i| input.value(row_idx, i).cloned().unwrap_or(Value::Missing))
                    .collect();
                row.push(Value::Str(input.schema().fields[g].name.clone()));

                let cell = input.value(row_idx, g).cloned().unwrap_or(Value::Missing);
                let cell = if coerce {
                    match cell.render() {
                        Some(s) => Value::Str(s),
                        None => Value::Missing,
                    }
                } else {
                    promote(cell, value_field.data_type)
                };
                row.push(cell);
                out.push_row(row)?;
            }
        }
        out.finish()
    }
}

/// Widen an Int cell into a Float value column; everything else carries
/// through untouched.
fn promote(cell: Value, target: DataType) -> Value {
    match (cell, target) {
        (Value::Int(i), DataType::Float) => Value::Float(i as f64),
        (cell, _) => cell,
    }
}

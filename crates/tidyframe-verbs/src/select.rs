//! Column projection.

use tidyframe_core::prelude::{Result, Schema, Selector, Table};

use crate::traits::Verb;

/// Projects to the columns named by a selector. Row order and count are
/// preserved; `Columns` selectors keep selector order, `AllBut` keeps
/// schema order.
pub struct Select {
    pub selector: Selector,
}

impl Select {
    pub fn new(selector: Selector) -> Self {
        Self { selector }
    }
}

impl Verb for Select {
    fn name(&self) -> &'static str {
        "select"
    }

    fn output_schema(&self, input: &Schema) -> Result<Schema> {
        let indices = self.selector.resolve(input)?;
        Schema::new(indices.iter().map(|&i| input.fields[i].clone()).collect())
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let schema = self.output_schema(input.schema())?;
        let indices = self.selector.resolve(input.schema())?;

        let columns = indices
            .iter()
            .map(|&i| input.column(i).unwrap_or_default().to_vec())
            .collect();

        Table::new(schema, columns)
    }
}

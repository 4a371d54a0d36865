//! Column selectors: an explicit, schema-validated replacement for bare
//! column names. Resolution errors surface before any row work happens.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::schema::Schema;

/// Names a set of columns, either directly or as a complement
/// ("all but these").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    Columns(Vec<String>),
    AllBut(Vec<String>),
}

impl Selector {
    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selector::Columns(names.into_iter().map(Into::into).collect())
    }

    pub fn all_but<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selector::AllBut(names.into_iter().map(Into::into).collect())
    }

    /// Resolve to column indices against a schema.
    ///
    /// `Columns` resolves in selector order; `AllBut` in schema order.
    /// Unknown names are a `SchemaViolation`; repeated names and an empty
    /// resolution are `AmbiguousSelection`.
    pub fn resolve(&self, schema: &Schema) -> Result<Vec<usize>> {
        let named = match self {
            Selector::Columns(names) | Selector::AllBut(names) => names,
        };

        for (i, name) in named.iter().enumerate() {
            if named[..i].contains(name) {
                return Err(Error::AmbiguousSelection(format!(
                    "column '{}' named more than once",
                    name
                )));
            }
        }

        let indices: Vec<usize> = match self {
            Selector::Columns(names) => names
                .iter()
                .map(|n| schema.require(n))
                .collect::<Result<_>>()?,
            Selector::AllBut(names) => {
                for n in names {
                    schema.require(n)?;
                }
                (0..schema.len())
                    .filter(|&i| !names.iter().any(|n| n == &schema.fields[i].name))
                    .collect()
            }
        };

        if indices.is_empty() {
            return Err(Error::AmbiguousSelection(
                "selector resolves to zero columns".into(),
            ));
        }

        Ok(indices)
    }
}

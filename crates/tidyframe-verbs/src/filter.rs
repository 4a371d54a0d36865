//! Row restriction with three-valued predicate evaluation.
//!
//! A comparison against a missing cell is *unknown*, not false: unknown
//! propagates through `Not`/`All`/`Any` the Kleene way, and a row whose
//! overall result is unknown is excluded. Missing never raises and never
//! admits a row.

use std::cmp::Ordering;
use std::sync::Arc;

use tidyframe_core::prelude::{Error, Result, Row, Schema, Table, TableBuilder, Value};
use tidyframe_core::value::value_cmp;

use crate::traits::Verb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Predicate tree. `Row` wraps an arbitrary pure row function; the
/// structured variants are schema-checked up front.
#[derive(Clone)]
pub enum Predicate {
    Cmp {
        column: String,
        op: CmpOp,
        literal: Value,
    },
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
    Row(Arc<dyn Fn(&Row<'_>) -> bool + Send + Sync>),
}

impl Predicate {
    pub fn cmp(column: impl Into<String>, op: CmpOp, literal: Value) -> Self {
        Predicate::Cmp {
            column: column.into(),
            op,
            literal,
        }
    }

    pub fn row<F>(f: F) -> Self
    where
        F: Fn(&Row<'_>) -> bool + Send + Sync + 'static,
    {
        Predicate::Row(Arc::new(f))
    }

    /// Validate column references and literal types against a schema.
    fn check(&self, schema: &Schema) -> Result<()> {
        match self {
            Predicate::Cmp {
                column, literal, ..
            } => {
                let idx = schema.require(column)?;
                let field = &schema.fields[idx];
                if literal.is_missing() {
                    return Err(Error::TypeConflict(format!(
                        "predicate literal for '{}' may not be missing",
                        column
                    )));
                }
                if !literal.fits(field.data_type) {
                    return Err(Error::TypeConflict(format!(
                        "predicate literal {:?} does not match column '{}' of type {}",
                        literal, column, field.data_type
                    )));
                }
                Ok(())
            }
            Predicate::All(ps) | Predicate::Any(ps) => {
                ps.iter().try_for_each(|p| p.check(schema))
            }
            Predicate::Not(p) => p.check(schema),
            Predicate::Row(_) => Ok(()),
        }
    }

    /// Three-valued evaluation: `None` is unknown (missing involved).
    fn eval(&self, row: &Row<'_>) -> Option<bool> {
        match self {
            Predicate::Cmp {
                column,
                op,
                literal,
            } => {
                let cell = row.get(column)?;
                if cell.is_missing() {
                    return None;
                }
                let ord = value_cmp(cell, literal);
                Some(match op {
                    CmpOp::Eq => ord == Ordering::Equal,
                    CmpOp::Ne => ord != Ordering::Equal,
                    CmpOp::Lt => ord == Ordering::Less,
                    CmpOp::Le => ord != Ordering::Greater,
                    CmpOp::Gt => ord == Ordering::Greater,
                    CmpOp::Ge => ord != Ordering::Less,
                })
            }
            Predicate::All(ps) => {
                let mut unknown = false;
                for p in ps {
                    match p.eval(row) {
                        Some(false) => return Some(false),
                        None => unknown = true,
                        Some(true) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(true)
                }
            }
            Predicate::Any(ps) => {
                let mut unknown = false;
                for p in ps {
                    match p.eval(row) {
                        Some(true) => return Some(true),
                        None => unknown = true,
                        Some(false) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(false)
                }
            }
            Predicate::Not(p) => p.eval(row).map(|b| !b),
            Predicate::Row(f) => Some(f(row)),
        }
    }
}

/// Retains rows where the predicate holds; relative row order is preserved.
pub struct Filter {
    pub predicate: Predicate,
}

impl Filter {
    pub fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    /// Shorthand for a filter built from a pure row function.
    pub fn with_fn<F>(f: F) -> Self
    where
        F: Fn(&Row<'_>) -> bool + Send + Sync + 'static,
    {
        Self::new(Predicate::row(f))
    }
}

impl Verb for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn output_schema(&self, input: &Schema) -> Result<Schema> {
        self.predicate.check(input)?;
        Ok(input.clone())
    }

    fn apply(&self, input: &Table) -> Result<Table> {
        let schema = self.output_schema(input.schema())?;

        let mut out = TableBuilder::new(schema);
        for row in input.rows() {
            if self.predicate.eval(&row) == Some(true) {
                out.push_row(row.to_vec())?;
            }
        }
        out.finish()
    }
}

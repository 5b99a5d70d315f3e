//! Compiled row filters.
//!
//! A [`RowFilter`] is parsed once from a query string and then evaluated
//! against any number of records. It holds no mutable state, so a single
//! instance can be shared across threads without locking.

use crate::expression::{evaluate_condition, Expression, ExpressionResult};
use crate::record::Record;
use crate::sql::{Parser, Projection};
use anyhow::{Context, Result};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct RowFilter {
    table_name: Option<String>,
    projection: Projection,
    condition: Option<Expression>,
}

impl RowFilter {
    /// Compile a `SELECT ... FROM <table> [WHERE ...]` query
    pub fn compile(sql: &str) -> Result<Self> {
        let select = Parser::new(sql)
            .parse_select()
            .context("parse statement")?;

        debug!(
            "compiled filter on table {}: {}",
            select.table,
            describe(select.where_clause.as_ref())
        );

        Ok(Self {
            table_name: Some(select.table),
            projection: select.projection,
            condition: select.where_clause,
        })
    }

    /// Compile a bare condition such as `a = 1 AND b LIKE 'x%'`
    pub fn from_condition(condition: &str) -> Result<Self> {
        let expr = Parser::new(condition)
            .parse_condition()
            .context("parse condition")?;

        debug!("compiled filter: {}", expr);

        Ok(Self::from_expression(expr))
    }

    /// Wrap an already-built expression tree
    pub fn from_expression(condition: Expression) -> Self {
        Self {
            table_name: None,
            projection: Projection::AllColumns,
            condition: Some(condition),
        }
    }

    /// Decide whether `record` satisfies the filter.
    ///
    /// A query without a WHERE clause matches every record.
    pub fn matches(&self, record: &Record) -> ExpressionResult<bool> {
        match &self.condition {
            Some(condition) => evaluate_condition(record, condition),
            None => Ok(true),
        }
    }

    /// Table named in the FROM clause, if compiled from a full query
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn condition(&self) -> Option<&Expression> {
        self.condition.as_ref()
    }
}

fn describe(condition: Option<&Expression>) -> String {
    match condition {
        Some(expr) => expr.to_string(),
        None => "<no condition>".to_string(),
    }
}

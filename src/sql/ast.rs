// SQL statement AST accepted by the filter front end

use crate::expression::Expression;

/// `SELECT <projection> FROM <table> [WHERE <condition>]`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub projection: Projection,
    pub table: String,
    pub where_clause: Option<Expression>,
}

/// Selected columns. Parsed for completeness; filtering never projects.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    AllColumns,
    Columns(Vec<String>),
}

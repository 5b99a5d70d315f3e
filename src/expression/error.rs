//! Error types for expression evaluation.

use crate::expression::BinaryOperator;
use crate::value::DataType;
use thiserror::Error;

/// Errors that abort the evaluation of a condition.
///
/// Missing columns, kind mismatches and empty `IN` lists are not errors; they
/// evaluate to `false`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// The left side of a comparison or `IN` test is not a column identifier
    #[error("left side of {context} must be a column identifier, got {found}: {expression}")]
    MalformedExpression {
        context: &'static str,
        found: &'static str,
        expression: String,
    },

    /// Operator not defined for the kind of the compared values
    #[error("unsupported {data_type} expression: {operator}")]
    UnsupportedOperator {
        operator: BinaryOperator,
        data_type: DataType,
    },
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;

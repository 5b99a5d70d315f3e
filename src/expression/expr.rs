//! Expression tree definitions.

use crate::expression::operator::BinaryOperator;
use crate::value::Value;
use std::fmt;

/// Boolean expression tree of a `WHERE` clause.
///
/// Trees are built once and evaluated read-only against many records. Operands
/// of comparisons and `IN` lists are general expressions so the tree can carry
/// whatever the parser produced; the evaluator decides which shapes are valid.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal constant value
    Literal(Value),

    /// Column reference by name
    Column(String),

    /// Parenthesized sub-expression
    Nested(Box<Expression>),

    /// Logical negation
    Not(Box<Expression>),

    /// Logical combinator or comparison
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    /// `expr IN (item, ...)`
    InList {
        expression: Box<Expression>,
        list: Vec<Expression>,
    },
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Create a column reference expression
    pub fn column(name: impl Into<String>) -> Self {
        Expression::Column(name.into())
    }

    /// Wrap in parentheses
    pub fn nested(inner: Expression) -> Self {
        Expression::Nested(Box::new(inner))
    }

    /// Create a NOT expression
    pub fn not_expr(inner: Expression) -> Self {
        Expression::Not(Box::new(inner))
    }

    /// Create a binary operation expression
    pub fn binary_op(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary_op(left, BinaryOperator::And, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary_op(left, BinaryOperator::Or, right)
    }

    /// `column <op> literal`, the usual shape of a comparison
    pub fn compare(column: impl Into<String>, op: BinaryOperator, value: impl Into<Value>) -> Self {
        Self::binary_op(Self::column(column), op, Self::literal(value))
    }

    /// `column IN (literal, ...)`
    pub fn in_list<V: Into<Value>>(
        column: impl Into<String>,
        items: impl IntoIterator<Item = V>,
    ) -> Self {
        Expression::InList {
            expression: Box::new(Self::column(column)),
            list: items.into_iter().map(|item| Self::literal(item)).collect(),
        }
    }

    /// Short name of the node kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "literal",
            Expression::Column(_) => "column",
            Expression::Nested(_) => "nested expression",
            Expression::Not(_) => "NOT expression",
            Expression::BinaryOp { op, .. } if op.is_logical() => "logical expression",
            Expression::BinaryOp { .. } => "comparison",
            Expression::InList { .. } => "IN list",
        }
    }

    /// Column name if this node is a plain column reference
    pub fn as_column(&self) -> Option<&str> {
        match self {
            Expression::Column(name) => Some(name),
            _ => None,
        }
    }
}

/// Renders the tree back to SQL text.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Column(name) => write!(f, "{}", name),
            Expression::Nested(inner) => write!(f, "({})", inner),
            Expression::Not(inner) => write!(f, "NOT {}", inner),
            Expression::BinaryOp { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Expression::InList { expression, list } => {
                write!(f, "{} IN (", expression)?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

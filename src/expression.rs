//! Filter conditions and their evaluation against records.
//!
//! This module provides:
//! - The expression tree of a `WHERE` clause
//! - The recursive, short-circuiting evaluator
//! - The errors evaluation can raise

pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;

pub use error::{ExpressionError, ExpressionResult};
pub use eval::{evaluate_condition, ExpressionEvaluator};
pub use expr::Expression;
pub use operator::BinaryOperator;

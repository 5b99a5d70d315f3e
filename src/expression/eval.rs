//! Expression evaluation implementation.

use crate::expression::{BinaryOperator, Expression, ExpressionError, ExpressionResult};
use crate::record::Record;
use crate::value::{DataType, Value};
use log::trace;

/// Evaluates conditions against a single record.
///
/// The evaluator holds no state besides the borrowed record, so one
/// expression tree can be evaluated from any number of threads at once.
pub struct ExpressionEvaluator<'a> {
    record: &'a Record,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    /// Evaluate a condition and return its verdict.
    ///
    /// `AND` and `OR` evaluate their right operand only when the left one does
    /// not decide the result, so errors inside a skipped operand never surface.
    pub fn evaluate(&self, expr: &Expression) -> ExpressionResult<bool> {
        match expr {
            Expression::Nested(inner) => self.evaluate(inner),

            Expression::Not(inner) => Ok(!self.evaluate(inner)?),

            Expression::BinaryOp {
                left,
                op: BinaryOperator::And,
                right,
            } => {
                if !self.evaluate(left)? {
                    return Ok(false);
                }
                self.evaluate(right)
            }

            Expression::BinaryOp {
                left,
                op: BinaryOperator::Or,
                right,
            } => {
                if self.evaluate(left)? {
                    return Ok(true);
                }
                self.evaluate(right)
            }

            Expression::BinaryOp { left, op, right } => {
                self.evaluate_comparison(expr, left, *op, right)
            }

            Expression::InList { expression, list } => self.evaluate_in_list(expression, list),

            Expression::Literal(_) | Expression::Column(_) => Ok(self.unclassified(expr)),
        }
    }

    /// Look up the column named by `operand`, which must be a plain identifier
    fn resolve_column(
        &self,
        operand: &Expression,
        context: &'static str,
    ) -> ExpressionResult<Option<&'a Value>> {
        match operand.as_column() {
            Some(name) => Ok(self.record.get(name)),
            None => Err(ExpressionError::MalformedExpression {
                context,
                found: operand.kind(),
                expression: operand.to_string(),
            }),
        }
    }

    /// Membership test; only literal items of the column's kind can match
    fn evaluate_in_list(&self, operand: &Expression, list: &[Expression]) -> ExpressionResult<bool> {
        let Some(value) = self.resolve_column(operand, "IN list")? else {
            return Ok(false);
        };

        Ok(list
            .iter()
            .any(|item| matches!(item, Expression::Literal(literal) if literal == value)))
    }

    fn evaluate_comparison(
        &self,
        expr: &Expression,
        left: &Expression,
        op: BinaryOperator,
        right: &Expression,
    ) -> ExpressionResult<bool> {
        let Some(value) = self.resolve_column(left, "comparison")? else {
            return Ok(false);
        };
        let Expression::Literal(literal) = right else {
            return Ok(self.unclassified(expr));
        };

        // Kind mismatch between column and literal never matches
        let data_type = value.data_type();
        if data_type != literal.data_type() {
            return Ok(false);
        }

        match (value, literal) {
            (Value::Integer(l), Value::Integer(r)) => compare_ordered(op, l, r, data_type),
            (Value::Float(l), Value::Float(r)) => compare_ordered(op, l, r, data_type),
            (Value::Text(l), Value::Text(r)) => match op {
                BinaryOperator::Like => Ok(like(l, r)),
                _ => compare_ordered(op, l.as_str(), r.as_str(), data_type),
            },
            (Value::Boolean(l), Value::Boolean(r)) => match op {
                BinaryOperator::Eq => Ok(l == r),
                BinaryOperator::NotEq => Ok(l != r),
                _ => Err(ExpressionError::UnsupportedOperator {
                    operator: op,
                    data_type,
                }),
            },
            _ => Ok(false),
        }
    }

    /// Nodes with no defined verdict let the record through.
    fn unclassified(&self, expr: &Expression) -> bool {
        trace!(
            "no verdict defined for {} `{}`, passing record through",
            expr.kind(),
            expr
        );
        true
    }
}

/// Equality and ordering for integers, floats and text
fn compare_ordered<T: PartialOrd + ?Sized>(
    op: BinaryOperator,
    left: &T,
    right: &T,
    data_type: DataType,
) -> ExpressionResult<bool> {
    match op {
        BinaryOperator::Eq => Ok(left == right),
        BinaryOperator::NotEq => Ok(left != right),
        BinaryOperator::Lt => Ok(left < right),
        BinaryOperator::LtEq => Ok(left <= right),
        BinaryOperator::Gt => Ok(left > right),
        BinaryOperator::GtEq => Ok(left >= right),
        BinaryOperator::Like | BinaryOperator::And | BinaryOperator::Or => {
            Err(ExpressionError::UnsupportedOperator {
                operator: op,
                data_type,
            })
        }
    }
}

/// Simplified `LIKE`: only a leading and/or trailing `%` is a wildcard.
fn like(text: &str, pattern: &str) -> bool {
    let leading = pattern.starts_with('%');
    let trailing = pattern.ends_with('%');
    let needle = pattern.trim_matches('%');

    match (leading, trailing) {
        (true, true) => text.contains(needle),
        (true, false) => text.ends_with(needle),
        (false, true) => text.starts_with(needle),
        (false, false) => text == pattern,
    }
}

/// Helper function to evaluate a condition against a record
pub fn evaluate_condition(record: &Record, expr: &Expression) -> ExpressionResult<bool> {
    ExpressionEvaluator::new(record).evaluate(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        Record::new()
            .with("a", 1)
            .with("b", 2)
            .with("c", "bar")
            .with("f", 1.5)
            .with("flag", true)
    }

    /// A comparison that always fails with `UnsupportedOperator`
    fn failing() -> Expression {
        Expression::compare("a", BinaryOperator::Like, 1)
    }

    fn eval(record: &Record, expr: &Expression) -> ExpressionResult<bool> {
        evaluate_condition(record, expr)
    }

    #[test]
    fn test_integer_comparisons() {
        let record = sample_record();
        let cases = [
            (BinaryOperator::Eq, 1, true),
            (BinaryOperator::Eq, 2, false),
            (BinaryOperator::NotEq, 1, false),
            (BinaryOperator::Lt, 1, false),
            (BinaryOperator::LtEq, 1, true),
            (BinaryOperator::Gt, 0, true),
            (BinaryOperator::GtEq, 2, false),
        ];
        for (op, literal, want) in cases {
            let expr = Expression::compare("a", op, literal);
            assert_eq!(eval(&record, &expr), Ok(want), "a {} {}", op, literal);
        }
    }

    #[test]
    fn test_float_comparisons() {
        let record = sample_record();
        assert_eq!(
            eval(&record, &Expression::compare("f", BinaryOperator::Eq, 1.5)),
            Ok(true)
        );
        assert_eq!(
            eval(&record, &Expression::compare("f", BinaryOperator::Gt, 1.25)),
            Ok(true)
        );
        assert_eq!(
            eval(&record, &Expression::compare("f", BinaryOperator::LtEq, 1.0)),
            Ok(false)
        );

        // No epsilon tolerance
        let record = Record::new().with("x", 0.1 + 0.2);
        assert_eq!(
            eval(&record, &Expression::compare("x", BinaryOperator::Eq, 0.3)),
            Ok(false)
        );

        // NaN is unordered and unequal to everything
        let record = Record::new().with("x", f64::NAN);
        assert_eq!(
            eval(&record, &Expression::compare("x", BinaryOperator::Eq, f64::NAN)),
            Ok(false)
        );
        assert_eq!(
            eval(&record, &Expression::compare("x", BinaryOperator::NotEq, f64::NAN)),
            Ok(true)
        );
        assert_eq!(
            eval(&record, &Expression::compare("x", BinaryOperator::GtEq, 0.0)),
            Ok(false)
        );
    }

    #[test]
    fn test_text_comparisons() {
        let record = sample_record();
        assert_eq!(
            eval(&record, &Expression::compare("c", BinaryOperator::Eq, "bar")),
            Ok(true)
        );
        assert_eq!(
            eval(&record, &Expression::compare("c", BinaryOperator::NotEq, "bar")),
            Ok(false)
        );
        assert_eq!(
            eval(&record, &Expression::compare("c", BinaryOperator::Lt, "baz")),
            Ok(true)
        );
        assert_eq!(
            eval(&record, &Expression::compare("c", BinaryOperator::Gt, "Bar")),
            Ok(true)
        );
    }

    #[test]
    fn test_boolean_comparisons() {
        let record = sample_record();
        assert_eq!(
            eval(&record, &Expression::compare("flag", BinaryOperator::Eq, true)),
            Ok(true)
        );
        assert_eq!(
            eval(&record, &Expression::compare("flag", BinaryOperator::NotEq, true)),
            Ok(false)
        );
    }

    #[test]
    fn test_unsupported_operators() {
        let record = sample_record();
        let cases = [
            ("a", BinaryOperator::Like, Value::Integer(1), DataType::Integer),
            ("f", BinaryOperator::Like, Value::Float(1.5), DataType::Float),
            ("flag", BinaryOperator::Lt, Value::Boolean(true), DataType::Boolean),
            ("flag", BinaryOperator::GtEq, Value::Boolean(false), DataType::Boolean),
            ("flag", BinaryOperator::Like, Value::Boolean(true), DataType::Boolean),
        ];
        for (column, op, literal, data_type) in cases {
            let expr = Expression::compare(column, op, literal);
            assert_eq!(
                eval(&record, &expr),
                Err(ExpressionError::UnsupportedOperator {
                    operator: op,
                    data_type,
                }),
                "{}",
                expr
            );
        }
    }

    #[test]
    fn test_like_patterns() {
        assert!(like("abcdef", "abc%"));
        assert!(like("abcdef", "%def"));
        assert!(like("abcdef", "%cd%"));
        assert!(!like("abcdef", "cd"));
        assert!(like("abcdef", "abcdef"));

        assert!(!like("abcdef", "def%"));
        assert!(!like("abcdef", "%abc"));
        assert!(!like("abcdef", "%xy%"));

        // Runs of % are stripped together
        assert!(like("abcdef", "%%cd%%"));
        assert!(like("abcdef", "%"));
        assert!(like("", "%"));

        // Inner wildcards are literal characters
        assert!(!like("abcdef", "a%f"));
        assert!(like("a%f", "a%f"));
        assert!(!like("abc", "a_c"));
    }

    #[test]
    fn test_missing_column_is_false() {
        let record = Record::new();
        assert_eq!(
            eval(&record, &Expression::compare("a", BinaryOperator::Eq, 1)),
            Ok(false)
        );
        // Even where the operator would be rejected for a present column
        assert_eq!(eval(&record, &failing()), Ok(false));
        assert_eq!(
            eval(&record, &Expression::in_list("a", [1, 2, 3])),
            Ok(false)
        );
    }

    #[test]
    fn test_kind_mismatch_is_false() {
        let record = sample_record();
        assert_eq!(
            eval(&record, &Expression::compare("c", BinaryOperator::Eq, 1)),
            Ok(false)
        );
        assert_eq!(
            eval(&record, &Expression::compare("a", BinaryOperator::Eq, 1.0)),
            Ok(false)
        );
        assert_eq!(
            eval(&record, &Expression::compare("a", BinaryOperator::Eq, "1")),
            Ok(false)
        );
        // Mismatch wins over an operator the column's kind would reject
        assert_eq!(
            eval(&record, &Expression::compare("a", BinaryOperator::Like, "1%")),
            Ok(false)
        );
        assert_eq!(
            eval(&record, &Expression::compare("flag", BinaryOperator::Lt, 1)),
            Ok(false)
        );
    }

    #[test]
    fn test_in_list() {
        let record = sample_record();
        assert_eq!(eval(&record, &Expression::in_list("a", [2, 3, 1])), Ok(true));
        assert_eq!(eval(&record, &Expression::in_list("b", [5, 6])), Ok(false));
        assert_eq!(
            eval(&record, &Expression::in_list("c", ["foo", "bar", "foobar"])),
            Ok(true)
        );
        assert_eq!(eval(&record, &Expression::in_list("f", [1.5])), Ok(true));
        assert_eq!(eval(&record, &Expression::in_list("flag", [true])), Ok(true));

        // No coercion across kinds
        assert_eq!(eval(&record, &Expression::in_list("a", ["1"])), Ok(false));
        assert_eq!(eval(&record, &Expression::in_list("a", [1.0])), Ok(false));

        // Empty list
        let empty: [i64; 0] = [];
        assert_eq!(eval(&record, &Expression::in_list("a", empty)), Ok(false));

        // Non-literal items never match
        let expr = Expression::InList {
            expression: Box::new(Expression::column("a")),
            list: vec![Expression::column("b"), Expression::literal(1)],
        };
        assert_eq!(eval(&record, &expr), Ok(true));
        let expr = Expression::InList {
            expression: Box::new(Expression::column("a")),
            list: vec![Expression::column("a")],
        };
        assert_eq!(eval(&record, &expr), Ok(false));
    }

    #[test]
    fn test_malformed_left_side() {
        let record = sample_record();

        let expr = Expression::binary_op(
            Expression::literal(1),
            BinaryOperator::Eq,
            Expression::column("a"),
        );
        assert_eq!(
            eval(&record, &expr),
            Err(ExpressionError::MalformedExpression {
                context: "comparison",
                found: "literal",
                expression: "1".to_string(),
            })
        );

        let expr = Expression::InList {
            expression: Box::new(Expression::nested(Expression::column("a"))),
            list: vec![Expression::literal(1)],
        };
        assert!(matches!(
            eval(&record, &expr),
            Err(ExpressionError::MalformedExpression {
                context: "IN list",
                found: "nested expression",
                ..
            })
        ));
    }

    #[test]
    fn test_logical_operations() {
        let record = sample_record();
        let a_is_1 = || Expression::compare("a", BinaryOperator::Eq, 1);
        let a_is_2 = || Expression::compare("a", BinaryOperator::Eq, 2);

        assert_eq!(eval(&record, &Expression::and(a_is_1(), a_is_1())), Ok(true));
        assert_eq!(eval(&record, &Expression::and(a_is_1(), a_is_2())), Ok(false));
        assert_eq!(eval(&record, &Expression::or(a_is_2(), a_is_1())), Ok(true));
        assert_eq!(eval(&record, &Expression::or(a_is_2(), a_is_2())), Ok(false));
        assert_eq!(eval(&record, &Expression::not_expr(a_is_2())), Ok(true));
        assert_eq!(
            eval(&record, &Expression::nested(Expression::nested(a_is_1()))),
            Ok(true)
        );
    }

    #[test]
    fn test_short_circuit_suppresses_errors() {
        let record = sample_record();
        let a_is_1 = Expression::compare("a", BinaryOperator::Eq, 1);
        let a_is_2 = Expression::compare("a", BinaryOperator::Eq, 2);

        assert_eq!(
            eval(&record, &Expression::and(a_is_2.clone(), failing())),
            Ok(false)
        );
        assert_eq!(
            eval(&record, &Expression::or(a_is_1.clone(), failing())),
            Ok(true)
        );

        // The right operand still runs when the left does not decide
        assert!(eval(&record, &Expression::and(a_is_1, failing())).is_err());
        assert!(eval(&record, &Expression::or(a_is_2, failing())).is_err());

        // Errors on the left always surface
        let expr = Expression::or(failing(), Expression::literal(true));
        assert!(eval(&record, &expr).is_err());
    }

    #[test]
    fn test_not_propagates_errors() {
        let record = sample_record();
        assert_eq!(
            eval(&record, &Expression::not_expr(failing())),
            eval(&record, &failing())
        );
    }

    #[test]
    fn test_unclassified_nodes_pass_through() {
        let record = sample_record();

        assert_eq!(eval(&record, &Expression::literal(false)), Ok(true));
        assert_eq!(eval(&record, &Expression::column("a")), Ok(true));
        assert_eq!(eval(&Record::new(), &Expression::column("a")), Ok(true));

        // Column compared against another column
        let expr = Expression::binary_op(
            Expression::column("a"),
            BinaryOperator::Eq,
            Expression::column("b"),
        );
        assert_eq!(eval(&record, &expr), Ok(true));

        // ...unless the left column is missing
        assert_eq!(eval(&Record::new(), &expr), Ok(false));
    }

    #[test]
    fn test_compound_expression() {
        // NOT (a = 2 AND b = 2) AND c IN ('foo', 'bar', 'foobar')
        let expr = Expression::and(
            Expression::not_expr(Expression::nested(Expression::and(
                Expression::compare("a", BinaryOperator::Eq, 2),
                Expression::compare("b", BinaryOperator::Eq, 2),
            ))),
            Expression::in_list("c", ["foo", "bar", "foobar"]),
        );
        assert_eq!(eval(&sample_record(), &expr), Ok(true));
    }
}

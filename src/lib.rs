//! Evaluate SQL `WHERE` conditions against loosely typed, in-memory records.
//!
//! ```
//! use sqlfilter::{Record, RowFilter};
//!
//! let filter = RowFilter::compile(
//!     "SELECT * FROM t WHERE NOT (a = 2 AND b = 2) AND c IN ('foo', 'bar', 'foobar')",
//! )
//! .unwrap();
//!
//! let record = Record::new().with("a", 1).with("b", 2).with("c", "bar");
//! assert_eq!(filter.matches(&record), Ok(true));
//! ```

pub mod expression;
pub mod filter;
pub mod record;
pub mod sql;
pub mod value;

pub use expression::{evaluate_condition, Expression, ExpressionError, ExpressionResult};
pub use filter::RowFilter;
pub use record::{Record, RecordError};
pub use value::{DataType, Value};

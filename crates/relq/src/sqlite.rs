//! SQLite-only operators.

use crate::dialect::SqlOperator;
use crate::operator::{Operator, Text, pattern_operator};

/// Case-sensitive Unix glob match (`GLOB`).
pub fn glob<T: Text>(pattern: impl Into<String>) -> Operator<T> {
    pattern_operator(SqlOperator::SqliteGlob, pattern.into())
}

//! PostgreSQL-only operators.

use crate::dialect::SqlOperator;
use crate::operator::{Operator, Text, pattern_operator, regex_operator};

/// Case-insensitive `LIKE`.
pub fn ilike<T: Text>(pattern: impl Into<String>) -> Operator<T> {
    pattern_operator(SqlOperator::PostgresILike, pattern.into())
}

/// SQL-standard regular expression match (`SIMILAR TO`).
pub fn similar_to<T: Text>(pattern: impl Into<String>) -> Operator<T> {
    pattern_operator(SqlOperator::PostgresSimilarTo, pattern.into())
}

/// POSIX regular expression match (`~`). The pattern must be a POSIX ERE, checked when built.
pub fn posix_match<T: Text>(pattern: impl Into<String>) -> Operator<T> {
    regex_operator(SqlOperator::PostgresPosixMatch, pattern.into())
}

/// Case-insensitive POSIX regular expression match (`~*`).
pub fn posix_imatch<T: Text>(pattern: impl Into<String>) -> Operator<T> {
    regex_operator(SqlOperator::PostgresPosixIMatch, pattern.into())
}

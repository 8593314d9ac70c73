//! MySQL-only operators and connectors.

use crate::condition::{WhereCondition, connection};
use crate::dialect::{Connector, SqlOperator};
use crate::model::Model;
use crate::operator::{Operator, Text, regex_operator};
use crate::value::IntoOperand;

/// Null-safe equality (`<=>`): `NULL <=> NULL` is true.
///
/// Accepts null values, unlike [`eq`](crate::operator::eq).
pub fn is_equal<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::value(SqlOperator::MySqlIsEqual, value.into_operand())
}

/// Regular expression match (`REGEXP`). The pattern must be a POSIX ERE, checked when built.
pub fn regexp<T: Text>(pattern: impl Into<String>) -> Operator<T> {
    regex_operator(SqlOperator::MySqlRegexp, pattern.into())
}

/// Exactly an odd number of `conditions` hold.
pub fn xor<M: Model>(conditions: impl IntoIterator<Item = WhereCondition<M>>) -> WhereCondition<M> {
    connection(Connector::Xor, conditions)
}

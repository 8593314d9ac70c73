//! SQL Server-only operators.

use crate::dialect::SqlOperator;
use crate::operator::Operator;
use crate::value::IntoOperand;

/// `!<`, not less than.
pub fn not_lt<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::cant_be_null(SqlOperator::SqlServerNotLt, value.into_operand())
}

/// `!>`, not greater than.
pub fn not_gt<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::cant_be_null(SqlOperator::SqlServerNotGt, value.into_operand())
}

/// `=` accepting a null value.
///
/// Only meaningful with `SET ANSI_NULLS OFF`, where `= NULL` compares like `IS NULL`.
pub fn eq_nullable<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::value(SqlOperator::Eq, value.into_operand())
}

/// `<>` accepting a null value. See [`eq_nullable`].
pub fn not_eq_nullable<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::value(SqlOperator::NotEq, value.into_operand())
}

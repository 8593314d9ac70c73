//! Operators comparing a column with a field of a different but related type.
//!
//! The typed operators only accept fields holding exactly the column's type. These
//! accept any field whose base type matches, so a `i32` column can be compared with
//! an `Option<i32>` field of another model:
//!
//! ```ignore
//! use relq::multitype;
//!
//! Product::INT.is(multitype::eq(Seller::RATING));   // Field<Seller, Option<i32>>
//! ```
//!
//! A mismatch (`String` against `i32`) is reported as
//! [`FieldTypeMismatch`](crate::CompileError::FieldTypeMismatch) when compiled.

use crate::dialect::{Connector, SqlOperator};
use crate::error::CompileError;
use crate::field::Field;
use crate::model::Model;
use crate::operator::Operator;
use crate::value::{BaseType, IntoOperand, Operand, Value};
use std::fmt;
use std::marker::PhantomData;

fn check<T: Value>(operator: SqlOperator, found: BaseType) -> Result<(), CompileError> {
    let expected = T::base_type();
    if expected == found {
        return Ok(());
    }
    Err(CompileError::FieldTypeMismatch {
        operator: operator.name(),
        expected: expected.name(),
        found: found.name(),
    })
}

fn field_operator<T, M, U>(operator: SqlOperator, field: Field<M, U>) -> Operator<T>
where
    T: Value,
    M: Model,
    U: Value,
{
    match check::<T>(operator, U::base_type()) {
        Ok(()) => Operator::value(operator, Operand::field(field.identifier())),
        Err(err) => Operator::invalid(err),
    }
}

pub fn eq<T: Value, M: Model, U: Value>(field: Field<M, U>) -> Operator<T> {
    field_operator(SqlOperator::Eq, field)
}

pub fn not_eq<T: Value, M: Model, U: Value>(field: Field<M, U>) -> Operator<T> {
    field_operator(SqlOperator::NotEq, field)
}

pub fn lt<T: Value, M: Model, U: Value>(field: Field<M, U>) -> Operator<T> {
    field_operator(SqlOperator::Lt, field)
}

pub fn lt_or_eq<T: Value, M: Model, U: Value>(field: Field<M, U>) -> Operator<T> {
    field_operator(SqlOperator::LtOrEq, field)
}

pub fn gt<T: Value, M: Model, U: Value>(field: Field<M, U>) -> Operator<T> {
    field_operator(SqlOperator::Gt, field)
}

pub fn gt_or_eq<T: Value, M: Model, U: Value>(field: Field<M, U>) -> Operator<T> {
    field_operator(SqlOperator::GtOrEq, field)
}

pub fn is_distinct<T: Value, M: Model, U: Value>(field: Field<M, U>) -> Operator<T> {
    field_operator(SqlOperator::IsDistinct, field)
}

pub fn is_not_distinct<T: Value, M: Model, U: Value>(field: Field<M, U>) -> Operator<T> {
    field_operator(SqlOperator::IsNotDistinct, field)
}

/// One operand of a multitype multivalue operator: a literal or a field.
pub struct MultiOperand<T> {
    operand: Operand,
    /// Base type of a field operand, checked against `T` when the operator is built.
    found: Option<BaseType>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Value> MultiOperand<T> {
    /// A literal (or a field of exactly type `T`).
    pub fn value(value: impl IntoOperand<T>) -> Self {
        Self {
            operand: value.into_operand(),
            found: None,
            _marker: PhantomData,
        }
    }

    /// A field of any type related to `T`.
    pub fn field<M: Model, U: Value>(field: Field<M, U>) -> Self {
        Self {
            operand: Operand::field(field.identifier()),
            found: Some(U::base_type()),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for MultiOperand<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.operand, f)
    }
}

fn multivalue<T: Value>(
    operator: SqlOperator,
    connector: Connector,
    prefix: &'static str,
    suffix: &'static str,
    operands: impl IntoIterator<Item = MultiOperand<T>>,
) -> Operator<T> {
    let mut collected = Vec::new();
    for operand in operands {
        if let Some(found) = operand.found
            && let Err(err) = check::<T>(operator, found)
        {
            return Operator::invalid(err);
        }
        collected.push(operand.operand);
    }
    Operator::multivalue(operator, connector, prefix, suffix, collected)
}

pub fn between<T: Value>(low: MultiOperand<T>, high: MultiOperand<T>) -> Operator<T> {
    multivalue(SqlOperator::Between, Connector::And, "", "", [low, high])
}

pub fn not_between<T: Value>(low: MultiOperand<T>, high: MultiOperand<T>) -> Operator<T> {
    multivalue(SqlOperator::NotBetween, Connector::And, "", "", [low, high])
}

pub fn array_in<T: Value>(values: impl IntoIterator<Item = MultiOperand<T>>) -> Operator<T> {
    multivalue(SqlOperator::ArrayIn, Connector::Comma, "(", ")", values)
}

pub fn array_not_in<T: Value>(values: impl IntoIterator<Item = MultiOperand<T>>) -> Operator<T> {
    multivalue(SqlOperator::ArrayNotIn, Connector::Comma, "(", ")", values)
}

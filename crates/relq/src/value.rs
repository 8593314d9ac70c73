//! Literal values, bound parameters and operands.

use crate::field::{Field, FieldIdentifier};
use crate::model::Model;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// The comparable type of a value, with `Option<T>` collapsed to `T`.
#[derive(Clone, Copy)]
pub struct BaseType {
    id: TypeId,
    name: &'static str,
}

impl BaseType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for BaseType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BaseType {}

impl fmt::Debug for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A literal that can be bound as a query parameter.
pub trait Value: ToSql + fmt::Debug + Send + Sync + 'static {
    /// Whether this value maps to SQL `NULL`.
    ///
    /// Wrapper types that encode null themselves (a "valid" flag, a sentinel) should
    /// override this so null-forbidding operators can reject them.
    fn is_null(&self) -> bool {
        false
    }

    /// The type this value is compared as.
    fn base_type() -> BaseType
    where
        Self: Sized,
    {
        BaseType::of::<Self>()
    }
}

macro_rules! impl_value {
    ($($ty:ty),* $(,)?) => {
        $(impl Value for $ty {})*
    };
}

impl_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u32,
    f32,
    f64,
    String,
    &'static str,
    Vec<u8>,
    uuid::Uuid,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
    chrono::DateTime<chrono::FixedOffset>,
    serde_json::Value,
);

impl<T: Value> Value for Option<T> {
    fn is_null(&self) -> bool {
        self.as_ref().is_none_or(Value::is_null)
    }

    fn base_type() -> BaseType {
        T::base_type()
    }
}

/// A bound parameter value.
#[derive(Clone)]
pub struct Param {
    value: Arc<dyn ToSql + Send + Sync>,
    type_name: &'static str,
    null: bool,
}

impl Param {
    pub fn new<V: Value>(value: V) -> Self {
        let null = value.is_null();
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<V>(),
            null,
        }
    }

    /// Borrow as a `ToSql` trait object for execution.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.value
    }

    /// Rust type name of the bound value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the value maps to SQL `NULL`.
    pub fn is_null(&self) -> bool {
        self.null
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.value, f)
    }
}

/// The right-hand side of a comparison: a bound literal or another column.
#[derive(Debug, Clone)]
pub enum Operand {
    Literal(Param),
    Field {
        field: FieldIdentifier,
        /// Which occurrence of the field's model to use when it is joined more than once.
        join: Option<usize>,
    },
}

impl Operand {
    pub fn field(field: FieldIdentifier) -> Self {
        Operand::Field { field, join: None }
    }

    pub(crate) fn is_null_literal(&self) -> bool {
        matches!(self, Operand::Literal(param) if param.is_null())
    }
}

/// Conversion into an [`Operand`] compared against values of type `T`.
pub trait IntoOperand<T> {
    fn into_operand(self) -> Operand;
}

impl<T: Value> IntoOperand<T> for T {
    fn into_operand(self) -> Operand {
        Operand::Literal(Param::new(self))
    }
}

impl IntoOperand<String> for &str {
    fn into_operand(self) -> Operand {
        Operand::Literal(Param::new(self.to_owned()))
    }
}

impl<T: Value> IntoOperand<Option<T>> for T {
    fn into_operand(self) -> Operand {
        Operand::Literal(Param::new(Some(self)))
    }
}

impl<M: Model, T> IntoOperand<T> for Field<M, T> {
    fn into_operand(self) -> Operand {
        Operand::field(self.identifier())
    }
}

//! Typed handles for model fields and relations.

use crate::condition::{Condition, IntoCondition, Node, WhereCondition, WhereNode};
use crate::model::{Model, ModelType};
use crate::naming::NamingStrategy;
use crate::operator::Operator;
use crate::table::Table;
use std::fmt;
use std::marker::PhantomData;

/// Identifies one column of one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIdentifier {
    model: ModelType,
    field: &'static str,
    column: Option<&'static str>,
    prefix: Option<&'static str>,
}

impl FieldIdentifier {
    pub fn new(model: ModelType, field: &'static str) -> Self {
        Self {
            model,
            field,
            column: None,
            prefix: None,
        }
    }

    /// Use an explicit column name instead of the naming strategy.
    pub fn with_column(mut self, column: Option<&'static str>) -> Self {
        self.column = column;
        self
    }

    /// Prefix prepended to the column name (embedded sub-structures).
    pub fn with_prefix(mut self, prefix: Option<&'static str>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn model(&self) -> ModelType {
        self.model
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Physical column name: prefix, then the override or the naming-derived name.
    pub fn column_name(&self, naming: &dyn NamingStrategy, table: &Table) -> String {
        let column = match self.column {
            Some(column) => column.to_string(),
            None => naming.column_name(&table.name, self.field),
        };
        match self.prefix {
            Some(prefix) => format!("{prefix}{column}"),
            None => column,
        }
    }

    /// `alias.column` for the table the field is bound to.
    pub fn column_sql(&self, naming: &dyn NamingStrategy, table: &Table) -> String {
        format!("{}.{}", table.alias, self.column_name(naming, table))
    }
}

/// A typed field of model `M` holding values of type `T`.
///
/// `#[derive(Model)]` generates one associated constant per field:
///
/// ```ignore
/// let cond = Product::INT.is(eq(1));
/// ```
pub struct Field<M, T> {
    name: &'static str,
    column: Option<&'static str>,
    prefix: Option<&'static str>,
    _marker: PhantomData<fn() -> (M, T)>,
}

impl<M, T> Field<M, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column: None,
            prefix: None,
            _marker: PhantomData,
        }
    }

    /// Map to an explicit column name.
    pub const fn column(self, column: &'static str) -> Self {
        Self {
            column: Some(column),
            ..self
        }
    }

    /// Prefix the column (fields of an embedded sub-structure).
    pub const fn prefixed(self, prefix: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
            ..self
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<M: Model, T> Field<M, T> {
    pub fn identifier(&self) -> FieldIdentifier {
        FieldIdentifier::new(ModelType::of::<M>(), self.name)
            .with_column(self.column)
            .with_prefix(self.prefix)
    }

    /// Compare this field with `operator`.
    pub fn is(self, operator: Operator<T>) -> WhereCondition<M> {
        WhereCondition::from_node(WhereNode::Field {
            field: self.identifier(),
            operator: operator.into_kind(),
        })
    }
}

impl<M, T> Clone for Field<M, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, T> Copy for Field<M, T> {}

impl<M, T> fmt::Debug for Field<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// A typed relation from model `M` to model `T`.
pub struct Relation<M, T> {
    name: &'static str,
    _marker: PhantomData<fn() -> (M, T)>,
}

impl<M, T> Relation<M, T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<M: Model, T: Model> Relation<M, T> {
    /// Join the related model, filtering it with `conditions`.
    pub fn join<C>(self, conditions: impl IntoIterator<Item = C>) -> Condition<M>
    where
        C: IntoCondition<T>,
    {
        Condition::from_node(Node::join(
            self.name,
            ModelType::of::<T>(),
            conditions
                .into_iter()
                .map(|c| c.into_condition().into_node())
                .collect(),
        ))
    }

    /// Join the related model and select its columns.
    pub fn preload(self) -> Condition<M> {
        self.join([Condition::<T>::preload()])
    }
}

impl<M, T> Clone for Relation<M, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M, T> Copy for Relation<M, T> {}

impl<M, T> fmt::Debug for Relation<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Relation").field(&self.name).finish()
    }
}

//! Model descriptors.
//!
//! A model is a Rust type mapped to one table. Its shape (fields, relations, table
//! override) is described statically by a [`ModelDescriptor`], usually generated by
//! `#[derive(Model)]`, and resolved once by the [`ModelRegistry`](crate::ModelRegistry).

use crate::field::FieldIdentifier;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of the field that marks a model as soft-deletable.
pub const DELETED_AT: &str = "deleted_at";

/// A type mapped to a database table.
pub trait Model: 'static {
    /// Static description of the model's shape.
    fn descriptor() -> &'static ModelDescriptor;
}

/// Static description of a model.
#[derive(Debug)]
pub struct ModelDescriptor {
    /// Rust type name, e.g. `Product`.
    pub name: &'static str,
    /// Explicit table name; the naming strategy decides when `None`.
    pub table: Option<&'static str>,
    pub fields: &'static [FieldDescriptor],
    pub relations: &'static [RelationDescriptor],
}

impl ModelDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// Whether rows of this model are soft-deleted through a `deleted_at` column.
    pub fn is_soft_delete(&self) -> bool {
        self.field(DELETED_AT).is_some()
    }
}

/// One column-backed field of a model.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Explicit column name; the naming strategy decides when `None`.
    pub column: Option<&'static str>,
    /// Prefix of the column (fields of an embedded sub-structure).
    pub prefix: Option<&'static str>,
    /// Whether the field holds a `uuid::Uuid` (or `Option<Uuid>`).
    pub uuid: bool,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column: None,
            prefix: None,
            uuid: false,
        }
    }

    pub const fn column(self, column: &'static str) -> Self {
        Self {
            column: Some(column),
            ..self
        }
    }

    pub const fn prefixed(self, prefix: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
            ..self
        }
    }

    pub const fn holds_uuid(self) -> Self {
        Self { uuid: true, ..self }
    }

    /// Identifier of this field on `model`, carrying its column override and prefix.
    pub fn identifier(&self, model: ModelType) -> FieldIdentifier {
        FieldIdentifier::new(model, self.name)
            .with_column(self.column)
            .with_prefix(self.prefix)
    }
}

/// Which side of a relation holds the foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// The container holds the foreign key (`sales.product_id`).
    BelongsTo,
    /// The related model holds the foreign key, at most one related row.
    HasOne,
    /// The related model holds the foreign key, any number of related rows.
    HasMany,
}

/// A relation declared on a model.
#[derive(Debug, Clone, Copy)]
pub struct RelationDescriptor {
    /// Relation name, used in aliases (`sales__product`).
    pub name: &'static str,
    pub target: fn() -> ModelType,
    /// Foreign key direction; inferred from the fields of both sides when `None`.
    pub kind: Option<RelationKind>,
    /// Foreign key field; defaults to `<relation>_id` or `<container>_id`.
    pub foreign_key: Option<&'static str>,
    /// Field referenced by the foreign key; defaults to `id`.
    pub references: Option<&'static str>,
}

/// Runtime handle of a model type.
#[derive(Clone, Copy)]
pub struct ModelType {
    id: TypeId,
    descriptor: &'static ModelDescriptor,
}

impl ModelType {
    pub fn of<M: Model>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            descriptor: M::descriptor(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn descriptor(&self) -> &'static ModelDescriptor {
        self.descriptor
    }
}

impl PartialEq for ModelType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModelType {}

impl Hash for ModelType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor.name)
    }
}

/// Registration submitted by `#[derive(Model)]` and collected with `inventory`.
pub struct ModelRegistration {
    pub model_type: fn() -> ModelType,
}

inventory::collect!(ModelRegistration);

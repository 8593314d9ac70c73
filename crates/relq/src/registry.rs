//! Model registry.
//!
//! The registry is filled once at start-up, then frozen: table names and relation
//! foreign keys are resolved in [`RegistryBuilder::build`] so that compiling a query
//! never inspects model shapes again. A built [`ModelRegistry`] is immutable and can
//! be shared by reference between threads compiling queries concurrently.

use crate::error::{CompileError, CompileResult, RegistryError};
use crate::model::{
    FieldDescriptor, Model, ModelDescriptor, ModelRegistration, ModelType, RelationDescriptor,
    RelationKind,
};
use crate::naming::{NamingStrategy, SnakeCaseNaming};
use heck::ToSnakeCase;
use std::collections::HashMap;
use std::sync::Arc;

const ID: &str = "id";

/// A relation with its foreign key direction resolved.
#[derive(Debug, Clone)]
pub struct ResolvedRelation {
    pub name: &'static str,
    pub target: ModelType,
    pub kind: RelationKind,
    /// Column of the container compared in the join (`product_id` or `id`).
    pub local_column: String,
    /// Column of the related table compared in the join (`id` or `country_id`).
    pub remote_column: String,
}

#[derive(Debug)]
struct Entry {
    table: String,
    relations: Vec<ResolvedRelation>,
}

/// Builds a [`ModelRegistry`].
#[derive(Debug)]
pub struct RegistryBuilder {
    naming: Arc<dyn NamingStrategy>,
    models: Vec<ModelType>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            naming: Arc::new(SnakeCaseNaming),
            models: Vec::new(),
        }
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the naming strategy (default: [`SnakeCaseNaming`]).
    pub fn naming(mut self, naming: impl NamingStrategy + 'static) -> Self {
        self.naming = Arc::new(naming);
        self
    }

    /// Register a model. Registering the same model twice has no effect.
    pub fn register<M: Model>(self) -> Self {
        self.register_type(ModelType::of::<M>())
    }

    pub fn register_type(mut self, model: ModelType) -> Self {
        if !self.models.contains(&model) {
            self.models.push(model);
        }
        self
    }

    /// Register every model submitted by `#[derive(Model)]` in this binary.
    pub fn from_inventory(mut self) -> Self {
        for registration in inventory::iter::<ModelRegistration> {
            self = self.register_type((registration.model_type)());
        }
        self
    }

    /// Resolve table names and relations.
    pub fn build(self) -> Result<ModelRegistry, RegistryError> {
        let naming = self.naming;

        let tables: HashMap<ModelType, String> = self
            .models
            .iter()
            .map(|model| (*model, table_name(naming.as_ref(), model.descriptor())))
            .collect();

        let mut models = HashMap::with_capacity(self.models.len());
        for model in &self.models {
            let descriptor = model.descriptor();
            let table = tables[model].clone();

            #[cfg(feature = "tracing")]
            tracing::debug!(target: "relq.registry", model = descriptor.name, table = %table, "registered model");

            let relations = descriptor
                .relations
                .iter()
                .map(|relation| resolve_relation(naming.as_ref(), &tables, *model, relation))
                .collect::<Result<Vec<_>, _>>()?;

            models.insert(*model, Entry { table, relations });
        }

        Ok(ModelRegistry { naming, models })
    }
}

/// Registered models with their resolved tables and relations.
#[derive(Debug)]
pub struct ModelRegistry {
    naming: Arc<dyn NamingStrategy>,
    models: HashMap<ModelType, Entry>,
}

impl ModelRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn naming(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }

    pub fn contains(&self, model: ModelType) -> bool {
        self.models.contains_key(&model)
    }

    /// Physical table name of `model`.
    pub fn table_name(&self, model: ModelType) -> CompileResult<&str> {
        self.models
            .get(&model)
            .map(|entry| entry.table.as_str())
            .ok_or(CompileError::TableResolution {
                model: model.name(),
            })
    }

    /// Resolved relation `name` declared on `model`.
    pub fn relation(&self, model: ModelType, name: &str) -> CompileResult<&ResolvedRelation> {
        let entry = self
            .models
            .get(&model)
            .ok_or(CompileError::TableResolution {
                model: model.name(),
            })?;
        entry
            .relations
            .iter()
            .find(|relation| relation.name == name)
            .ok_or_else(|| CompileError::RelationNotFound {
                model: model.name(),
                relation: name.to_string(),
            })
    }

    /// Column name of a declared field.
    pub(crate) fn column_of(&self, table: &str, field: &FieldDescriptor) -> String {
        column_name(self.naming.as_ref(), table, field)
    }
}

fn table_name(naming: &dyn NamingStrategy, descriptor: &ModelDescriptor) -> String {
    match descriptor.table {
        Some(table) => table.to_string(),
        None => naming.table_name(descriptor.name),
    }
}

fn column_name(naming: &dyn NamingStrategy, table: &str, field: &FieldDescriptor) -> String {
    let column = match field.column {
        Some(column) => column.to_string(),
        None => naming.column_name(table, field.name),
    };
    match field.prefix {
        Some(prefix) => format!("{prefix}{column}"),
        None => column,
    }
}

fn resolve_relation(
    naming: &dyn NamingStrategy,
    tables: &HashMap<ModelType, String>,
    container: ModelType,
    relation: &RelationDescriptor,
) -> Result<ResolvedRelation, RegistryError> {
    let target = (relation.target)();
    let container_desc = container.descriptor();
    let target_desc = target.descriptor();

    let Some(target_table) = tables.get(&target) else {
        return Err(RegistryError::UnknownTarget {
            model: container_desc.name,
            relation: relation.name,
            target: target_desc.name,
        });
    };
    let container_table = &tables[&container];

    let belongs_to_fk = relation
        .foreign_key
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}_id", relation.name));
    let has_fk = relation
        .foreign_key
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}_id", container_desc.name.to_snake_case()));

    let kind = match relation.kind {
        Some(kind) => kind,
        None if container_desc.field(&belongs_to_fk).is_some() => RelationKind::BelongsTo,
        None if target_desc.field(&has_fk).is_some() => RelationKind::HasOne,
        None => {
            return Err(RegistryError::ForeignKeyNotFound {
                model: container_desc.name,
                relation: relation.name,
                candidates: format!(
                    "{}.{belongs_to_fk}, {}.{has_fk}",
                    container_desc.name, target_desc.name
                ),
            });
        }
    };

    // The side holding the foreign key, and the side holding the referenced field.
    let (fk_desc, fk_name, ref_desc) = match kind {
        RelationKind::BelongsTo => (container_desc, belongs_to_fk, target_desc),
        RelationKind::HasOne | RelationKind::HasMany => (target_desc, has_fk, container_desc),
    };
    let references = relation.references.unwrap_or(ID);

    let fk_field = fk_desc
        .field(&fk_name)
        .ok_or_else(|| RegistryError::ForeignKeyNotFound {
            model: container_desc.name,
            relation: relation.name,
            candidates: format!("{}.{fk_name}", fk_desc.name),
        })?;
    let ref_field = ref_desc
        .field(references)
        .ok_or(RegistryError::UnknownReference {
            model: container_desc.name,
            relation: relation.name,
            field: references,
        })?;

    let (local_column, remote_column) = match kind {
        RelationKind::BelongsTo => (
            column_name(naming, container_table, fk_field),
            column_name(naming, target_table, ref_field),
        ),
        RelationKind::HasOne | RelationKind::HasMany => (
            column_name(naming, container_table, ref_field),
            column_name(naming, target_table, fk_field),
        ),
    };

    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "relq.registry",
        model = container_desc.name,
        relation = relation.name,
        ?kind,
        local = %local_column,
        remote = %remote_column,
        "resolved relation"
    );

    Ok(ResolvedRelation {
        name: relation.name,
        target,
        kind,
        local_column,
        remote_column,
    })
}

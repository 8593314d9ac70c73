//! Table alias bindings.

use crate::error::CompileResult;
use crate::model::ModelType;
use crate::registry::ModelRegistry;

/// One occurrence of a table in a query.
///
/// The root table's alias is its physical name; each joined table's alias is the
/// parent alias and the relation name joined by `__`, so every join path gets its
/// own alias however deep it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Physical table name.
    pub name: String,
    pub alias: String,
    pub initial: bool,
    model: ModelType,
}

impl Table {
    pub(crate) fn root(registry: &ModelRegistry, model: ModelType) -> CompileResult<Self> {
        let name = registry.table_name(model)?.to_string();
        Ok(Self {
            alias: name.clone(),
            name,
            initial: true,
            model,
        })
    }

    /// The table reached from `self` through `relation`, holding rows of `model`.
    pub fn derive_table(
        &self,
        registry: &ModelRegistry,
        model: ModelType,
        relation: &str,
    ) -> CompileResult<Table> {
        Ok(Table {
            name: registry.table_name(model)?.to_string(),
            alias: format!("{}__{}", self.alias, relation),
            initial: false,
            model,
        })
    }

    /// Model whose rows this table holds.
    pub fn model(&self) -> ModelType {
        self.model
    }
}

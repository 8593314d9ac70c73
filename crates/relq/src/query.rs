//! Compilation context and compiled queries.

use crate::client::GenericClient;
use crate::dialect::Dialect;
use crate::error::{CompileError, CompileResult, OrmResult};
use crate::field::FieldIdentifier;
use crate::fragment::Fragment;
use crate::model::ModelType;
use crate::naming::NamingStrategy;
use crate::registry::ModelRegistry;
use crate::row::FromRow;
use crate::table::Table;
use crate::value::Param;
use std::collections::{HashMap, HashSet};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// State of one compilation.
///
/// Created fresh for every call to [`Compiler::compile`](crate::Compiler::compile) and
/// dropped when it returns; it is never shared between compilations.
pub(crate) struct Query<'r> {
    registry: &'r ModelRegistry,
    dialect: Dialect,
    /// Every table of each model present in the query, in tree order.
    concerned: HashMap<ModelType, Vec<Table>>,
    aliases: HashSet<String>,
    /// Aliases a field operand may reference while join clauses are rendered.
    /// `None` outside of joins: every concerned table is visible.
    emitted: Option<HashSet<String>>,
    selects: Vec<String>,
    joins: Vec<Fragment>,
}

impl<'r> Query<'r> {
    pub(crate) fn new(registry: &'r ModelRegistry, dialect: Dialect) -> Self {
        Self {
            registry,
            dialect,
            concerned: HashMap::new(),
            aliases: HashSet::new(),
            emitted: None,
            selects: Vec::new(),
            joins: Vec::new(),
        }
    }

    pub(crate) fn registry(&self) -> &'r ModelRegistry {
        self.registry
    }

    pub(crate) fn naming(&self) -> &'r dyn NamingStrategy {
        self.registry.naming()
    }

    pub(crate) fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Record `table` as an occurrence of its model.
    pub(crate) fn add_concerned(&mut self, table: Table) -> CompileResult<()> {
        if !self.aliases.insert(table.alias.clone()) {
            return Err(CompileError::DuplicateJoin { alias: table.alias });
        }
        self.concerned.entry(table.model()).or_default().push(table);
        Ok(())
    }

    /// Restrict field operands to tables already emitted, until [`Query::finish_joins`].
    pub(crate) fn start_joins(&mut self) {
        self.emitted = Some(HashSet::new());
    }

    /// Make `table` visible to the join clauses rendered after it.
    pub(crate) fn mark_emitted(&mut self, table: &Table) {
        if let Some(emitted) = &mut self.emitted {
            emitted.insert(table.alias.clone());
        }
    }

    /// Every concerned table is visible again (the root `WHERE`).
    pub(crate) fn finish_joins(&mut self) {
        self.emitted = None;
    }

    fn is_visible(&self, table: &Table) -> bool {
        self.emitted
            .as_ref()
            .is_none_or(|emitted| emitted.contains(&table.alias))
    }

    /// The table a field operand refers to.
    ///
    /// A model present once resolves to that table. A model joined several times
    /// needs `join`, an index into its occurrences in tree order. While join clauses
    /// are rendered only tables emitted so far count: a join cannot reference a
    /// table that comes after it in the statement.
    pub(crate) fn field_table(
        &self,
        field: &FieldIdentifier,
        join: Option<usize>,
        operator: &'static str,
    ) -> CompileResult<&Table> {
        let model = field.model();
        let not_concerned = CompileError::FieldNotConcerned {
            model: model.name(),
            operator,
        };
        let tables = match self.concerned.get(&model) {
            Some(tables) if !tables.is_empty() => tables,
            _ => return Err(not_concerned),
        };
        let visible: Vec<&Table> = tables.iter().filter(|t| self.is_visible(t)).collect();

        match (join, visible.as_slice()) {
            (Some(index), _) if index >= tables.len() => Err(CompileError::JoinNotFound {
                model: model.name(),
                operator,
                index,
                joins: tables.len(),
            }),
            (Some(index), _) => match &tables[index] {
                table if self.is_visible(table) => Ok(table),
                _ => Err(not_concerned),
            },
            (None, []) => Err(not_concerned),
            (None, [table]) => Ok(table),
            (None, _) => Err(CompileError::JoinMustBeSelected {
                model: model.name(),
                operator,
                joins: visible.len(),
            }),
        }
    }

    pub(crate) fn push_select(&mut self, select: String) {
        self.selects.push(select);
    }

    pub(crate) fn push_join(&mut self, join: Fragment) {
        self.joins.push(join);
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Fragment>) {
        (self.selects, self.joins)
    }
}

/// A compiled statement: SQL text and its parameters in placeholder order.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    fragment: Fragment,
    model: &'static str,
    dialect: Dialect,
    joins: usize,
}

impl CompiledQuery {
    pub(crate) fn new(fragment: Fragment, model: &'static str, dialect: Dialect, joins: usize) -> Self {
        Self {
            fragment,
            model,
            dialect,
            joins,
        }
    }

    /// SQL with `?` placeholders.
    pub fn sql(&self) -> String {
        self.fragment.sql()
    }

    /// SQL with the placeholders native to `dialect` (`$1`, `@p1` or `?`).
    pub fn sql_for(&self, dialect: Dialect) -> String {
        self.fragment.render(dialect)
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> &[Param] {
        self.fragment.params()
    }

    pub fn into_params(self) -> Vec<Param> {
        self.fragment.into_params()
    }

    /// Name of the root model.
    pub fn model(&self) -> &'static str {
        self.model
    }

    /// Dialect the operators were rendered for.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Number of joins in the statement.
    pub fn join_count(&self) -> usize {
        self.joins
    }

    /// Execute on a Postgres client and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> OrmResult<Vec<Row>> {
        let sql = self.sql_for(Dialect::Postgres);
        let params: Vec<&(dyn ToSql + Sync)> = self.params().iter().map(Param::as_sql).collect();
        conn.query_tagged(self.model, &sql, &params).await
    }

    /// Execute on a Postgres client and return all rows mapped to type T
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> OrmResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }
}

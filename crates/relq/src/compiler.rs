//! Compiles condition trees into a single `SELECT` statement.

use crate::client::GenericClient;
use crate::condition::{IntoCondition, Node, WhereNode, where_sql};
use crate::dialect::{Dialect, SqlOperator};
use crate::error::{CompileResult, OrmResult};
use crate::fragment::Fragment;
use crate::model::{DELETED_AT, Model, ModelType};
use crate::operator::OperatorKind;
use crate::query::{CompiledQuery, Query};
use crate::registry::ModelRegistry;
use crate::row::FromRow;
use crate::table::Table;

/// Settings of a [`Compiler`].
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Dialect operators are rendered for.
    pub dialect: Dialect,
    /// Also exclude soft-deleted rows of the root table.
    pub scope_root_soft_delete: bool,
    /// Truncate SQL in debug events (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgres,
            scope_root_soft_delete: false,
            max_sql_length: Some(200),
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Add `root.deleted_at IS NULL` when the root model is soft-deletable and no
    /// root condition already constrains `deleted_at`.
    ///
    /// Joined tables are always scoped; the root only when this is enabled.
    pub fn scope_root_soft_delete(mut self, enabled: bool) -> Self {
        self.scope_root_soft_delete = enabled;
        self
    }

    /// Set maximum SQL length shown in debug events.
    pub fn max_sql_length(mut self, len: Option<usize>) -> Self {
        self.max_sql_length = len;
        self
    }
}

/// Compiles conditions against a [`ModelRegistry`].
///
/// A compiler holds no per-query state and can be shared between threads.
///
/// ```ignore
/// let compiler = Compiler::new(&registry).with_config(CompilerConfig::new().dialect(Dialect::MySql));
/// let query = compiler.compile([Product::INT.is(eq(1))])?;
/// assert_eq!(query.sql(), "SELECT products.* FROM products WHERE products.int = ?");
/// ```
#[derive(Debug, Clone)]
pub struct Compiler<'r> {
    registry: &'r ModelRegistry,
    config: CompilerConfig,
}

impl<'r> Compiler<'r> {
    pub fn new(registry: &'r ModelRegistry) -> Self {
        Self {
            registry,
            config: CompilerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn registry(&self) -> &'r ModelRegistry {
        self.registry
    }

    /// Compile `conditions` on root model `M` into
    /// `SELECT <root>.* FROM <root> <joins> WHERE <filters>`.
    pub fn compile<M, C>(&self, conditions: impl IntoIterator<Item = C>) -> CompileResult<CompiledQuery>
    where
        M: Model,
        C: IntoCondition<M>,
    {
        let nodes: Vec<Node> = conditions
            .into_iter()
            .map(|c| c.into_condition().into_node())
            .collect();
        self.compile_nodes(ModelType::of::<M>(), &nodes)
    }

    fn compile_nodes(&self, model: ModelType, nodes: &[Node]) -> CompileResult<CompiledQuery> {
        let dialect = self.config.dialect;
        let root = Table::root(self.registry, model)?;
        let mut query = Query::new(self.registry, dialect);
        query.add_concerned(root.clone())?;

        // Every table is known before any operand is resolved, so join indexes
        // count all occurrences. ON clauses only see the tables emitted before them.
        for node in nodes {
            if let Node::Join(join) = node {
                join.plan(&mut query, &root)?;
            }
        }

        query.start_joins();
        query.mark_emitted(&root);
        for node in nodes {
            if let Node::Join(join) = node {
                join.compile(&mut query, &root)?;
            }
        }
        query.finish_joins();

        let mut wheres: Vec<WhereNode> = nodes
            .iter()
            .filter_map(|node| match node {
                Node::Where(node) => Some(node.clone()),
                _ => None,
            })
            .collect();
        if let Some(scope) = self.root_scope(model, &wheres) {
            wheres.push(scope);
        }
        let filter = where_sql(&query, &root, &wheres, " AND ", wheres.len() > 1)?;

        let (selects, joins) = query.into_parts();
        let join_count = joins.len();

        let mut sql = Fragment::new(format!("SELECT {}.*", root.alias));
        for select in &selects {
            sql.push(", ").push(select);
        }
        sql.push(" FROM ").push(&root.name);
        for join in joins {
            sql.push(" ").push_fragment(join);
        }
        if !wheres.is_empty() {
            sql.push(" WHERE ").push_fragment(filter);
        }

        let compiled = CompiledQuery::new(sql, model.name(), dialect, join_count);

        #[cfg(feature = "tracing")]
        {
            let text = compiled.sql_for(dialect);
            tracing::debug!(
                target: "relq.sql",
                model = model.name(),
                dialect = %dialect,
                params = compiled.params().len(),
                joins = join_count,
                sql = %self.truncate_sql(&text),
                "compiled query"
            );
        }

        Ok(compiled)
    }

    fn root_scope(&self, model: ModelType, wheres: &[WhereNode]) -> Option<WhereNode> {
        if !self.config.scope_root_soft_delete {
            return None;
        }
        let field = model.descriptor().field(DELETED_AT)?;
        if wheres.iter().any(|node| node.touches(DELETED_AT)) {
            return None;
        }
        Some(WhereNode::Field {
            field: field.identifier(model),
            operator: OperatorKind::Predicate(SqlOperator::IsNull),
        })
    }

    #[cfg(feature = "tracing")]
    fn truncate_sql(&self, sql: &str) -> String {
        match self.config.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while end > 0 && !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end])
            }
            _ => sql.to_string(),
        }
    }
}

impl ModelRegistry {
    /// A compiler with the default configuration (Postgres).
    pub fn compiler(&self) -> Compiler<'_> {
        Compiler::new(self)
    }

    /// Compile with the default configuration.
    pub fn compile<M, C>(&self, conditions: impl IntoIterator<Item = C>) -> CompileResult<CompiledQuery>
    where
        M: Model,
        C: IntoCondition<M>,
    {
        self.compiler().compile(conditions)
    }

    /// Compile for Postgres, execute, and decode every row as `M`.
    pub async fn find<M, C>(
        &self,
        conn: &impl GenericClient,
        conditions: impl IntoIterator<Item = C>,
    ) -> OrmResult<Vec<M>>
    where
        M: Model + FromRow,
        C: IntoCondition<M>,
    {
        let query = self.compile::<M, C>(conditions)?;
        query.fetch_all_as(conn).await
    }
}

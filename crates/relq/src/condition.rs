//! Conditions: same-model filters and relation joins.
//!
//! A [`WhereCondition<M>`] filters rows of `M` and can be grouped with [`and`], [`or`],
//! [`not`] (and [`mysql::xor`](crate::mysql::xor)). A [`Condition<M>`] is either a where
//! condition, a join into a related model (built with [`Relation::join`]), or a preload
//! marker. Joins nest: the conditions of a join are compiled against the joined table.
//!
//! ```ignore
//! use relq::prelude::*;
//!
//! let conditions = [
//!     Condition::from(Sale::CODE.is(eq(1))),
//!     Sale::PRODUCT.join([or([
//!         Product::INT.is(eq(1)),
//!         Product::STRING.is(like("a%")),
//!     ])]),
//! ];
//! ```
//!
//! [`Relation::join`]: crate::Relation::join

use crate::dialect::Connector;
use crate::error::{CompileError, CompileResult};
use crate::field::FieldIdentifier;
use crate::fragment::Fragment;
use crate::model::{DELETED_AT, Model, ModelType};
use crate::operator::OperatorKind;
use crate::query::Query;
use crate::table::Table;
use crate::value::Param;
use std::fmt;
use std::marker::PhantomData;

/// Type-erased filter on the rows of one table.
#[derive(Debug, Clone)]
pub(crate) enum WhereNode {
    Field {
        field: FieldIdentifier,
        operator: OperatorKind,
    },
    Connection {
        connector: Connector,
        nodes: Vec<WhereNode>,
    },
    Not(Vec<WhereNode>),
    /// Literal SQL: `{table}` is replaced by the alias, `?` binds the next value.
    Raw {
        template: String,
        params: Vec<Param>,
    },
    Invalid(CompileError),
}

impl WhereNode {
    pub(crate) fn to_sql(&self, query: &Query<'_>, table: &Table) -> CompileResult<Fragment> {
        match self {
            WhereNode::Field { field, operator } => {
                let column = field.column_sql(query.naming(), table);
                operator
                    .to_sql(query, &column)
                    .map_err(|err| err.in_condition(field.model().name(), field.field()))
            }
            WhereNode::Connection { connector, nodes } => {
                let separator = format!(" {} ", query.dialect().render_connector(*connector)?);
                where_sql(query, table, nodes, &separator, nodes.len() > 1)
            }
            WhereNode::Not(nodes) => {
                let mut sql = Fragment::new(query.dialect().render_connector(Connector::Not)?);
                sql.push(" (")
                    .push_fragment(where_sql(query, table, nodes, " AND ", nodes.len() > 1)?)
                    .push(")");
                Ok(sql)
            }
            WhereNode::Raw { template, params } => {
                Fragment::from_template(template, &table.alias, params)
            }
            WhereNode::Invalid(err) => Err(err.clone()),
        }
    }

    /// Whether this filter constrains the field `name` of its own table.
    pub(crate) fn touches(&self, name: &str) -> bool {
        match self {
            WhereNode::Field { field, .. } => field.field() == name,
            WhereNode::Connection { nodes, .. } | WhereNode::Not(nodes) => {
                nodes.iter().any(|node| node.touches(name))
            }
            WhereNode::Raw { .. } | WhereNode::Invalid(_) => false,
        }
    }

    fn needs_parens(&self) -> bool {
        match self {
            WhereNode::Connection { nodes, .. } => nodes.len() > 1,
            WhereNode::Raw { .. } => true,
            _ => false,
        }
    }
}

/// Render `nodes` joined by `separator`, parenthesising groups when `grouped`.
pub(crate) fn where_sql(
    query: &Query<'_>,
    table: &Table,
    nodes: &[WhereNode],
    separator: &str,
    grouped: bool,
) -> CompileResult<Fragment> {
    let mut parts = Vec::with_capacity(nodes.len());
    for node in nodes {
        let sql = node.to_sql(query, table)?;
        if grouped && node.needs_parens() {
            let mut wrapped = Fragment::new("(");
            wrapped.push_fragment(sql).push(")");
            parts.push(wrapped);
        } else {
            parts.push(sql);
        }
    }

    let mut sql = Fragment::empty();
    sql.push_separated(parts, separator);
    Ok(sql)
}

/// A join from a container table into one of its relations.
#[derive(Debug, Clone)]
pub(crate) struct JoinNode {
    pub(crate) relation: &'static str,
    pub(crate) target: ModelType,
    pub(crate) nodes: Vec<Node>,
}

impl JoinNode {
    /// The table this join introduces under `container`.
    pub(crate) fn table(&self, query: &Query<'_>, container: &Table) -> CompileResult<Table> {
        let relation = query.registry().relation(container.model(), self.relation)?;
        if relation.target != self.target {
            return Err(CompileError::RelationNotFound {
                model: container.model().name(),
                relation: format!("{} to {}", self.relation, self.target.name()),
            });
        }
        container.derive_table(query.registry(), self.target, self.relation)
    }

    /// Allocate this join's table and every nested join's, registering them as concerned.
    pub(crate) fn plan(&self, query: &mut Query<'_>, container: &Table) -> CompileResult<()> {
        let table = self.table(query, container)?;
        query.add_concerned(table.clone())?;
        for node in &self.nodes {
            if let Node::Join(join) = node {
                join.plan(query, &table)?;
            }
        }
        Ok(())
    }

    /// Emit this join and its nested joins, parents first.
    pub(crate) fn compile(&self, query: &mut Query<'_>, container: &Table) -> CompileResult<()> {
        let table = self.table(query, container)?;
        let relation = query.registry().relation(container.model(), self.relation)?;
        query.mark_emitted(&table);

        let wheres: Vec<WhereNode> = self
            .nodes
            .iter()
            .filter_map(|node| match node {
                Node::Where(node) => Some(node.clone()),
                _ => None,
            })
            .collect();
        let preload = self.nodes.iter().any(|node| matches!(node, Node::Preload));
        let kind = if preload && wheres.is_empty() {
            "LEFT JOIN"
        } else {
            "INNER JOIN"
        };

        let mut sql = Fragment::new(format!(
            "{kind} {} {} ON {}.{} = {}.{}",
            table.name,
            table.alias,
            table.alias,
            relation.remote_column,
            container.alias,
            relation.local_column,
        ));

        let descriptor = self.target.descriptor();
        if let Some(deleted_at) = descriptor.field(DELETED_AT)
            && !wheres.iter().any(|node| node.touches(DELETED_AT))
        {
            let column = query.registry().column_of(&table.name, deleted_at);
            sql.push(&format!(" AND {}.{column} IS NULL", table.alias));
        }

        if !wheres.is_empty() {
            sql.push(" AND ")
                .push_fragment(where_sql(query, &table, &wheres, " AND ", true)?);
        }

        if preload {
            for field in descriptor.fields {
                let column = query.registry().column_of(&table.name, field);
                let label = query
                    .dialect()
                    .quote_identifier(&format!("{}__{column}", table.alias));
                query.push_select(format!("{}.{column} AS {label}", table.alias));
            }
        }

        query.push_join(sql);

        for node in &self.nodes {
            if let Node::Join(join) = node {
                join.compile(query, &table)?;
            }
        }
        Ok(())
    }
}

/// Type-erased condition.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Where(WhereNode),
    Join(JoinNode),
    Preload,
}

impl Node {
    pub(crate) fn join(relation: &'static str, target: ModelType, nodes: Vec<Node>) -> Self {
        Node::Join(JoinNode {
            relation,
            target,
            nodes,
        })
    }
}

/// A filter on the rows of model `M`.
pub struct WhereCondition<M> {
    node: WhereNode,
    _marker: PhantomData<fn() -> M>,
}

impl<M> WhereCondition<M> {
    pub(crate) fn from_node(node: WhereNode) -> Self {
        Self {
            node,
            _marker: PhantomData,
        }
    }

    pub(crate) fn into_node(self) -> WhereNode {
        self.node
    }

    /// The error this condition carries, if it was built from invalid parts.
    pub fn error(&self) -> Option<&CompileError> {
        match &self.node {
            WhereNode::Invalid(err) => Some(err),
            WhereNode::Field {
                operator: OperatorKind::Invalid(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}

impl<M> Clone for WhereCondition<M> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<M> fmt::Debug for WhereCondition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.node, f)
    }
}

/// A condition on model `M`: a filter, a join, or a preload marker.
pub struct Condition<M> {
    node: Node,
    _marker: PhantomData<fn() -> M>,
}

impl<M> Condition<M> {
    pub(crate) fn from_node(node: Node) -> Self {
        Self {
            node,
            _marker: PhantomData,
        }
    }

    pub(crate) fn into_node(self) -> Node {
        self.node
    }

    /// Select the columns of the model being joined.
    ///
    /// Only meaningful inside a join; at the root every column is already selected.
    pub fn preload() -> Self {
        Self::from_node(Node::Preload)
    }
}

impl<M> Clone for Condition<M> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<M> fmt::Debug for Condition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.node, f)
    }
}

impl<M> From<WhereCondition<M>> for Condition<M> {
    fn from(condition: WhereCondition<M>) -> Self {
        Self::from_node(Node::Where(condition.node))
    }
}

/// Conversion into a [`Condition<M>`].
///
/// Lets a list of plain filters be passed where conditions are expected.
pub trait IntoCondition<M> {
    fn into_condition(self) -> Condition<M>;
}

impl<M> IntoCondition<M> for Condition<M> {
    fn into_condition(self) -> Condition<M> {
        self
    }
}

impl<M> IntoCondition<M> for WhereCondition<M> {
    fn into_condition(self) -> Condition<M> {
        self.into()
    }
}

pub(crate) fn connection<M: Model>(
    connector: Connector,
    conditions: impl IntoIterator<Item = WhereCondition<M>>,
) -> WhereCondition<M> {
    let nodes: Vec<WhereNode> = conditions
        .into_iter()
        .map(WhereCondition::into_node)
        .collect();
    if nodes.is_empty() {
        return WhereCondition::from_node(WhereNode::Invalid(CompileError::EmptyConditions {
            connector: connector.name(),
            model: M::descriptor().name,
        }));
    }
    WhereCondition::from_node(WhereNode::Connection { connector, nodes })
}

/// All of `conditions` hold.
pub fn and<M: Model>(conditions: impl IntoIterator<Item = WhereCondition<M>>) -> WhereCondition<M> {
    connection(Connector::And, conditions)
}

/// At least one of `conditions` holds.
pub fn or<M: Model>(conditions: impl IntoIterator<Item = WhereCondition<M>>) -> WhereCondition<M> {
    connection(Connector::Or, conditions)
}

/// `NOT (c1 AND c2 ...)`.
pub fn not<M: Model>(conditions: impl IntoIterator<Item = WhereCondition<M>>) -> WhereCondition<M> {
    let nodes: Vec<WhereNode> = conditions
        .into_iter()
        .map(WhereCondition::into_node)
        .collect();
    if nodes.is_empty() {
        return WhereCondition::from_node(WhereNode::Invalid(CompileError::EmptyConditions {
            connector: Connector::Not.name(),
            model: M::descriptor().name,
        }));
    }
    WhereCondition::from_node(WhereNode::Not(nodes))
}

/// Literal SQL for filters the operators cannot express.
///
/// `{table}` is replaced with the alias of the table the condition applies to and
/// each `?` binds the next value:
///
/// ```ignore
/// raw::<Product>("{table}.int % ? = 0", [Param::new(2)])
/// ```
///
/// The template is inserted as-is: never build it from untrusted input.
pub fn raw<M>(template: impl Into<String>, values: impl IntoIterator<Item = Param>) -> WhereCondition<M> {
    WhereCondition::from_node(WhereNode::Raw {
        template: template.into(),
        params: values.into_iter().collect(),
    })
}

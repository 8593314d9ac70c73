//! Conditions built at runtime from JSON filters.
//!
//! A filter is an object whose keys are field or relation names of the model:
//!
//! ```json
//! { "code": 1, "product": { "int": [1, 2], "string": null } }
//! ```
//!
//! - a scalar compares with `=` (on a `Uuid` field, strings that parse as a UUID are
//!   bound as [`Uuid`]);
//! - `null` compiles to `IS NULL`;
//! - an array of scalars compiles to `IN (...)`;
//! - an object under a relation name joins that relation and applies the nested filter.
//!
//! The result is an ordinary list of [`Condition<M>`] compiled like typed conditions.

use crate::condition::{Condition, Node, WhereNode};
use crate::dialect::{Connector, SqlOperator};
use crate::error::{CompileError, CompileResult};
use crate::model::{FieldDescriptor, Model, ModelType};
use crate::operator::{Multivalue, Operation, OperatorKind};
use crate::registry::ModelRegistry;
use crate::value::{Operand, Param};
use serde_json::Value as Json;
use uuid::Uuid;

/// Build conditions on `M` from a JSON filter object.
pub fn conditions<M: Model>(
    registry: &ModelRegistry,
    filter: &Json,
) -> CompileResult<Vec<Condition<M>>> {
    let nodes = model_nodes(registry, ModelType::of::<M>(), filter)?;
    Ok(nodes.into_iter().map(Condition::from_node).collect())
}

fn model_nodes(registry: &ModelRegistry, model: ModelType, filter: &Json) -> CompileResult<Vec<Node>> {
    let Json::Object(map) = filter else {
        return Err(unsupported("Join", filter));
    };

    let descriptor = model.descriptor();
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    let mut nodes = Vec::with_capacity(keys.len());
    for key in keys {
        let value = &map[key.as_str()];

        if let Some(field) = descriptor.field(key) {
            nodes.push(Node::Where(WhereNode::Field {
                field: field.identifier(model),
                operator: operator_for(field, value)
                    .map_err(|err| err.in_condition(model.name(), field.name))?,
            }));
        } else if descriptor.relation(key).is_some() {
            let relation = registry.relation(model, key)?;
            if !value.is_object() {
                return Err(unsupported("Join", value));
            }
            let nested = model_nodes(registry, relation.target, value)?;
            nodes.push(Node::join(relation.name, relation.target, nested));
        } else {
            return Err(CompileError::UnknownField {
                model: model.name(),
                field: key.clone(),
            });
        }
    }
    Ok(nodes)
}

fn operator_for(field: &FieldDescriptor, value: &Json) -> CompileResult<OperatorKind> {
    match value {
        Json::Null => Ok(OperatorKind::Predicate(SqlOperator::IsNull)),
        Json::Array(values) => {
            let operands = values
                .iter()
                .map(|value| scalar(field, value).ok_or_else(|| unsupported("ArrayIn", value)))
                .map(|param| param.map(Operand::Literal))
                .collect::<CompileResult<Vec<_>>>()?;
            Ok(OperatorKind::Multivalue(Multivalue {
                operator: SqlOperator::ArrayIn,
                connector: Connector::Comma,
                prefix: "(",
                suffix: ")",
                operands,
            }))
        }
        value => {
            let param = scalar(field, value).ok_or_else(|| unsupported("Eq", value))?;
            Ok(OperatorKind::Value(vec![Operation {
                operator: SqlOperator::Eq,
                operand: Operand::Literal(param),
            }]))
        }
    }
}

/// Bind a non-null JSON scalar compared with `field`.
fn scalar(field: &FieldDescriptor, value: &Json) -> Option<Param> {
    match value {
        Json::Bool(b) => Some(Param::new(*b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Some(Param::new(i)),
            None => n.as_f64().map(Param::new),
        },
        Json::String(s) if field.uuid => match Uuid::parse_str(s) {
            Ok(uuid) => Some(Param::new(uuid)),
            Err(_) => Some(Param::new(s.clone())),
        },
        Json::String(s) => Some(Param::new(s.clone())),
        Json::Null | Json::Array(_) | Json::Object(_) => None,
    }
}

fn unsupported(operator: &'static str, value: &Json) -> CompileError {
    let type_name = match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    };
    CompileError::UnsupportedOperand {
        operator,
        type_name: type_name.to_string(),
    }
}

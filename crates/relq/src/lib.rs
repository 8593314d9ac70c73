//! # relq
//!
//! A typed relational query compiler.
//!
//! Filters and relation traversals are written as typed conditions on model types;
//! the compiler turns a list of them into one `SELECT` statement with uniquely
//! aliased joins, positional parameters, and dialect-specific operator text.
//!
//! ## Features
//!
//! - **Typed conditions**: `Field<M, T>` only accepts operators over `T`
//! - **Joins at any depth**: every join path gets its own alias (`sales__product__brand`)
//! - **Column comparisons**: compare against a field of any joined model, with explicit
//!   join selection when a model is joined more than once
//! - **Dialects**: PostgreSQL, MySQL, SQL Server and SQLite operator sets
//! - **Soft deletes**: joined tables with a `deleted_at` field are scoped automatically
//!
//! ## Example
//!
//! ```ignore
//! use relq::prelude::*;
//!
//! #[derive(Model, FromRow)]
//! #[orm(belongs_to(Product, as = "product"))]
//! struct Sale {
//!     id: i64,
//!     code: i32,
//!     product_id: i64,
//! }
//!
//! let registry = ModelRegistry::builder().from_inventory().build()?;
//!
//! let query = registry.compile([
//!     Condition::from(Sale::CODE.is(gt(10))),
//!     Sale::PRODUCT.join([Product::INT.is(eq(1))]),
//! ])?;
//!
//! assert_eq!(
//!     query.sql(),
//!     "SELECT sales.* FROM sales \
//!      INNER JOIN products sales__product ON sales__product.id = sales.product_id \
//!      AND sales__product.int = ? WHERE sales.code = ?"
//! );
//!
//! let sales: Vec<Sale> = query.fetch_all_as(&client).await?;
//! ```

pub mod client;
pub mod compiler;
pub mod condition;
pub mod dialect;
pub mod dynamic;
pub mod error;
pub mod field;
pub mod fragment;
pub mod model;
pub mod multitype;
pub mod mysql;
pub mod naming;
pub mod operator;
pub mod prelude;
pub mod psql;
pub mod query;
pub mod registry;
pub mod row;
pub mod sqlite;
pub mod sqlserver;
pub mod table;
pub mod value;

#[cfg(test)]
mod fixtures;

pub use client::GenericClient;
pub use compiler::{Compiler, CompilerConfig};
pub use condition::{Condition, IntoCondition, WhereCondition, and, not, or, raw};
pub use dialect::{Connector, Dialect, SqlOperator};
pub use error::{CompileError, CompileResult, ErrorKind, OrmError, OrmResult, RegistryError};
pub use field::{Field, FieldIdentifier, Relation};
pub use fragment::Fragment;
pub use model::{
    FieldDescriptor, Model, ModelDescriptor, ModelType, RelationDescriptor, RelationKind,
};
pub use naming::{NamingStrategy, SnakeCaseNaming};
pub use operator::Operator;
pub use query::CompiledQuery;
pub use registry::{ModelRegistry, RegistryBuilder, ResolvedRelation};
pub use row::{FromRow, RowExt};
pub use table::Table;
pub use value::{BaseType, IntoOperand, Operand, Param, Value};

// Re-exported for use by derive macros
pub use inventory;
pub use tokio_postgres;

#[cfg(feature = "derive")]
pub use relq_derive::{FromRow, Model};

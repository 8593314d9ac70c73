//! Convenient imports for typical `relq` usage.
//!
//! ```ignore
//! use relq::prelude::*;
//! ```

pub use crate::operator::{
    array_in, array_not_in, between, eq, eq_or_is_null, gt, gt_or_eq, is_distinct, is_false,
    is_not_distinct, is_not_false, is_not_null, is_not_true, is_not_unknown, is_null, is_true,
    is_unknown, like, lt, lt_or_eq, not_between, not_eq, not_eq_or_is_not_null,
};
pub use crate::{
    CompileError, CompiledQuery, Compiler, CompilerConfig, Condition, Dialect, Field, FromRow,
    GenericClient, Model, ModelRegistry, OrmError, OrmResult, Param, Relation, RowExt,
    WhereCondition, and, not, or, raw,
};
pub use crate::{multitype, mysql, psql, sqlite, sqlserver};

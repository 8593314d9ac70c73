//! SQL dialects and the operator text each of them supports.
//!
//! Operators and connectors are abstract: a condition tree stores [`SqlOperator`] and
//! [`Connector`] values, and the [`Dialect`] chosen at compile time renders them. Most
//! operators share their text across dialects; the dialect-only ones (e.g. MySQL's
//! null-safe `<=>`) render only for their own engine.

use crate::error::{CompileError, CompileResult};
use std::fmt;

/// A supported SQL dialect family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    Postgres,
    MySql,
    SqlServer,
    Sqlite,
}

impl Dialect {
    /// Every supported dialect.
    pub const ALL: [Dialect; 4] = [
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::SqlServer,
        Dialect::Sqlite,
    ];

    /// Human-readable name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Postgres => "PostgreSQL",
            Dialect::MySql => "MySQL",
            Dialect::SqlServer => "SQL Server",
            Dialect::Sqlite => "SQLite",
        }
    }

    /// SQL text of `op` in this dialect, or `None` if the dialect lacks it.
    pub fn operator_sql(self, op: SqlOperator) -> Option<&'static str> {
        use SqlOperator::*;

        let supported = match op {
            IsTrue | IsNotTrue | IsFalse | IsNotFalse => self != Dialect::SqlServer,
            IsUnknown | IsNotUnknown => !matches!(self, Dialect::SqlServer | Dialect::Sqlite),
            IsDistinct | IsNotDistinct => self != Dialect::MySql,
            MySqlIsEqual | MySqlRegexp => self == Dialect::MySql,
            SqlServerNotLt | SqlServerNotGt => self == Dialect::SqlServer,
            PostgresILike | PostgresSimilarTo | PostgresPosixMatch | PostgresPosixIMatch => {
                self == Dialect::Postgres
            }
            SqliteGlob => self == Dialect::Sqlite,
            _ => true,
        };
        supported.then(|| op.sql())
    }

    /// SQL text of `connector` in this dialect, or `None` if the dialect lacks it.
    pub fn connector_sql(self, connector: Connector) -> Option<&'static str> {
        match connector {
            Connector::Xor if self != Dialect::MySql => None,
            _ => Some(connector.sql()),
        }
    }

    /// Quote an identifier (used for generated column aliases).
    pub fn quote_identifier(self, ident: &str) -> String {
        match self {
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
            Dialect::SqlServer => format!("[{}]", ident.replace(']', "]]")),
            Dialect::Postgres | Dialect::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }

    pub(crate) fn render_operator(self, op: SqlOperator) -> CompileResult<&'static str> {
        self.operator_sql(op)
            .ok_or(CompileError::UnsupportedOperator {
                operator: op.name(),
                dialect: self.name(),
            })
    }

    pub(crate) fn render_connector(self, connector: Connector) -> CompileResult<&'static str> {
        self.connector_sql(connector)
            .ok_or(CompileError::UnsupportedOperator {
                operator: connector.name(),
                dialect: self.name(),
            })
    }

    /// Write the native placeholder for the 1-based parameter `index`.
    pub(crate) fn write_placeholder(self, out: &mut String, index: usize) {
        use fmt::Write;

        // Writing into a String cannot fail.
        let _ = match self {
            Dialect::Postgres => write!(out, "${index}"),
            Dialect::SqlServer => write!(out, "@p{index}"),
            Dialect::MySql | Dialect::Sqlite => write!(out, "?"),
        };
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An abstract comparison or predicate operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlOperator {
    Eq,
    NotEq,
    Lt,
    LtOrEq,
    Gt,
    GtOrEq,
    Between,
    NotBetween,
    IsDistinct,
    IsNotDistinct,
    Like,
    Escape,
    ArrayIn,
    ArrayNotIn,
    IsNull,
    IsNotNull,
    IsTrue,
    IsNotTrue,
    IsFalse,
    IsNotFalse,
    IsUnknown,
    IsNotUnknown,
    /// MySQL null-safe equality (`<=>`).
    MySqlIsEqual,
    MySqlRegexp,
    SqlServerNotLt,
    SqlServerNotGt,
    PostgresILike,
    PostgresSimilarTo,
    PostgresPosixMatch,
    PostgresPosixIMatch,
    SqliteGlob,
}

impl SqlOperator {
    /// Diagnostic name, used in error messages.
    pub fn name(self) -> &'static str {
        use SqlOperator::*;

        match self {
            Eq => "Eq",
            NotEq => "NotEq",
            Lt => "Lt",
            LtOrEq => "LtOrEq",
            Gt => "Gt",
            GtOrEq => "GtOrEq",
            Between => "Between",
            NotBetween => "NotBetween",
            IsDistinct => "IsDistinct",
            IsNotDistinct => "IsNotDistinct",
            Like => "Like",
            Escape => "Escape",
            ArrayIn => "ArrayIn",
            ArrayNotIn => "ArrayNotIn",
            IsNull => "IsNull",
            IsNotNull => "IsNotNull",
            IsTrue => "IsTrue",
            IsNotTrue => "IsNotTrue",
            IsFalse => "IsFalse",
            IsNotFalse => "IsNotFalse",
            IsUnknown => "IsUnknown",
            IsNotUnknown => "IsNotUnknown",
            MySqlIsEqual => "mysql::IsEqual",
            MySqlRegexp => "mysql::Regexp",
            SqlServerNotLt => "sqlserver::NotLt",
            SqlServerNotGt => "sqlserver::NotGt",
            PostgresILike => "psql::ILike",
            PostgresSimilarTo => "psql::SimilarTo",
            PostgresPosixMatch => "psql::PosixMatch",
            PostgresPosixIMatch => "psql::PosixIMatch",
            SqliteGlob => "sqlite::Glob",
        }
    }

    fn sql(self) -> &'static str {
        use SqlOperator::*;

        match self {
            Eq => "=",
            NotEq => "<>",
            Lt => "<",
            LtOrEq => "<=",
            Gt => ">",
            GtOrEq => ">=",
            Between => "BETWEEN",
            NotBetween => "NOT BETWEEN",
            IsDistinct => "IS DISTINCT FROM",
            IsNotDistinct => "IS NOT DISTINCT FROM",
            Like => "LIKE",
            Escape => "ESCAPE",
            ArrayIn => "IN",
            ArrayNotIn => "NOT IN",
            IsNull => "IS NULL",
            IsNotNull => "IS NOT NULL",
            IsTrue => "IS TRUE",
            IsNotTrue => "IS NOT TRUE",
            IsFalse => "IS FALSE",
            IsNotFalse => "IS NOT FALSE",
            IsUnknown => "IS UNKNOWN",
            IsNotUnknown => "IS NOT UNKNOWN",
            MySqlIsEqual => "<=>",
            MySqlRegexp => "REGEXP",
            SqlServerNotLt => "!<",
            SqlServerNotGt => "!>",
            PostgresILike => "ILIKE",
            PostgresSimilarTo => "SIMILAR TO",
            PostgresPosixMatch => "~",
            PostgresPosixIMatch => "~*",
            SqliteGlob => "GLOB",
        }
    }
}

/// Connects conditions (or multivalue operands).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
    And,
    Or,
    Not,
    Comma,
    /// MySQL only.
    Xor,
}

impl Connector {
    /// Diagnostic name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Connector::And => "And",
            Connector::Or => "Or",
            Connector::Not => "Not",
            Connector::Comma => "Comma",
            Connector::Xor => "Xor",
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
            Connector::Not => "NOT",
            Connector::Comma => ",",
            Connector::Xor => "XOR",
        }
    }
}

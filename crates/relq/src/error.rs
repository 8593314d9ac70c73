//! Error types for relq

use thiserror::Error;

/// Result type alias for operations that execute compiled queries.
pub type OrmResult<T> = Result<T, OrmError>;

/// Result type alias for query compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors raised while compiling a condition tree into SQL.
///
/// Operator and condition constructors never fail eagerly: a problem detected while
/// building an operator (a null literal, a malformed pattern) is carried until the
/// operator is compiled, so the error can be reported together with the field and
/// model it was applied to (see [`CompileError::InCondition`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The physical table of a model could not be determined.
    #[error("table name of model {model} could not be resolved: model is not registered")]
    TableResolution { model: &'static str },

    /// A field operand belongs to a model the query never joined.
    #[error(
        "field's model is not concerned by the query (not joined); not concerned model: {model}; operator: {operator}"
    )]
    FieldNotConcerned {
        model: &'static str,
        operator: &'static str,
    },

    /// A field operand belongs to a model joined several times and no join was selected.
    #[error(
        "field's model is joined more than once, select which one you want to use with select_join; model: {model}, joins: {joins}; operator: {operator}"
    )]
    JoinMustBeSelected {
        model: &'static str,
        operator: &'static str,
        joins: usize,
    },

    /// A selected join index does not exist.
    #[error(
        "join {index} of model {model} does not exist, the model is joined {joins} time(s); operator: {operator}"
    )]
    JoinNotFound {
        model: &'static str,
        operator: &'static str,
        index: usize,
        joins: usize,
    },

    /// A null literal was given to an operator that cannot compare against null.
    #[error("value to be compared can't be null; operator: {operator}")]
    ValueCantBeNull { operator: &'static str },

    /// An operand is neither a literal value nor a field.
    #[error("operand of type {type_name} is neither a value nor a field; operator: {operator}")]
    UnsupportedOperand {
        operator: &'static str,
        type_name: String,
    },

    /// A field operand's value type is not related to the operator's value type.
    #[error("field type does not match operator type: expected {expected}, found {found}; operator: {operator}")]
    FieldTypeMismatch {
        operator: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A connector (AND/OR/XOR/NOT) was given no inner conditions.
    #[error("condition must have at least one inner condition; connector: {connector}; model: {model}")]
    EmptyConditions {
        connector: &'static str,
        model: &'static str,
    },

    /// A pattern failed validation.
    #[error("invalid pattern: {message}; operator: {operator}")]
    InvalidPattern {
        operator: &'static str,
        message: String,
    },

    /// The compiling dialect has no SQL for an operator or connector.
    #[error("operator {operator} is not supported by {dialect}")]
    UnsupportedOperator {
        operator: &'static str,
        dialect: &'static str,
    },

    /// `select_join` named an operand position that does not exist.
    #[error("operand {index} does not exist, the operator has {len} operand(s); operator: {operator}")]
    OperandOutOfRange {
        operator: &'static str,
        index: usize,
        len: usize,
    },

    /// A join names a relation the container model does not declare.
    #[error("model {model} has no relation named {relation}")]
    RelationNotFound {
        model: &'static str,
        relation: String,
    },

    /// A dynamic condition names a field the model does not declare.
    #[error("model {model} has no field named {field}")]
    UnknownField { model: &'static str, field: String },

    /// The same relation path was joined twice.
    #[error("relation path {alias} is joined more than once")]
    DuplicateJoin { alias: String },

    /// A raw condition's placeholders do not match its values.
    #[error("raw condition has {found} placeholder(s) but {expected} value(s)")]
    RawPlaceholders { expected: usize, found: usize },

    /// An error raised while compiling a condition on a specific field.
    #[error("{source}; model: {model}, field: {field}")]
    InCondition {
        model: &'static str,
        field: &'static str,
        #[source]
        source: Box<CompileError>,
    },
}

/// The kind of a [`CompileError`], independent of the context it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TableResolution,
    FieldNotConcerned,
    JoinMustBeSelected,
    JoinNotFound,
    ValueCantBeNull,
    UnsupportedOperand,
    FieldTypeMismatch,
    EmptyConditions,
    InvalidPattern,
    UnsupportedOperator,
    OperandOutOfRange,
    RelationNotFound,
    UnknownField,
    DuplicateJoin,
    RawPlaceholders,
}

impl CompileError {
    /// Attach the model and field a condition was compiled for.
    pub fn in_condition(self, model: &'static str, field: &'static str) -> Self {
        Self::InCondition {
            model,
            field,
            source: Box::new(self),
        }
    }

    /// The error without any condition context.
    pub fn root(&self) -> &CompileError {
        match self {
            Self::InCondition { source, .. } => source.root(),
            other => other,
        }
    }

    /// The kind of this error, seeing through condition context.
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::TableResolution { .. } => ErrorKind::TableResolution,
            Self::FieldNotConcerned { .. } => ErrorKind::FieldNotConcerned,
            Self::JoinMustBeSelected { .. } => ErrorKind::JoinMustBeSelected,
            Self::JoinNotFound { .. } => ErrorKind::JoinNotFound,
            Self::ValueCantBeNull { .. } => ErrorKind::ValueCantBeNull,
            Self::UnsupportedOperand { .. } => ErrorKind::UnsupportedOperand,
            Self::FieldTypeMismatch { .. } => ErrorKind::FieldTypeMismatch,
            Self::EmptyConditions { .. } => ErrorKind::EmptyConditions,
            Self::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            Self::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
            Self::OperandOutOfRange { .. } => ErrorKind::OperandOutOfRange,
            Self::RelationNotFound { .. } => ErrorKind::RelationNotFound,
            Self::UnknownField { .. } => ErrorKind::UnknownField,
            Self::DuplicateJoin { .. } => ErrorKind::DuplicateJoin,
            Self::RawPlaceholders { .. } => ErrorKind::RawPlaceholders,
            // `root()` never returns a wrapper.
            Self::InCondition { source, .. } => source.kind(),
        }
    }

    /// Check if this is a table resolution error
    pub fn is_table_resolution(&self) -> bool {
        self.kind() == ErrorKind::TableResolution
    }

    /// Check if a field referenced a model that was never joined
    pub fn is_field_not_concerned(&self) -> bool {
        self.kind() == ErrorKind::FieldNotConcerned
    }

    /// Check if a field referenced a model joined more than once without selecting a join
    pub fn is_join_must_be_selected(&self) -> bool {
        self.kind() == ErrorKind::JoinMustBeSelected
    }

    /// Check if a null value reached an operator that forbids it
    pub fn is_value_cant_be_null(&self) -> bool {
        self.kind() == ErrorKind::ValueCantBeNull
    }

    /// Check if an operand could not be classified as a value or a field
    pub fn is_unsupported_operand(&self) -> bool {
        self.kind() == ErrorKind::UnsupportedOperand
    }

    /// Check if a connector was given no inner conditions
    pub fn is_empty_conditions(&self) -> bool {
        self.kind() == ErrorKind::EmptyConditions
    }
}

/// Errors raised while building a [`ModelRegistry`](crate::ModelRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A relation targets a model that was not registered.
    #[error("relation {relation} of model {model} targets unregistered model {target}")]
    UnknownTarget {
        model: &'static str,
        relation: &'static str,
        target: &'static str,
    },

    /// Neither side of a relation carries the foreign key.
    #[error("foreign key of relation {relation} of model {model} not found, looked for: {candidates}")]
    ForeignKeyNotFound {
        model: &'static str,
        relation: &'static str,
        candidates: String,
    },

    /// A relation references a field the referenced model does not declare.
    #[error("relation {relation} of model {model} references unknown field {field}")]
    UnknownReference {
        model: &'static str,
        relation: &'static str,
        field: &'static str,
    },
}

/// Error types for executing compiled queries
#[derive(Debug, Error)]
pub enum OrmError {
    /// The condition tree could not be compiled
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    /// The model registry could not be built
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a compile error
    pub fn is_compile(&self) -> bool {
        matches!(self, Self::Compile(_))
    }
}

//! Operators comparing a column against literals, other columns, or nothing.
//!
//! An [`Operator<T>`] is built by the constructors in this module (and the dialect
//! modules [`psql`](crate::psql), [`mysql`](crate::mysql), [`sqlserver`](crate::sqlserver),
//! [`sqlite`](crate::sqlite)) and applied to a field with [`Field::is`](crate::Field::is):
//!
//! ```ignore
//! use relq::operator::*;
//!
//! Product::INT.is(gt(10));
//! Product::STRING.is(like("%abc%").escape('\\'));
//! Product::FLOAT.is(between(1.0, 2.5));
//! Sale::CODE.is(eq(Seller::ID));          // column to column
//! ```

use crate::dialect::{Connector, SqlOperator};
use crate::error::{CompileError, CompileResult};
use crate::fragment::Fragment;
use crate::query::Query;
use crate::value::{IntoOperand, Operand, Param};
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone)]
pub(crate) struct Operation {
    pub(crate) operator: SqlOperator,
    pub(crate) operand: Operand,
}

#[derive(Debug, Clone)]
pub(crate) struct Multivalue {
    pub(crate) operator: SqlOperator,
    pub(crate) connector: Connector,
    pub(crate) prefix: &'static str,
    pub(crate) suffix: &'static str,
    pub(crate) operands: Vec<Operand>,
}

/// Type-erased operator, shared by typed and dynamic conditions.
#[derive(Debug, Clone)]
pub(crate) enum OperatorKind {
    /// One or more chained `operator operand` pairs (`LIKE ? ESCAPE ?`).
    Value(Vec<Operation>),
    /// One operator applied to a list of operands (`IN (?, ?)`, `BETWEEN ? AND ?`).
    Multivalue(Multivalue),
    /// No operand (`IS NULL`).
    Predicate(SqlOperator),
    /// Carries an error raised while building the operator.
    Invalid(CompileError),
}

impl OperatorKind {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            OperatorKind::Value(operations) => operations
                .first()
                .map_or("Value", |operation| operation.operator.name()),
            OperatorKind::Multivalue(multivalue) => multivalue.operator.name(),
            OperatorKind::Predicate(operator) => operator.name(),
            OperatorKind::Invalid(_) => "Invalid",
        }
    }

    /// Render `column <operator> <operands>`.
    pub(crate) fn to_sql(&self, query: &Query<'_>, column: &str) -> CompileResult<Fragment> {
        let dialect = query.dialect();
        let name = self.name();

        match self {
            OperatorKind::Value(operations) => {
                let mut sql = Fragment::new(column);
                for operation in operations {
                    sql.push(" ")
                        .push(dialect.render_operator(operation.operator)?)
                        .push(" ");
                    push_operand(&mut sql, query, &operation.operand, name)?;
                }
                Ok(sql)
            }
            OperatorKind::Multivalue(multivalue) => {
                let text = dialect.render_operator(multivalue.operator)?;
                if multivalue.operands.is_empty() {
                    // Nothing is IN an empty list; everything is NOT IN it.
                    let always = match multivalue.operator {
                        SqlOperator::ArrayNotIn => "1=1",
                        _ => "1=0",
                    };
                    return Ok(Fragment::new(always));
                }

                let separator = match multivalue.connector {
                    Connector::Comma => ", ".to_string(),
                    connector => format!(" {} ", dialect.render_connector(connector)?),
                };

                let mut sql = Fragment::new(column);
                sql.push(" ").push(text).push(" ").push(multivalue.prefix);
                for (i, operand) in multivalue.operands.iter().enumerate() {
                    if i > 0 {
                        sql.push(&separator);
                    }
                    push_operand(&mut sql, query, operand, name)?;
                }
                sql.push(multivalue.suffix);
                Ok(sql)
            }
            OperatorKind::Predicate(operator) => Ok(Fragment::new(format!(
                "{column} {}",
                dialect.render_operator(*operator)?
            ))),
            OperatorKind::Invalid(err) => Err(err.clone()),
        }
    }

    fn operands_mut(&mut self) -> Vec<&mut Operand> {
        match self {
            OperatorKind::Value(operations) => operations.iter_mut().map(|o| &mut o.operand).collect(),
            OperatorKind::Multivalue(multivalue) => multivalue.operands.iter_mut().collect(),
            OperatorKind::Predicate(_) | OperatorKind::Invalid(_) => Vec::new(),
        }
    }
}

fn push_operand(
    sql: &mut Fragment,
    query: &Query<'_>,
    operand: &Operand,
    operator: &'static str,
) -> CompileResult<()> {
    match operand {
        Operand::Literal(param) => {
            sql.push_bind(param.clone());
        }
        Operand::Field { field, join } => {
            let table = query.field_table(field, *join, operator)?;
            sql.push(&field.column_sql(query.naming(), table));
        }
    }
    Ok(())
}

/// An operator comparing values of type `T`.
pub struct Operator<T> {
    kind: OperatorKind,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Operator<T> {
    pub(crate) fn from_kind(kind: OperatorKind) -> Self {
        Self {
            kind,
            _marker: PhantomData,
        }
    }

    pub(crate) fn into_kind(self) -> OperatorKind {
        self.kind
    }

    pub(crate) fn value(operator: SqlOperator, operand: Operand) -> Self {
        Self::from_kind(OperatorKind::Value(vec![Operation { operator, operand }]))
    }

    /// A value operator that rejects null literals.
    pub(crate) fn cant_be_null(operator: SqlOperator, operand: Operand) -> Self {
        if operand.is_null_literal() {
            return Self::invalid(CompileError::ValueCantBeNull {
                operator: operator.name(),
            });
        }
        Self::value(operator, operand)
    }

    /// `value` unless the operand is a null literal, in which case `on_null`.
    pub(crate) fn value_or_predicate(
        operator: SqlOperator,
        operand: Operand,
        on_null: SqlOperator,
    ) -> Self {
        if operand.is_null_literal() {
            return Self::predicate(on_null);
        }
        Self::value(operator, operand)
    }

    pub(crate) fn multivalue(
        operator: SqlOperator,
        connector: Connector,
        prefix: &'static str,
        suffix: &'static str,
        operands: Vec<Operand>,
    ) -> Self {
        Self::from_kind(OperatorKind::Multivalue(Multivalue {
            operator,
            connector,
            prefix,
            suffix,
            operands,
        }))
    }

    pub(crate) fn predicate(operator: SqlOperator) -> Self {
        Self::from_kind(OperatorKind::Predicate(operator))
    }

    pub(crate) fn invalid(err: CompileError) -> Self {
        Self::from_kind(OperatorKind::Invalid(err))
    }

    /// Select which join of a field operand's model to compare against.
    ///
    /// `operand` is the position of the operand (0 for single-value operators) and
    /// `join` the index of the join, in the order joins of that model appear in
    /// the condition tree. Only needed when the model is joined more than once.
    pub fn select_join(mut self, operand: usize, join: usize) -> Self {
        if matches!(self.kind, OperatorKind::Invalid(_)) {
            return self;
        }

        let name = self.kind.name();
        let mut operands = self.kind.operands_mut();
        let len = operands.len();
        let found = match operands.get_mut(operand) {
            Some(Operand::Field { join: selected, .. }) => {
                *selected = Some(join);
                true
            }
            Some(Operand::Literal(_)) => true,
            None => false,
        };

        if !found {
            self.kind = OperatorKind::Invalid(CompileError::OperandOutOfRange {
                operator: name,
                index: operand,
                len,
            });
        }
        self
    }

    /// Append `ESCAPE <escape>` to a pattern operator (`LIKE`, `ILIKE`, `SIMILAR TO`).
    pub fn escape(mut self, escape: char) -> Self {
        match &mut self.kind {
            OperatorKind::Value(operations)
                if operations.len() == 1 && is_pattern(operations[0].operator) =>
            {
                operations.push(Operation {
                    operator: SqlOperator::Escape,
                    operand: Operand::Literal(Param::new(escape.to_string())),
                });
            }
            OperatorKind::Invalid(_) => {}
            other => {
                *other = OperatorKind::Invalid(CompileError::InvalidPattern {
                    operator: SqlOperator::Escape.name(),
                    message: format!("ESCAPE cannot follow {}", other.name()),
                });
            }
        }
        self
    }

    /// Diagnostic name of the operator.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The error this operator carries, if it is invalid.
    pub fn error(&self) -> Option<&CompileError> {
        match &self.kind {
            OperatorKind::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

fn is_pattern(operator: SqlOperator) -> bool {
    matches!(
        operator,
        SqlOperator::Like | SqlOperator::PostgresILike | SqlOperator::PostgresSimilarTo
    )
}

impl<T> Clone for Operator<T> {
    fn clone(&self) -> Self {
        Self::from_kind(self.kind.clone())
    }
}

impl<T> fmt::Debug for Operator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.kind, f)
    }
}

/// Value types that can be matched against a text pattern.
pub trait Text {}

impl Text for String {}
impl Text for &'static str {}
impl<T: Text> Text for Option<T> {}

/// Value types that can be tested for truth.
pub trait Boolean {}

impl Boolean for bool {}
impl Boolean for Option<bool> {}

// ── Comparison ──────────────────────────────────────────────────────────────

/// `column = value`; a null value is an error, see [`eq_or_is_null`].
pub fn eq<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::cant_be_null(SqlOperator::Eq, value.into_operand())
}

/// `column = value`, or `column IS NULL` when the value is null.
pub fn eq_or_is_null<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::value_or_predicate(SqlOperator::Eq, value.into_operand(), SqlOperator::IsNull)
}

/// `column <> value`; a null value is an error, see [`not_eq_or_is_not_null`].
pub fn not_eq<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::cant_be_null(SqlOperator::NotEq, value.into_operand())
}

/// `column <> value`, or `column IS NOT NULL` when the value is null.
pub fn not_eq_or_is_not_null<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::value_or_predicate(
        SqlOperator::NotEq,
        value.into_operand(),
        SqlOperator::IsNotNull,
    )
}

pub fn lt<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::cant_be_null(SqlOperator::Lt, value.into_operand())
}

pub fn lt_or_eq<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::cant_be_null(SqlOperator::LtOrEq, value.into_operand())
}

pub fn gt<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::cant_be_null(SqlOperator::Gt, value.into_operand())
}

pub fn gt_or_eq<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::cant_be_null(SqlOperator::GtOrEq, value.into_operand())
}

// ── Predicates ──────────────────────────────────────────────────────────────

pub fn is_null<T>() -> Operator<T> {
    Operator::predicate(SqlOperator::IsNull)
}

pub fn is_not_null<T>() -> Operator<T> {
    Operator::predicate(SqlOperator::IsNotNull)
}

/// Not supported by SQL Server.
pub fn is_true<T: Boolean>() -> Operator<T> {
    Operator::predicate(SqlOperator::IsTrue)
}

/// Not supported by SQL Server.
pub fn is_not_true<T: Boolean>() -> Operator<T> {
    Operator::predicate(SqlOperator::IsNotTrue)
}

/// Not supported by SQL Server.
pub fn is_false<T: Boolean>() -> Operator<T> {
    Operator::predicate(SqlOperator::IsFalse)
}

/// Not supported by SQL Server.
pub fn is_not_false<T: Boolean>() -> Operator<T> {
    Operator::predicate(SqlOperator::IsNotFalse)
}

/// Not supported by SQL Server or SQLite.
pub fn is_unknown<T: Boolean>() -> Operator<T> {
    Operator::predicate(SqlOperator::IsUnknown)
}

/// Not supported by SQL Server or SQLite.
pub fn is_not_unknown<T: Boolean>() -> Operator<T> {
    Operator::predicate(SqlOperator::IsNotUnknown)
}

/// Null-safe inequality. Not supported by MySQL (see [`mysql::is_equal`](crate::mysql::is_equal)).
pub fn is_distinct<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::value(SqlOperator::IsDistinct, value.into_operand())
}

/// Null-safe equality. Not supported by MySQL.
pub fn is_not_distinct<T>(value: impl IntoOperand<T>) -> Operator<T> {
    Operator::value(SqlOperator::IsNotDistinct, value.into_operand())
}

// ── Multivalue ──────────────────────────────────────────────────────────────

/// `column BETWEEN low AND high`.
pub fn between<T>(low: impl IntoOperand<T>, high: impl IntoOperand<T>) -> Operator<T> {
    Operator::multivalue(
        SqlOperator::Between,
        Connector::And,
        "",
        "",
        vec![low.into_operand(), high.into_operand()],
    )
}

/// `column NOT BETWEEN low AND high`.
pub fn not_between<T>(low: impl IntoOperand<T>, high: impl IntoOperand<T>) -> Operator<T> {
    Operator::multivalue(
        SqlOperator::NotBetween,
        Connector::And,
        "",
        "",
        vec![low.into_operand(), high.into_operand()],
    )
}

/// `column IN (v1, v2, ...)`. An empty list matches no row.
pub fn array_in<T, V: IntoOperand<T>>(values: impl IntoIterator<Item = V>) -> Operator<T> {
    Operator::multivalue(
        SqlOperator::ArrayIn,
        Connector::Comma,
        "(",
        ")",
        values.into_iter().map(IntoOperand::into_operand).collect(),
    )
}

/// `column NOT IN (v1, v2, ...)`. An empty list matches every row.
pub fn array_not_in<T, V: IntoOperand<T>>(values: impl IntoIterator<Item = V>) -> Operator<T> {
    Operator::multivalue(
        SqlOperator::ArrayNotIn,
        Connector::Comma,
        "(",
        ")",
        values.into_iter().map(IntoOperand::into_operand).collect(),
    )
}

// ── Patterns ────────────────────────────────────────────────────────────────

/// `column LIKE pattern`; chain [`Operator::escape`] to set the escape character.
pub fn like<T: Text>(pattern: impl Into<String>) -> Operator<T> {
    pattern_operator(SqlOperator::Like, pattern.into())
}

pub(crate) fn pattern_operator<T>(operator: SqlOperator, pattern: String) -> Operator<T> {
    Operator::value(operator, Operand::Literal(Param::new(pattern)))
}

/// A pattern operator whose pattern must be a POSIX extended regular expression.
///
/// Perl extensions (`\d`, `(?:...)`, lazy quantifiers) are rejected; the rest of the
/// syntax is checked by compiling the pattern.
pub(crate) fn regex_operator<T>(operator: SqlOperator, pattern: String) -> Operator<T> {
    let checked = check_posix(&pattern)
        .and_then(|()| regex::Regex::new(&pattern).map(drop).map_err(|err| err.to_string()));
    match checked {
        Ok(()) => pattern_operator(operator, pattern),
        Err(message) => Operator::invalid(CompileError::InvalidPattern {
            operator: operator.name(),
            message,
        }),
    }
}

const PERL_ESCAPES: &str = "dDsSwWbBAzZpPQEKG";

/// Reject the constructs a POSIX ERE engine does not know.
fn check_posix(pattern: &str) -> Result<(), String> {
    let mut chars = pattern.chars().peekable();
    // Whether the previous token was a repetition operator.
    let mut repeated = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next()
                    && PERL_ESCAPES.contains(escaped)
                {
                    return Err(format!("`\\{escaped}` is not a POSIX escape"));
                }
                repeated = false;
            }
            '[' => {
                // `]` right after `[` or `[^` is a literal member.
                if chars.peek() == Some(&'^') {
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    chars.next();
                }
                loop {
                    match chars.next() {
                        None => return Err("unclosed bracket expression".to_string()),
                        Some(']') => break,
                        Some('[') if matches!(chars.peek(), Some(':' | '.' | '=')) => {
                            let Some(delimiter) = chars.next() else { break };
                            let mut previous = delimiter;
                            loop {
                                match chars.next() {
                                    None => {
                                        return Err("unclosed bracket expression".to_string());
                                    }
                                    Some(']') if previous == delimiter => break,
                                    Some(next) => previous = next,
                                }
                            }
                        }
                        Some('\\') => {
                            if let Some(escaped) = chars.next()
                                && PERL_ESCAPES.contains(escaped)
                            {
                                return Err(format!("`\\{escaped}` is not a POSIX escape"));
                            }
                        }
                        Some(_) => {}
                    }
                }
                repeated = false;
            }
            '(' if chars.peek() == Some(&'?') => {
                return Err("`(?` groups are not POSIX".to_string());
            }
            '*' | '+' | '?' | '{' => {
                if repeated {
                    return Err(format!("nested repetition operator `{c}`"));
                }
                if c == '{' {
                    for next in chars.by_ref() {
                        if next == '}' {
                            break;
                        }
                    }
                }
                repeated = true;
            }
            _ => repeated = false,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;

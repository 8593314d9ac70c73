use crate::dialect::Dialect;
use crate::error::{CompileError, CompileResult};
use crate::value::Param;

#[derive(Debug, Clone)]
enum Part {
    Raw(String),
    Param,
}

/// A piece of SQL with its bound parameters.
///
/// Fragments store SQL text and parameters separately and only number placeholders
/// when rendered, so they compose freely in any order.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    parts: Vec<Part>,
    params: Vec<Param>,
}

impl Fragment {
    /// Create a new fragment with initial SQL text.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Raw(sql.into())],
            params: Vec::new(),
        }
    }

    /// Create an empty fragment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(Part::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(Part::Raw(sql.to_string())),
        }
        self
    }

    /// Append a placeholder and bind its value.
    pub fn push_bind(&mut self, param: Param) -> &mut Self {
        self.parts.push(Part::Param);
        self.params.push(param);
        self
    }

    /// Append another fragment, consuming it.
    pub fn push_fragment(&mut self, other: Fragment) -> &mut Self {
        for part in other.parts {
            match part {
                Part::Raw(sql) => {
                    self.push(&sql);
                }
                Part::Param => self.parts.push(Part::Param),
            }
        }
        self.params.extend(other.params);
        self
    }

    /// Append `fragments` separated by `separator`.
    pub fn push_separated(
        &mut self,
        fragments: impl IntoIterator<Item = Fragment>,
        separator: &str,
    ) -> &mut Self {
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                self.push(separator);
            }
            self.push_fragment(fragment);
        }
        self
    }

    /// Parse `template`, replacing `{table}` with `alias` and each `?` with the next value.
    pub(crate) fn from_template(template: &str, alias: &str, params: &[Param]) -> CompileResult<Self> {
        let sql = template.replace("{table}", alias);
        let found = sql.matches('?').count();
        if found != params.len() {
            return Err(CompileError::RawPlaceholders {
                expected: params.len(),
                found,
            });
        }

        let mut fragment = Fragment::empty();
        let mut pieces = sql.split('?');
        if let Some(first) = pieces.next() {
            fragment.push(first);
        }
        for (piece, param) in pieces.zip(params) {
            fragment.push_bind(param.clone());
            fragment.push(piece);
        }
        Ok(fragment)
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub(crate) fn into_params(self) -> Vec<Param> {
        self.params
    }

    /// Render with `?` placeholders.
    pub fn sql(&self) -> String {
        self.render(Dialect::Sqlite)
    }

    /// Render with the placeholders native to `dialect`.
    pub fn render(&self, dialect: Dialect) -> String {
        let mut out = String::with_capacity(
            self.parts
                .iter()
                .map(|p| match p {
                    Part::Raw(s) => s.len(),
                    Part::Param => 4,
                })
                .sum(),
        );

        let mut idx = 0;
        for part in &self.parts {
            match part {
                Part::Raw(s) => out.push_str(s),
                Part::Param => {
                    idx += 1;
                    dialect.write_placeholder(&mut out, idx);
                }
            }
        }
        out
    }
}

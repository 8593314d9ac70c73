//! Naming conventions mapping model and field names to tables and columns.

use heck::ToSnakeCase;
use std::fmt;

/// Maps model names to physical table names and fields to column names.
///
/// Explicit overrides (`#[orm(table = "...")]`, `#[orm(column = "...")]`) always win;
/// the strategy is only consulted when no override exists.
pub trait NamingStrategy: fmt::Debug + Send + Sync {
    /// Table name for a model type name, e.g. `Product` -> `products`.
    fn table_name(&self, model_name: &str) -> String;

    /// Column name for a field of `table`.
    fn column_name(&self, table: &str, field: &str) -> String;
}

/// snake_case columns and pluralized snake_case tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCaseNaming;

impl NamingStrategy for SnakeCaseNaming {
    fn table_name(&self, model_name: &str) -> String {
        pluralize(&model_name.to_snake_case())
    }

    fn column_name(&self, _table: &str, field: &str) -> String {
        field.to_snake_case()
    }
}

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

/// Pluralize the last word of a snake_case name.
pub(crate) fn pluralize(name: &str) -> String {
    let (head, word) = match name.rfind('_') {
        Some(i) => name.split_at(i + 1),
        None => ("", name),
    };

    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return name.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return format!("{head}{plural}");
    }

    let plural = match word.strip_suffix('y') {
        Some(stem) if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) => format!("{stem}ies"),
        _ if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) => format!("{word}es"),
        _ => format!("{word}s"),
    };
    format!("{head}{plural}")
}

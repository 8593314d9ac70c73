//! Row mapping traits

use crate::error::{OrmError, OrmResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Trait for converting a database row into a Rust struct.
///
/// This trait should typically be derived using `#[derive(FromRow)]`.
///
/// # Example
///
/// ```ignore
/// use relq::FromRow;
///
/// #[derive(FromRow)]
/// struct Product {
///     id: i64,
///     string: String,
///     int_pointer: Option<i32>,
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> OrmResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning OrmError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> FromSql<'a>;

    /// Get a column selected by a preload, labelled `<alias>__<column>`.
    fn try_get_preloaded<T>(&self, alias: &str, column: &str) -> OrmResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get_column(&preloaded_label(alias, column))
    }
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> OrmResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| OrmError::decode(column, e.to_string()))
    }
}

/// Label of a preloaded column in the result set.
pub fn preloaded_label(alias: &str, column: &str) -> String {
    format!("{alias}__{column}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preloaded_label_joins_alias_and_column() {
        assert_eq!(
            preloaded_label("sales__product", "int"),
            "sales__product__int"
        );
    }
}

//! Derive macros for relq
//!
//! Provides `#[derive(Model)]` and `#[derive(FromRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod from_row;
mod model;

/// Derive `FromRow` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use relq::FromRow;
///
/// #[derive(FromRow)]
/// struct Seller {
///     id: i64,
///     name: String,
///     #[orm(column = "company_ref")]
///     company_id: Option<i64>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(prefix = "dest_")]` - Prepend a prefix to the column name
/// - `#[orm(skip)]` - Not read from the row; filled with `Default::default()`
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Model` metadata for a struct.
///
/// # Example
///
/// ```ignore
/// use relq::Model;
///
/// #[derive(Model)]
/// #[orm(belongs_to(Product, as = "product"))]
/// #[orm(relation(Seller))]
/// struct Sale {
///     id: i64,
///     code: i32,
///     product_id: i64,
///     seller_id: Option<i64>,
/// }
/// ```
///
/// # Generated
///
/// - `impl relq::Model` with a static descriptor
/// - one `Field<Self, T>` const per field, e.g. `Sale::CODE`
/// - one `Relation<Self, Target>` const per relation, e.g. `Sale::PRODUCT`
/// - an `inventory` registration picked up by `RegistryBuilder::from_inventory`
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (default: from the naming strategy)
/// - `#[orm(belongs_to(Target, as = "..", foreign_key = "..", references = ".."))]`
/// - `#[orm(has_one(..))]`, `#[orm(has_many(..))]` - Same keys, foreign key on the target
/// - `#[orm(relation(Target, as = ".."))]` - Direction inferred from the fields
/// - `#[orm(column = "name")]` - Map field to different column name
/// - `#[orm(prefix = "dest_")]` - Prefix the column (fields of an embedded structure)
/// - `#[orm(skip)]` - Not a column
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

//! Attribute parsing for Model derive macro.
//!
//! Handles parsing of struct-level and field-level `#[orm(...)]` attributes.

use syn::{DeriveInput, Result};

/// Helper struct for parsing field attributes
#[derive(Default)]
pub(crate) struct FieldAttr {
    pub column: Option<String>,
    pub prefix: Option<String>,
    pub skip: bool,
}

impl FieldAttr {
    /// Column read and compared for this field: the prefix, then the override or `field`.
    pub fn column_name(&self, field: &str) -> String {
        let column = self.column.as_deref().unwrap_or(field);
        match &self.prefix {
            Some(prefix) => format!("{prefix}{column}"),
            None => column.to_string(),
        }
    }
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        // Parse comma-separated key=value pairs or single identifiers
        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            if ident == "skip" {
                attr.skip = true;
            } else if ident == "column" {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attr.column = Some(value.value());
            } else if ident == "prefix" {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attr.prefix = Some(value.value());
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unknown field attribute `{ident}`"),
                ));
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

/// Extract table name from struct-level `#[orm(table = "...")]` attribute.
pub(super) fn get_table_name(input: &DeriveInput) -> Result<Option<String>> {
    for attr in &input.attrs {
        if attr.path().is_ident("orm") {
            if let Ok(nested) = attr.parse_args::<syn::MetaNameValue>() {
                if !nested.path.is_ident("table") {
                    return Err(syn::Error::new_spanned(
                        &nested.path,
                        "expected table = \"...\"",
                    ));
                }
                if let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(lit),
                    ..
                }) = &nested.value
                {
                    return Ok(Some(lit.value()));
                }
                return Err(syn::Error::new_spanned(
                    &nested.value,
                    "table name must be a string literal",
                ));
            }
        }
    }
    Ok(None)
}

/// Merge every `#[orm(...)]` attribute of a field.
///
/// Supports: `#[orm(column = "name")]`, `#[orm(prefix = "embedded_")]`, `#[orm(skip)]`
pub(crate) fn get_field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();

    for attr in &field.attrs {
        if attr.path().is_ident("orm") {
            let parsed = attr.parse_args::<FieldAttr>()?;
            if parsed.column.is_some() {
                merged.column = parsed.column;
            }
            if parsed.prefix.is_some() {
                merged.prefix = parsed.prefix;
            }
            merged.skip |= parsed.skip;
        }
    }

    Ok(merged)
}

/// Whether `ty` is `Uuid` or `Option<Uuid>` (any path ending in `Uuid`).
pub(crate) fn is_uuid_type(ty: &syn::Type) -> bool {
    let syn::Type::Path(path) = ty else {
        return false;
    };
    let Some(last) = path.path.segments.last() else {
        return false;
    };
    if last.ident == "Uuid" {
        return true;
    }
    if last.ident != "Option" {
        return false;
    }
    match &last.arguments {
        syn::PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| {
            matches!(arg, syn::GenericArgument::Type(inner) if is_uuid_type(inner))
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_uuid_fields() {
        for ty in ["Uuid", "uuid::Uuid", "Option<Uuid>", "std::option::Option<uuid::Uuid>"] {
            let ty: syn::Type = syn::parse_str(ty).unwrap();
            assert!(is_uuid_type(&ty));
        }
        for ty in ["String", "Option<String>", "Vec<Uuid>", "i64"] {
            let ty: syn::Type = syn::parse_str(ty).unwrap();
            assert!(!is_uuid_type(&ty));
        }
    }

    #[test]
    fn prefix_comes_before_the_column() {
        let input: syn::DeriveInput = syn::parse_quote! {
            struct Product {
                #[orm(prefix = "gorm_embedded_", column = "int")]
                embedded_int: i32,
                #[orm(prefix = "gorm_")]
                embedded_float: f64,
                plain: bool,
            }
        };
        let syn::Data::Struct(data) = input.data else {
            panic!("expected a struct");
        };
        let names: Vec<String> = data
            .fields
            .iter()
            .map(|field| {
                let name = field.ident.as_ref().unwrap().to_string();
                get_field_attr(field).unwrap().column_name(&name)
            })
            .collect();
        assert_eq!(names, ["gorm_embedded_int", "gorm_embedded_float", "plain"]);
    }
}

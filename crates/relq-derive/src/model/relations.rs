//! Relation handling for Model derive macro.
//!
//! Parses:
//! - `#[orm(belongs_to(...))]`
//! - `#[orm(has_one(...))]`
//! - `#[orm(has_many(...))]`
//! - `#[orm(relation(...))]` (direction inferred by the registry)

use heck::ToSnakeCase;
use syn::ext::IdentExt;
use syn::{DeriveInput, Result};

/// Which side holds the foreign key, when declared explicitly.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
}

/// A relation declared on the struct.
pub(super) struct RelationAttr {
    /// The related model type (e.g., Product)
    pub model: syn::Path,
    /// `None` for `relation(...)`
    pub kind: Option<RelationKind>,
    /// Relation name, used for the const and for join aliases (e.g., "product")
    pub name: String,
    pub foreign_key: Option<String>,
    pub references: Option<String>,
}

impl syn::parse::Parse for RelationAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let ident: syn::Ident = input.parse()?;
        let kind = match ident.to_string().as_str() {
            "belongs_to" => Some(RelationKind::BelongsTo),
            "has_one" => Some(RelationKind::HasOne),
            "has_many" => Some(RelationKind::HasMany),
            "relation" => None,
            _ => {
                return Err(syn::Error::new(
                    ident.span(),
                    "expected belongs_to, has_one, has_many or relation",
                ));
            }
        };

        let content;
        syn::parenthesized!(content in input);

        let model: syn::Path = content.parse()?;

        let mut name: Option<String> = None;
        let mut foreign_key: Option<String> = None;
        let mut references: Option<String> = None;

        while content.peek(syn::Token![,]) {
            let _: syn::Token![,] = content.parse()?;
            if content.is_empty() {
                break;
            }

            // Use parse_any to handle keywords like 'as'
            let key = syn::Ident::parse_any(&content)?;
            let _: syn::Token![=] = content.parse()?;
            let value: syn::LitStr = content.parse()?;

            if key == "as" || key == "name" {
                name = Some(value.value());
            } else if key == "foreign_key" {
                foreign_key = Some(value.value());
            } else if key == "references" {
                references = Some(value.value());
            } else {
                return Err(syn::Error::new(
                    key.span(),
                    format!("unknown relation key `{key}`"),
                ));
            }
        }

        // Default name: snake_case model name
        let name = match name {
            Some(name) => name,
            None => model
                .segments
                .last()
                .map(|segment| segment.ident.to_string().to_snake_case())
                .ok_or_else(|| syn::Error::new_spanned(&model, "expected a model type"))?,
        };

        Ok(RelationAttr {
            model,
            kind,
            name,
            foreign_key,
            references,
        })
    }
}

/// Parse every relation declared in struct attributes.
///
/// Example: `#[orm(belongs_to(Product, as = "product", foreign_key = "product_id"))]`
pub(super) fn get_relations(input: &DeriveInput) -> Result<Vec<RelationAttr>> {
    let mut relations: Vec<RelationAttr> = Vec::new();

    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let syn::Meta::List(meta_list) = &attr.meta else {
            continue;
        };
        // `table = "..."` is handled by attrs.rs
        if is_name_value(meta_list.tokens.clone()) {
            continue;
        }

        let parsed = syn::parse2::<RelationAttr>(meta_list.tokens.clone())?;
        if relations.iter().any(|r| r.name == parsed.name) {
            return Err(syn::Error::new_spanned(
                attr,
                format!("relation `{}` is declared twice", parsed.name),
            ));
        }
        relations.push(parsed);
    }

    Ok(relations)
}

fn is_name_value(tokens: proc_macro2::TokenStream) -> bool {
    syn::parse2::<syn::MetaNameValue>(tokens).is_ok()
}

//! Model derive macro implementation
//!
//! ## Module Structure
//!
//! - `attrs`: Struct and field attribute parsing
//! - `relations`: belongs_to/has_one/has_many/relation parsing

pub(crate) mod attrs;
mod relations;

use attrs::{get_field_attr, get_table_name, is_uuid_type};
use heck::ToShoutySnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use relations::{RelationKind, get_relations};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Model cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    let table_name = get_table_name(&input)?;
    let relations = get_relations(&input)?;

    let mut descriptors = Vec::with_capacity(fields.len());
    let mut field_consts = Vec::with_capacity(fields.len());

    for field in fields.iter() {
        let attr = get_field_attr(field)?;
        if attr.skip {
            continue;
        }

        let Some(ident) = &field.ident else {
            continue;
        };
        let field_name = ident.unraw().to_string();
        let const_name = format_ident!("{}", field_name.to_shouty_snake_case());
        let ty = &field.ty;

        let column = option_str(attr.column.as_deref());
        let prefix = option_str(attr.prefix.as_deref());
        let uuid = is_uuid_type(ty);
        descriptors.push(quote! {
            ::relq::FieldDescriptor {
                name: #field_name,
                column: #column,
                prefix: #prefix,
                uuid: #uuid,
            }
        });

        let column_override = attr.column.as_ref().map(|column| quote! { .column(#column) });
        let prefixed = attr.prefix.as_ref().map(|prefix| quote! { .prefixed(#prefix) });
        field_consts.push(quote! {
            pub const #const_name: ::relq::Field<#name, #ty> =
                ::relq::Field::new(#field_name) #column_override #prefixed;
        });
    }

    let mut relation_descriptors = Vec::with_capacity(relations.len());
    let mut relation_consts = Vec::with_capacity(relations.len());

    for relation in &relations {
        let target = &relation.model;
        let relation_name = &relation.name;
        let const_name = format_ident!("{}", relation_name.to_shouty_snake_case());

        let kind = match relation.kind {
            Some(RelationKind::BelongsTo) => quote! { Some(::relq::RelationKind::BelongsTo) },
            Some(RelationKind::HasOne) => quote! { Some(::relq::RelationKind::HasOne) },
            Some(RelationKind::HasMany) => quote! { Some(::relq::RelationKind::HasMany) },
            None => quote! { None },
        };
        let foreign_key = option_str(relation.foreign_key.as_deref());
        let references = option_str(relation.references.as_deref());

        relation_descriptors.push(quote! {
            ::relq::RelationDescriptor {
                name: #relation_name,
                target: ::relq::ModelType::of::<#target>,
                kind: #kind,
                foreign_key: #foreign_key,
                references: #references,
            }
        });
        relation_consts.push(quote! {
            pub const #const_name: ::relq::Relation<#name, #target> =
                ::relq::Relation::new(#relation_name);
        });
    }

    let model_name = name.unraw().to_string();
    let table = option_str(table_name.as_deref());

    Ok(quote! {
        impl ::relq::Model for #name {
            fn descriptor() -> &'static ::relq::ModelDescriptor {
                static DESCRIPTOR: ::relq::ModelDescriptor = ::relq::ModelDescriptor {
                    name: #model_name,
                    table: #table,
                    fields: &[#(#descriptors),*],
                    relations: &[#(#relation_descriptors),*],
                };
                &DESCRIPTOR
            }
        }

        impl #name {
            #(#field_consts)*
            #(#relation_consts)*
        }

        ::relq::inventory::submit! {
            ::relq::model::ModelRegistration {
                model_type: ::relq::ModelType::of::<#name>,
            }
        }
    })
}

fn option_str(value: Option<&str>) -> TokenStream {
    match value {
        Some(value) => quote! { Some(#value) },
        None => quote! { None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_str(input: &str) -> Result<String> {
        let input: DeriveInput = syn::parse_str(input)?;
        expand(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn generates_field_and_relation_consts() {
        let out = expand_str(
            r#"
            #[orm(table = "sales")]
            #[orm(belongs_to(Product, as = "product"))]
            struct Sale {
                id: i64,
                #[orm(column = "sale_code")]
                code: i32,
                product_id: i64,
                #[orm(skip)]
                cached: String,
            }
            "#,
        )
        .unwrap();

        assert!(out.contains("pub const CODE : :: relq :: Field < Sale , i32 >"));
        assert!(out.contains(". column (\"sale_code\")"));
        assert!(out.contains("pub const PRODUCT : :: relq :: Relation < Sale , Product >"));
        assert!(out.contains("table : Some (\"sales\")"));
        assert!(out.contains(":: relq :: RelationKind :: BelongsTo"));
        assert!(!out.contains("CACHED"));
    }

    #[test]
    fn records_prefix_and_uuid() {
        let out = expand_str(
            r#"
            struct Shipment {
                id: i64,
                tracking: uuid::Uuid,
                #[orm(prefix = "dest_")]
                city: String,
            }
            "#,
        )
        .unwrap();

        assert!(out.contains("name : \"tracking\" , column : None , prefix : None , uuid : true"));
        assert!(out.contains("name : \"city\" , column : None , prefix : Some (\"dest_\") , uuid : false"));
        assert!(out.contains(". prefixed (\"dest_\")"));
    }

    #[test]
    fn rejects_generic_structs() {
        let err = expand_str("struct Wrapper<T> { inner: T }").unwrap_err();
        assert!(err.to_string().contains("generic"));
    }

    #[test]
    fn rejects_duplicate_relations() {
        let err = expand_str(
            r#"
            #[orm(relation(Product))]
            #[orm(has_one(Product))]
            struct Sale { id: i64 }
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }
}

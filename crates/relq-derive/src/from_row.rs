//! FromRow derive macro implementation

use crate::model::attrs::get_field_attr;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "FromRow can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "FromRow can only be derived for structs",
            ));
        }
    };

    let mut field_extracts = Vec::with_capacity(fields.len());
    for field in fields.iter() {
        let Some(field_name) = &field.ident else {
            continue;
        };
        let attr = get_field_attr(field)?;

        if attr.skip {
            field_extracts.push(quote! {
                #field_name: ::core::default::Default::default()
            });
            continue;
        }

        let column_name = attr.column_name(&field_name.unraw().to_string());
        field_extracts.push(quote! {
            #field_name: row.try_get_column(#column_name)?
        });
    }

    Ok(quote! {
        impl #impl_generics ::relq::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &::relq::tokio_postgres::Row) -> ::relq::OrmResult<Self> {
                use ::relq::RowExt;
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}

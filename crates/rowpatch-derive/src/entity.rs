//! Entity derive macro implementation

mod attrs;

use heck::{ToShoutySnakeCase, ToSnakeCase};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let struct_attr = attrs::struct_attr(&input.attrs)?;
    let table = struct_attr
        .table
        .unwrap_or_else(|| name.to_string().to_snake_case());
    let schema = match &struct_attr.schema {
        Some(schema) => quote! { ::core::option::Option::Some(#schema) },
        None => quote! { ::core::option::Option::None },
    };

    let mut columns = Vec::new();
    let mut mappings = Vec::new();
    let mut value_arms = Vec::new();
    let mut col_consts = Vec::new();
    let mut identity: Option<String> = None;

    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let attr = attrs::field_attr(&field.attrs)?;
        if attr.skip {
            if attr.is_id {
                return Err(syn::Error::new_spanned(
                    field,
                    "#[orm(id)] field cannot also be #[orm(skip)]",
                ));
            }
            continue;
        }

        let property = field_ident.to_string();
        let property = property.strip_prefix("r#").unwrap_or(&property).to_string();

        if attr.is_id {
            if identity.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field can be marked #[orm(id)]",
                ));
            }
            identity = Some(property.clone());
        }
        if let Some(column) = &attr.column {
            mappings.push(quote! { (#property, #column) });
        }

        let const_name = format_ident!("COL_{}", property.to_shouty_snake_case());
        col_consts.push(quote! {
            pub const #const_name: &'static str = #property;
        });
        value_arms.push(quote! {
            #property => ::core::option::Option::Some(
                ::rowpatch::Value::from(::core::clone::Clone::clone(&self.#field_ident))
            ),
        });
        columns.push(property);
    }

    let identity = match identity {
        Some(id) => quote! { ::core::option::Option::Some(#id) },
        None => quote! { ::core::option::Option::None },
    };

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            #(#col_consts)*
        }

        impl #impl_generics ::rowpatch::Entity for #name #ty_generics #where_clause {
            const TABLE: &'static str = #table;
            const SCHEMA: ::core::option::Option<&'static str> = #schema;
            const IDENTITY: ::core::option::Option<&'static str> = #identity;
            const COLUMNS: &'static [&'static str] = &[#(#columns),*];
            const COLUMN_MAPPINGS: &'static [(&'static str, &'static str)] = &[#(#mappings),*];

            fn column_value(&self, column: &str) -> ::core::option::Option<::rowpatch::Value> {
                match column {
                    #(#value_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

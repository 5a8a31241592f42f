//! `#[orm(...)]` attribute parsing.

use syn::{Attribute, Result};

/// Struct-level `#[orm(table = "...", schema = "...")]`.
#[derive(Default)]
pub(super) struct StructAttr {
    pub table: Option<String>,
    pub schema: Option<String>,
}

/// Field-level `#[orm(id, column = "...", skip)]`.
#[derive(Default)]
pub(super) struct FieldAttr {
    pub is_id: bool,
    pub skip: bool,
    pub column: Option<String>,
}

impl syn::parse::Parse for StructAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = StructAttr::default();
        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            let _: syn::Token![=] = input.parse()?;
            let value: syn::LitStr = input.parse()?;
            if key == "table" {
                attr.table = Some(value.value());
            } else if key == "schema" {
                attr.schema = Some(value.value());
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "expected `table` or `schema`",
                ));
            }
            if !input.is_empty() {
                let _: syn::Token![,] = input.parse()?;
            }
        }
        Ok(attr)
    }
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();
        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            if key == "id" {
                attr.is_id = true;
            } else if key == "skip" {
                attr.skip = true;
            } else if key == "column" {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attr.column = Some(value.value());
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "expected `id`, `skip` or `column`",
                ));
            }
            if !input.is_empty() {
                let _: syn::Token![,] = input.parse()?;
            }
        }
        Ok(attr)
    }
}

/// Merge every `#[orm(...)]` on an item into one value.
pub(super) fn parse_orm<T>(attrs: &[Attribute], merge: impl Fn(&mut T, T)) -> Result<T>
where
    T: syn::parse::Parse + Default,
{
    let mut out = T::default();
    for attr in attrs {
        if attr.path().is_ident("orm") {
            let parsed: T = attr.parse_args()?;
            merge(&mut out, parsed);
        }
    }
    Ok(out)
}

pub(super) fn struct_attr(attrs: &[Attribute]) -> Result<StructAttr> {
    parse_orm(attrs, |out: &mut StructAttr, next| {
        out.table = next.table.or(out.table.take());
        out.schema = next.schema.or(out.schema.take());
    })
}

pub(super) fn field_attr(attrs: &[Attribute]) -> Result<FieldAttr> {
    parse_orm(attrs, |out: &mut FieldAttr, next| {
        out.is_id |= next.is_id;
        out.skip |= next.skip;
        out.column = next.column.or(out.column.take());
    })
}

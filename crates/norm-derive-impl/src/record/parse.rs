// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Parsing of `#[derive(Record)]` input.
//!
//! Struct attributes go through darling; field tags are plain
//! `#[norm = "..."]` name-value attributes and are read directly.

use darling::FromDeriveInput;
use syn::{Attribute, DeriveInput, Expr, ExprLit, Ident, Lit, Meta, Type, ext::IdentExt};

/// Struct-level attributes parsed from `#[norm(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(norm), supports(struct_named))]
struct RecordAttrs {
    ident: Ident,

    generics: syn::Generics,

    /// Explicit table name.
    #[darling(default)]
    table: Option<String>
}

/// One persisted field.
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier as written.
    pub ident: Ident,

    /// Field type.
    pub ty: Type,

    /// Raw tag text.
    pub tag: Option<String>
}

impl FieldDef {
    /// Declared name without the `r#` prefix.
    pub fn name(&self) -> String {
        self.ident.unraw().to_string()
    }
}

/// Complete record definition.
#[derive(Debug)]
pub struct RecordDef {
    /// Struct identifier.
    pub ident: Ident,

    /// Explicit table name.
    pub table: Option<String>,

    /// Persisted fields in declaration order; `-` fields are dropped.
    pub fields: Vec<FieldDef>
}

impl RecordDef {
    /// Parse a record from derive input.
    ///
    /// # Errors
    ///
    /// - applied to an enum, union, tuple or unit struct
    /// - generic parameters
    /// - empty `table`
    /// - a field tag that is not a string, or more than one tag per field
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = RecordAttrs::from_derive_input(input)?;

        if !attrs.generics.params.is_empty() {
            return Err(
                darling::Error::custom("Record cannot be derived for generic structs")
                    .with_span(&attrs.generics)
            );
        }
        if attrs.table.as_deref().is_some_and(str::is_empty) {
            return Err(darling::Error::custom("`table` must not be empty").with_span(&input.ident));
        }

        let named = match &input.data {
            syn::Data::Struct(syn::DataStruct {
                fields: syn::Fields::Named(named),
                ..
            }) => named,
            _ => {
                return Err(darling::Error::custom("Record requires named fields")
                    .with_span(&input.ident));
            }
        };

        let mut errors = darling::Error::accumulator();
        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let Some(tag) = errors.handle(parse_tag(&field.attrs)) else {
                continue;
            };
            if tag.as_deref().map(str::trim) == Some("-") {
                continue;
            }
            if let Some(ident) = &field.ident {
                fields.push(FieldDef {
                    ident: ident.clone(),
                    ty: field.ty.clone(),
                    tag
                });
            }
        }
        errors.finish()?;

        Ok(Self {
            ident: attrs.ident,
            table: attrs.table,
            fields
        })
    }
}

/// Read the `#[norm = "..."]` tag of a field.
fn parse_tag(attrs: &[Attribute]) -> darling::Result<Option<String>> {
    let mut tag: Option<String> = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident("norm")) {
        let Meta::NameValue(meta) = &attr.meta else {
            return Err(darling::Error::custom(
                "expected a field tag: #[norm = \"column,option,key=value\"]"
            )
            .with_span(attr));
        };
        let Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) = &meta.value
        else {
            return Err(darling::Error::custom("field tag must be a string literal")
                .with_span(&meta.value));
        };
        if tag.is_some() {
            return Err(darling::Error::custom("duplicate #[norm] tag").with_span(attr));
        }
        tag = Some(value.value());
    }

    Ok(tag)
}

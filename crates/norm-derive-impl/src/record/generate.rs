// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `impl ::norm::Record` generation.
//!
//! For
//!
//! ```rust,ignore
//! #[derive(Record)]
//! struct User {
//!     #[norm = ",pk"]
//!     id: i64,
//! }
//! ```
//!
//! the output is, in short:
//!
//! ```rust,ignore
//! impl ::norm::Record for User {
//!     const TYPE_NAME: &'static str = "User";
//!     const TABLE: Option<&'static str> = None;
//!
//!     fn fields() -> &'static [::norm::FieldDescriptor] {
//!         const FIELDS: &[::norm::FieldDescriptor] = &[
//!             ::norm::FieldDescriptor::new("id", Some(",pk"), <i64 as ::norm::ColumnType>::TYPE)
//!         ];
//!         FIELDS
//!     }
//!
//!     fn get(&self, field: &str) -> Option<::norm::Value> {
//!         match field {
//!             "id" => Some(::norm::ColumnType::to_value(&self.id)),
//!             _ => None
//!         }
//!     }
//!     // set, set_json: same dispatch
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::RecordDef;

/// Generate the `Record` impl.
pub fn generate(record: &RecordDef) -> TokenStream {
    let ident = &record.ident;
    let type_name = ident.to_string();
    let table = match &record.table {
        Some(table) => quote! { ::core::option::Option::Some(#table) },
        None => quote! { ::core::option::Option::None }
    };

    let names = record.fields.iter().map(|f| f.name()).collect::<Vec<_>>();
    let idents = record.fields.iter().map(|f| &f.ident).collect::<Vec<_>>();
    let descriptors = record.fields.iter().map(|f| {
        let name = f.name();
        let ty = &f.ty;
        let tag = match &f.tag {
            Some(tag) => quote! { ::core::option::Option::Some(#tag) },
            None => quote! { ::core::option::Option::None }
        };
        quote! {
            ::norm::FieldDescriptor::new(#name, #tag, <#ty as ::norm::ColumnType>::TYPE)
        }
    });

    quote! {
        #[automatically_derived]
        impl ::norm::Record for #ident {
            const TYPE_NAME: &'static str = #type_name;
            const TABLE: ::core::option::Option<&'static str> = #table;

            fn fields() -> &'static [::norm::FieldDescriptor] {
                const FIELDS: &[::norm::FieldDescriptor] = &[#(#descriptors),*];
                FIELDS
            }

            fn get(&self, field: &str) -> ::core::option::Option<::norm::Value> {
                match field {
                    #(#names => ::core::option::Option::Some(
                        ::norm::ColumnType::to_value(&self.#idents)
                    ),)*
                    _ => ::core::option::Option::None
                }
            }

            #[allow(unused_variables)]
            fn set(
                &mut self,
                field: &str,
                value: ::norm::Value
            ) -> ::core::result::Result<(), ::norm::ConversionError> {
                match field {
                    #(#names => self.#idents = ::norm::ColumnType::from_value(value)?,)*
                    _ => return ::core::result::Result::Err(
                        ::norm::ConversionError::unknown_field(field)
                    )
                }
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn set_json(
                &mut self,
                field: &str,
                value: ::norm::__private::JsonValue
            ) -> ::core::result::Result<::norm::Value, ::norm::ConversionError> {
                match field {
                    #(#names => {
                        self.#idents = ::norm::ColumnType::from_json(value)?;
                        ::core::result::Result::Ok(::norm::ColumnType::to_value(&self.#idents))
                    })*
                    _ => ::core::result::Result::Err(::norm::ConversionError::unknown_field(field))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::*;

    fn expand(input: DeriveInput) -> String {
        generate(&RecordDef::from_derive_input(&input).unwrap()).to_string()
    }

    #[test]
    fn descriptors_carry_tags() {
        let out = expand(parse_quote! {
            struct User {
                #[norm = ",pk"]
                id: i64,
                name: String,
            }
        });
        assert!(out.contains("FieldDescriptor :: new (\"id\" , :: core :: option :: Option :: Some (\",pk\")"));
        assert!(out.contains("FieldDescriptor :: new (\"name\" , :: core :: option :: Option :: None"));
        assert!(out.contains("const TYPE_NAME : & 'static str = \"User\""));
    }

    #[test]
    fn table_constant() {
        let out = expand(parse_quote! {
            #[norm(table = "people")]
            struct User { id: i64 }
        });
        assert!(out.contains("const TABLE : :: core :: option :: Option < & 'static str > = :: core :: option :: Option :: Some (\"people\")"));
    }

    #[test]
    fn excluded_fields_are_not_generated() {
        let out = expand(parse_quote! {
            struct User {
                id: i64,
                #[norm = "-"]
                session: Session,
            }
        });
        assert!(!out.contains("session"));
        assert!(!out.contains("Session"));
    }

    #[test]
    fn raw_identifier_keeps_raw_access() {
        let out = expand(parse_quote! {
            struct Item { r#type: String }
        });
        assert!(out.contains("\"type\""));
        assert!(out.contains("self . r#type"));
    }
}

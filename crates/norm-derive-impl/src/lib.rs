// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Proc-macro implementation of `#[derive(Record)]`.
//!
//! Use the `norm` crate, which re-exports the macro next to the runtime
//! types the generated code refers to.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod record;

use proc_macro::TokenStream;

/// Derive `norm::Record` for a struct with named fields.
///
/// # Struct Attributes
///
/// | Attribute | Default | Description |
/// |-----------|---------|-------------|
/// | `#[norm(table = "...")]` | snake_case of the struct name | Table name |
///
/// # Field Tags
///
/// Each field may carry one `#[norm = "..."]` tag: a comma-separated list
/// whose first entry, when it has no `=`, is the column name.
///
/// | Tag | Description |
/// |-----|-------------|
/// | *(none)* | Column is the snake_case field name |
/// | `"-"` | Not persisted; the field type needs no `ColumnType` impl |
/// | `"name"` | Column name |
/// | `",pk"` | Part of the primary key |
/// | `",unique"` | Unique constraint |
/// | `",notnull"` | `NOT NULL` |
/// | `",default=now()"` | Column default |
/// | `",dbType=uuid"` | Explicit column type |
/// | `",nocreate"` / `",noupdate"` | Ignored by insert / update payloads |
/// | `",fk=users"` | Referenced table |
///
/// Every persisted field type must implement `norm::ColumnType`.
///
/// # Example
///
/// ```rust,ignore
/// use norm::Record;
///
/// #[derive(Record, Default)]
/// #[norm(table = "users")]
/// pub struct User {
///     #[norm = ",pk,nocreate,noupdate"]
///     pub id: i64,
///
///     #[norm = "user_name,notnull"]
///     pub name: String,
///
///     pub email: Option<String>,
///
///     #[norm = "-"]
///     pub session: Option<Session>,
/// }
/// ```
///
/// # Errors
///
/// Compile errors for enums, unions, tuple and unit structs, generic
/// structs, and malformed or repeated field tags.
#[proc_macro_derive(Record, attributes(norm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive(input)
}

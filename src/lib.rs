// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Tag-driven record mapping for PostgreSQL.
//!
//! Derive [`Record`] on a struct, register it with a [`Norm`] registry, and
//! let its [`Model`] write the SQL:
//!
//! ```rust
//! use norm::{Norm, Record};
//! use serde_json::json;
//!
//! #[derive(Record, Default)]
//! #[norm(table = "users")]
//! struct User {
//!     #[norm = ",pk,nocreate,noupdate"]
//!     id: i64,
//!     #[norm = ",notnull"]
//!     name: String,
//!     age: i32,
//! }
//!
//! let norm = Norm::default();
//! let users = norm.model::<User>()?;
//!
//! let filter = json!({"age": {"gte": 18}, "name": ["ann", "bob"]});
//! let conditions = users.build_conditions(filter.as_object().unwrap(), "");
//! assert_eq!(conditions.where_clause(), "age >= $1 AND name IN ($2, $3)");
//!
//! let mut user = User::default();
//! let insert = users.insert_sql(&mut user, br#"{"name": "ann", "age": 30}"#, "id")?;
//! assert_eq!(insert.sql, "INSERT INTO users (name, age) VALUES ($1, $2) RETURNING id");
//! assert_eq!(user.age, 30);
//! # Ok::<(), norm::NormError>(())
//! ```
//!
//! # Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `norm-core` | models, conditions, CRUD and DDL generation |
//! | `norm-derive-impl` | `#[derive(Record)]` |
//!
//! # Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `postgres` | bind [`Value`]s onto sqlx queries and decode `PgRow`s |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub use norm_core::*;
pub use norm_derive_impl::Record;

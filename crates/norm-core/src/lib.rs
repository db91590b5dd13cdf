// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Core types for norm.
//!
//! norm maps tagged records to PostgreSQL tables and synthesizes
//! parameterized statements for them. This crate holds everything except the
//! derive macro; most users depend on `norm`, which re-exports it.
//!
//! # Overview
//!
//! - [`Record`]: self-description of a struct, usually derived
//! - [`Model`]: cached field and table metadata of one record type
//! - [`Norm`]: caller-owned registry of models
//! - [`ConditionBuilder`]: WHERE predicates from JSON filters
//! - [`Statement`]: SQL text plus ordered [`Value`] binds
//! - [`prelude`]: convenient re-exports
//!
//! # Pipeline
//!
//! ```text
//! #[derive(Record)] ──► Model::parse ──► Norm cache
//!                                          │
//!        ┌──────────────┬──────────────────┼──────────────────┐
//!        ▼              ▼                  ▼                  ▼
//!   build_conditions  insert_sql      read_sql/update_sql   migrate
//!        │              │                  │                  │
//!        ▼              ▼                  ▼                  ▼
//!   fragments+binds  Statement       SelectStatement      DDL strings
//! ```
//!
//! All generated SQL uses `$N` placeholders numbered from 1; the n-th bind
//! belongs to `$n`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod condition;
mod config;
mod crud;
mod error;
mod field;
mod migrate;
mod model;
#[cfg(feature = "postgres")]
mod postgres;
pub mod prelude;
mod record;
mod registry;
mod sql;
pub mod tag;
mod types;
mod value;

pub use condition::{ConditionBuilder, Conditions};
pub use config::{Config, UnsupportedTypes};
pub use crud::{SelectStatement, Statement};
pub use error::{ConversionError, NormError, Result};
pub use field::Field;
pub use migrate::{LIVE_COLUMNS_SQL, LiveColumn, PostgresTypeMapper, TypeMapper};
pub use model::{Model, ScanPlan};
#[cfg(feature = "postgres")]
#[cfg_attr(docsrs, doc(cfg(feature = "postgres")))]
pub use postgres::{PgQuery, bind_typed, bind_values, type_info};
pub use record::{FieldDescriptor, Record};
pub use registry::{Norm, RecordSet};
pub use sql::{binds, rewrite_placeholders};
pub use types::{ColumnKind, ColumnType, Primitive, TypeInfo};
pub use value::Value;

/// Paths used by `#[derive(Record)]` output.
#[doc(hidden)]
pub mod __private {
    pub use serde_json::Value as JsonValue;
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column type mapping for DDL generation.
//!
//! # Type Mapping Table
//!
//! | Field | PostgreSQL type |
//! |-------|-----------------|
//! | any field tagged `dbType=<t>` | `<t>` |
//! | `String` | [`Config::default_string`] (`text` unless configured) |
//! | `DateTime<Utc>` | `timestamp with time zone` |
//! | `NaiveDateTime` | `timestamp` |
//! | `NaiveDate` | `date` |
//! | `i64` | `bigint` |
//! | `i32` | `integer` |
//! | `bool` | `boolean` |
//! | `Option<T>` | as `T` |
//!
//! Anything else has no mapping and needs a `dbType` tag.

use crate::{ColumnKind, Config, Field, Primitive, tag};

/// Maps a field to its SQL column type.
///
/// Implement this for a dialect or to widen the type table.
pub trait TypeMapper {
    /// Column type of `field`, or `None` when the type has no mapping.
    fn map_type(&self, field: &Field, config: &Config) -> Option<String>;
}

/// PostgreSQL type mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresTypeMapper;

impl TypeMapper for PostgresTypeMapper {
    fn map_type(&self, field: &Field, config: &Config) -> Option<String> {
        if let Some(explicit) = field.tag_value(tag::DB_TYPE).filter(|t| !t.is_empty()) {
            return Some(explicit.to_string());
        }

        let name = match (field.kind(), field.ty().primitive) {
            (ColumnKind::Text, _) => return Some(config.default_string.clone()),
            (_, Primitive::TimestampTz) => "timestamp with time zone",
            (_, Primitive::Timestamp) => "timestamp",
            (_, Primitive::Date) => "date",
            (_, Primitive::I64) => "bigint",
            (_, Primitive::I32) => "integer",
            (_, Primitive::Bool) => "boolean",
            _ => return None
        };
        Some(name.to_string())
    }
}

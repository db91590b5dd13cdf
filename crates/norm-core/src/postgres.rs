// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! sqlx glue, enabled with the `postgres` feature.
//!
//! ```rust,ignore
//! let select = model.read_sql("id=?");
//! let row = select.query([Value::Int(7)]).fetch_one(&pool).await?;
//! let mut user = User::default();
//! model.scan_row(&mut user, &select.plan, &row)?;
//! ```

use sqlx::{
    Decode, Postgres, Row, Type,
    postgres::{PgArguments, PgRow, PgTypeInfo},
    query::Query
};

use crate::{
    ColumnType, Model, NormError, Primitive, Record, Result, ScanPlan, SelectStatement, Statement,
    Value
};

/// Query type produced by this module.
pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Expands `$body` once per primitive with `$t` naming the Rust type sqlx
/// binds and decodes it as.
///
/// | Primitive | Rust type | PostgreSQL |
/// |-----------|-----------|------------|
/// | `Text` | `String` | `text` |
/// | `I8` | `i8` | `"char"` |
/// | `I16`, `U8` | `i16` | `smallint` |
/// | `I32`, `U16` | `i32` | `integer` |
/// | `I64`, `U32` | `i64` | `bigint` |
/// | `F32` | `f32` | `real` |
/// | `F64` | `f64` | `double precision` |
/// | `Bool` | `bool` | `boolean` |
/// | `TimestampTz` | `DateTime<Utc>` | `timestamp with time zone` |
/// | `Timestamp` | `NaiveDateTime` | `timestamp` |
/// | `Date` | `NaiveDate` | `date` |
/// | `Json`, `JsonMap` | `serde_json::Value` | `jsonb` |
/// | `Bytes` | `Vec<u8>` | `bytea` |
macro_rules! with_sql_type {
    ($primitive:expr, $t:ident => $body:expr) => {
        match $primitive {
            Primitive::Text => {
                type $t = String;
                $body
            }
            Primitive::I8 => {
                type $t = i8;
                $body
            }
            Primitive::I16 | Primitive::U8 => {
                type $t = i16;
                $body
            }
            Primitive::I32 | Primitive::U16 => {
                type $t = i32;
                $body
            }
            Primitive::I64 | Primitive::U32 => {
                type $t = i64;
                $body
            }
            Primitive::F32 => {
                type $t = f32;
                $body
            }
            Primitive::F64 => {
                type $t = f64;
                $body
            }
            Primitive::Bool => {
                type $t = bool;
                $body
            }
            Primitive::TimestampTz => {
                type $t = chrono::DateTime<chrono::Utc>;
                $body
            }
            Primitive::Timestamp => {
                type $t = chrono::NaiveDateTime;
                $body
            }
            Primitive::Date => {
                type $t = chrono::NaiveDate;
                $body
            }
            Primitive::Json | Primitive::JsonMap => {
                type $t = serde_json::Value;
                $body
            }
            Primitive::Bytes => {
                type $t = Vec<u8>;
                $body
            }
        }
    };
}

/// PostgreSQL type a `primitive` field is bound and decoded as.
#[must_use]
pub fn type_info(primitive: Primitive) -> PgTypeInfo {
    with_sql_type!(primitive, T => <T as Type<Postgres>>::type_info())
}

/// Bind `values` in order.
///
/// `NULL` is sent as a text parameter. Use [`bind_typed`] when the field
/// types are known.
pub fn bind_values<'q>(query: PgQuery<'q>, values: impl IntoIterator<Item = Value>) -> PgQuery<'q> {
    values
        .into_iter()
        .fold(query, |query, value| bind_value(query, value, None))
}

/// Bind `values` in order, sending each `NULL` with the SQL type of its
/// primitive.
pub fn bind_typed<'q>(
    query: PgQuery<'q>,
    values: impl IntoIterator<Item = (Value, Primitive)>
) -> PgQuery<'q> {
    values
        .into_iter()
        .fold(query, |query, (value, primitive)| bind_value(query, value, Some(primitive)))
}

fn bind_value(query: PgQuery<'_>, value: Value, primitive: Option<Primitive>) -> PgQuery<'_> {
    match value {
        Value::Null => match primitive {
            Some(primitive) => with_sql_type!(primitive, T => query.bind(None::<T>)),
            None => query.bind(None::<String>)
        },
        Value::Bool(b) => query.bind(b),
        Value::Int(i) => query.bind(i),
        Value::Float(f) => query.bind(f),
        Value::Text(s) => query.bind(s),
        Value::Timestamp(t) => query.bind(t),
        Value::DateTime(t) => query.bind(t),
        Value::Date(d) => query.bind(d),
        Value::Json(j) => query.bind(j),
        Value::Bytes(b) => query.bind(b)
    }
}

impl Statement {
    /// Binds in placeholder order with their field types, followed by
    /// `extra` with no type.
    fn typed_binds(
        &self,
        extra: impl IntoIterator<Item = Value>
    ) -> impl Iterator<Item = (Value, Option<Primitive>)> {
        let types = self.types.iter().copied().chain(std::iter::repeat(None));
        self.binds
            .iter()
            .cloned()
            .zip(types)
            .chain(extra.into_iter().map(|value| (value, None)))
    }

    /// sqlx query with the statement's binds followed by `extra`, e.g. the
    /// WHERE values of an UPDATE.
    ///
    /// A `NULL` from the payload is sent with its field's SQL type.
    pub fn query(&self, extra: impl IntoIterator<Item = Value>) -> PgQuery<'_> {
        self.typed_binds(extra)
            .fold(sqlx::query(&self.sql), |query, (value, primitive)| {
                bind_value(query, value, primitive)
            })
    }
}

impl SelectStatement {
    /// sqlx query with the WHERE values bound.
    pub fn query(&self, binds: impl IntoIterator<Item = Value>) -> PgQuery<'_> {
        bind_values(sqlx::query(&self.sql), binds)
    }
}

fn get<'r, T>(row: &'r PgRow, index: usize) -> std::result::Result<Option<T>, sqlx::Error>
where
    T: Decode<'r, Postgres> + Type<Postgres>
{
    row.try_get::<Option<T>, _>(index)
}

fn decode(row: &PgRow, index: usize, primitive: Primitive) -> std::result::Result<Value, sqlx::Error> {
    let value = with_sql_type!(primitive, T => get::<T>(row, index)?.map(|v| v.to_value()));
    Ok(value.unwrap_or(Value::Null))
}

impl Model {
    /// Field type behind each column of `plan`.
    ///
    /// # Errors
    ///
    /// [`NormError::UnknownField`] when `plan` was built by another model.
    pub fn plan_types(&self, plan: &ScanPlan) -> Result<Vec<Primitive>> {
        plan.targets()
            .iter()
            .map(|target| {
                self.field_by_any_name(target)
                    .map(|field| field.ty().primitive)
                    .ok_or_else(|| NormError::UnknownField((*target).to_string()))
            })
            .collect()
    }

    /// Decode `row`, selected with `plan`, into bind values.
    ///
    /// # Errors
    ///
    /// [`NormError::UnknownField`] as for [`plan_types`](Self::plan_types),
    /// [`NormError::Database`] when a column cannot be decoded as its
    /// field's type.
    pub fn row_values(&self, plan: &ScanPlan, row: &PgRow) -> Result<Vec<Value>> {
        self.plan_types(plan)?
            .into_iter()
            .enumerate()
            .map(|(index, primitive)| Ok(decode(row, index, primitive)?))
            .collect()
    }

    /// Decode `row` and assign it to `obj`.
    ///
    /// # Errors
    ///
    /// See [`row_values`](Self::row_values) and
    /// [`scan_obj`](Self::scan_obj).
    pub fn scan_row<T: Record>(&self, obj: &mut T, plan: &ScanPlan, row: &PgRow) -> Result<()> {
        let values = self.row_values(plan, row)?;
        self.scan_obj(obj, plan, values)
    }
}

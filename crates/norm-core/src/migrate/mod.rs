// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Table creation and additive migrations.
//!
//! # Flow
//!
//! ```text
//! live columns ──► empty? ──yes──► [CREATE TABLE IF NOT EXISTS ...]
//!                    │
//!                    no
//!                    ▼
//!        ALTER TABLE t ADD <column>          one per missing field
//!        ALTER TABLE t ADD CONSTRAINT t_pkey PRIMARY KEY(...)
//!        ALTER TABLE t ADD CONSTRAINT unique_t_c UNIQUE(c)
//! ```
//!
//! Only additions are generated. Dropped or retyped columns are left alone.
//!
//! Live columns are usually read with [`LIVE_COLUMNS_SQL`]:
//!
//! ```rust,ignore
//! let live: Vec<LiveColumn> = sqlx::query_as(LIVE_COLUMNS_SQL)
//!     .bind(model.table())
//!     .fetch_all(&pool)
//!     .await?;
//! for sql in model.migrate_columns(&live)? {
//!     sqlx::query(&sql).execute(&pool).await?;
//! }
//! ```

mod types;

use serde::{Deserialize, Serialize};
pub use types::{PostgresTypeMapper, TypeMapper};

use crate::{Field, Model, NormError, Result, UnsupportedTypes, tag};

/// Columns of one table, in ordinal order; `$1` is the table name.
pub const LIVE_COLUMNS_SQL: &str = "SELECT column_name, is_nullable, data_type \
     FROM information_schema.columns WHERE table_name = $1 ORDER BY ordinal_position";

/// One row of [`LIVE_COLUMNS_SQL`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct LiveColumn {
    /// Column name.
    #[serde(rename = "column_name")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "column_name"))]
    pub name: String,

    /// `YES` or `NO`.
    pub is_nullable: String,

    /// Column type as reported by the catalog.
    pub data_type: String
}

impl LiveColumn {
    /// Whether the column accepts `NULL`.
    #[must_use]
    pub fn nullable(&self) -> bool {
        self.is_nullable.eq_ignore_ascii_case("yes")
    }
}

/// Column definitions plus the constraints they require.
struct Ddl<'m> {
    columns: Vec<String>,
    pk:      Vec<&'m str>,
    unique:  Vec<&'m str>
}

impl Model {
    /// `CREATE TABLE IF NOT EXISTS` with PostgreSQL column types.
    ///
    /// # Errors
    ///
    /// [`NormError::UnsupportedType`] when a field type has no mapping and
    /// the registry is configured with [`UnsupportedTypes::Strict`].
    pub fn create_table_sql(&self) -> Result<String> {
        self.create_table_sql_with(&PostgresTypeMapper)
    }

    /// [`create_table_sql`](Self::create_table_sql) with a custom mapper.
    ///
    /// # Errors
    ///
    /// See [`create_table_sql`](Self::create_table_sql).
    pub fn create_table_sql_with(&self, mapper: &impl TypeMapper) -> Result<String> {
        let Ddl {
            mut columns,
            pk,
            unique
        } = self.ddl(self.fields().iter(), mapper)?;

        if !pk.is_empty() {
            columns.push(self.pk_constraint(&pk));
        }
        columns.extend(unique.iter().map(|c| self.unique_constraint(c)));

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n\t{}\n)",
            self.table(),
            columns.join(",\n\t")
        );
        tracing::debug!(table = self.table(), sql = %sql, "norm.ddl");
        Ok(sql)
    }

    /// Statements bringing a table with the `live` columns up to this model.
    ///
    /// An empty `live` list means the table does not exist: the result is
    /// exactly `[create_table_sql()]`.
    ///
    /// # Errors
    ///
    /// See [`create_table_sql`](Self::create_table_sql).
    pub fn migrate<S: AsRef<str>>(&self, live: &[S]) -> Result<Vec<String>> {
        self.migrate_with(live, &PostgresTypeMapper)
    }

    /// [`migrate`](Self::migrate) with a custom mapper; column types match
    /// [`create_table_sql_with`](Self::create_table_sql_with) for the same
    /// mapper.
    ///
    /// # Errors
    ///
    /// See [`create_table_sql`](Self::create_table_sql).
    pub fn migrate_with<S: AsRef<str>>(
        &self,
        live: &[S],
        mapper: &impl TypeMapper
    ) -> Result<Vec<String>> {
        if live.is_empty() {
            return Ok(vec![self.create_table_sql_with(mapper)?]);
        }

        let missing = self
            .fields()
            .iter()
            .filter(|f| !live.iter().any(|c| c.as_ref() == f.db_name()));
        let Ddl {
            columns,
            pk,
            unique
        } = self.ddl(missing, mapper)?;

        let table = self.table();
        let mut statements = columns
            .iter()
            .map(|c| format!("ALTER TABLE {table} ADD {c}"))
            .collect::<Vec<_>>();
        if !pk.is_empty() {
            statements.push(format!("ALTER TABLE {table} ADD {}", self.pk_constraint(&pk)));
        }
        statements.extend(
            unique
                .iter()
                .map(|c| format!("ALTER TABLE {table} ADD {}", self.unique_constraint(c)))
        );

        tracing::debug!(table, statements = statements.len(), "norm.migrate");
        Ok(statements)
    }

    /// [`migrate`](Self::migrate) from catalog rows.
    ///
    /// # Errors
    ///
    /// See [`create_table_sql`](Self::create_table_sql).
    pub fn migrate_columns(&self, live: &[LiveColumn]) -> Result<Vec<String>> {
        let names = live.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
        self.migrate(names.as_slice())
    }

    fn ddl<'m>(
        &'m self,
        fields: impl Iterator<Item = &'m Field>,
        mapper: &impl TypeMapper
    ) -> Result<Ddl<'m>> {
        let mut ddl = Ddl {
            columns: Vec::new(),
            pk:      Vec::new(),
            unique:  Vec::new()
        };

        for field in fields {
            ddl.columns.push(self.column_def(field, mapper)?);
            if field.is_pk() {
                ddl.pk.push(field.db_name());
            }
            if field.is_unique() {
                ddl.unique.push(field.db_name());
            }
        }
        Ok(ddl)
    }

    fn column_def(&self, field: &Field, mapper: &impl TypeMapper) -> Result<String> {
        let rust_type = field.ty().primitive.rust_name();
        let db_type = match mapper.map_type(field, self.config()) {
            Some(db_type) => db_type,
            None if self.config().unsupported_types == UnsupportedTypes::Placeholder => {
                tracing::warn!(
                    table = self.table(),
                    column = field.db_name(),
                    rust_type,
                    "norm.ddl.unsupported_type"
                );
                format!("unsupported type {rust_type}")
            }
            None => {
                return Err(NormError::UnsupportedType {
                    column: field.db_name().to_string(),
                    rust_type
                });
            }
        };

        let mut def = format!("{} {db_type}", field.db_name());
        if field.has_tag(tag::NOT_NULL) {
            def.push_str(" NOT NULL");
        }
        if let Some(default) = field.tag_value(tag::DEFAULT) {
            def.push_str(" DEFAULT ");
            def.push_str(default);
        }
        Ok(def)
    }

    fn pk_constraint(&self, pk: &[&str]) -> String {
        format!("CONSTRAINT {}_pkey PRIMARY KEY({})", self.table(), pk.join(", "))
    }

    fn unique_constraint(&self, column: &str) -> String {
        format!(
            "CONSTRAINT unique_{}_{column} UNIQUE({column})",
            self.table()
        )
    }
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! INSERT, SELECT and UPDATE generation.
//!
//! # Generated SQL
//!
//! | Method | Output |
//! |--------|--------|
//! | [`Model::create_sql`] | `INSERT INTO t (a, b) VALUES ($1, $2)` |
//! | [`Model::insert_sql`] | same, columns taken from a payload |
//! | [`Model::read_sql`] | `SELECT a, b FROM t WHERE a=$1` |
//! | [`Model::update_sql`] | `UPDATE t SET a=$1 WHERE b=$2` |
//!
//! WHERE clauses are templates with `?` markers, see
//! [`rewrite_placeholders`](crate::rewrite_placeholders). In an UPDATE they
//! are numbered after the SET binds:
//!
//! ```text
//! payload {"name": "x", "age": 3}, where "id=?"
//! UPDATE users SET name=$1, age=$2 WHERE id=$3
//!                       ^^      ^^          ^^ caller binds
//! ```

use serde_json::{Map, Value as JsonValue};

use crate::{
    Field, Model, NormError, Primitive, Record, Result, ScanPlan, Value,
    sql::{binds_from, push_tail, rewrite_placeholders},
    tag
};

/// SQL text with its leading bind values.
///
/// `binds[i]` belongs to `$(i + 1)`. Placeholders of a caller supplied WHERE
/// template come after these and are bound by the caller, e.g. with
/// [`bind`](Self::bind).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    /// SQL text.
    pub sql: String,

    /// Bind values in placeholder order.
    pub binds: Vec<Value>,

    /// Declared type of the field behind each bind, aligned with `binds`;
    /// `None` for values appended with [`bind`](Self::bind).
    ///
    /// Lets a `NULL` be sent with the column's SQL type.
    pub types: Vec<Option<Primitive>>
}

impl Statement {
    /// Append a bind value for the next placeholder.
    #[must_use]
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.binds.push(value.into());
        self.types.push(None);
        self
    }
}

/// SELECT text with the scan plan aligned to its column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    /// SQL text.
    pub sql: String,

    /// Which field receives each selected column.
    pub plan: ScanPlan
}

impl Model {
    /// INSERT of all columns minus `exclude`, with `$1..$n` placeholders.
    ///
    /// Bind with [`values_obj`](Self::values_obj) for the same `exclude`.
    #[must_use]
    pub fn create_sql(&self, exclude: &str, returning: &str) -> String {
        let sql = self.insert_text(&self.db_names(exclude, ""), returning);
        tracing::debug!(table = self.table(), sql = %sql, "norm.statement");
        sql
    }

    /// INSERT of exactly `fields`.
    ///
    /// Bind with [`values_only_obj`](Self::values_only_obj) for the same
    /// `fields`.
    #[must_use]
    pub fn create_sql_fields(&self, fields: &str, returning: &str) -> String {
        let sql = self.insert_text(&self.db_names_only(fields, ""), returning);
        tracing::debug!(table = self.table(), sql = %sql, "norm.statement");
        sql
    }

    /// INSERT of the fields present in a JSON object payload.
    ///
    /// Every key that resolves to a field not tagged `nocreate` is converted
    /// to the field's type and written to `obj`. Unknown keys are skipped.
    /// An empty result inserts `DEFAULT VALUES`.
    ///
    /// # Errors
    ///
    /// - [`NormError::Payload`] when `data` is not a JSON object
    /// - [`NormError::Conversion`] when a value does not fit its field; fields
    ///   written before the failing key keep their new values
    /// - [`NormError::Structure`] when `obj` is not of this model's type
    pub fn insert_sql<T: Record>(&self, obj: &mut T, data: &[u8], returning: &str) -> Result<Statement> {
        let (fields, binds) = self.apply_payload(obj, data, tag::NO_CREATE)?;
        let columns = fields
            .iter()
            .map(|f| f.db_name().to_string())
            .collect::<Vec<_>>();

        let sql = if columns.is_empty() {
            let mut sql = format!("INSERT INTO {} DEFAULT VALUES", self.table());
            push_tail(&mut sql, "", returning);
            sql
        } else {
            self.insert_text(&columns, returning)
        };

        Ok(self.statement(sql, binds, &fields))
    }

    /// SELECT of every column, with `where_clause` markers numbered from `$1`.
    #[must_use]
    pub fn read_sql(&self, where_clause: &str) -> SelectStatement {
        self.select_text(self.scan_plan(""), where_clause)
    }

    /// SELECT of exactly `fields`.
    #[must_use]
    pub fn read_sql_fields(&self, fields: &str, where_clause: &str) -> SelectStatement {
        self.select_text(self.scan_plan_only(fields), where_clause)
    }

    /// UPDATE of the fields present in a JSON object payload.
    ///
    /// Keys resolving to fields tagged `noupdate` are skipped. SET binds come
    /// first; `where_clause` markers continue the numbering.
    ///
    /// # Errors
    ///
    /// - [`NormError::NoChanges`] when no key is settable; the statement is
    ///   still attached to the error
    /// - plus everything [`insert_sql`](Self::insert_sql) returns
    pub fn update_sql<T: Record>(
        &self,
        obj: &mut T,
        data: &[u8],
        where_clause: &str,
        returning: &str
    ) -> Result<Statement> {
        let (fields, binds) = self.apply_payload(obj, data, tag::NO_UPDATE)?;
        let sets = fields
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{}=${}", f.db_name(), i + 1))
            .collect::<Vec<_>>();
        let (where_sql, _) = rewrite_placeholders(where_clause, sets.len() + 1);

        let mut sql = format!("UPDATE {} SET {}", self.table(), sets.join(", "));
        push_tail(&mut sql, &where_sql, returning);
        let statement = self.statement(sql, binds, &fields);

        if sets.is_empty() {
            return Err(NormError::NoChanges {
                statement
            });
        }
        Ok(statement)
    }

    fn insert_text(&self, columns: &[String], returning: &str) -> String {
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table(),
            columns.join(", "),
            binds_from(1, columns.len())
        );
        push_tail(&mut sql, "", returning);
        sql
    }

    fn select_text(&self, plan: ScanPlan, where_clause: &str) -> SelectStatement {
        let (where_sql, _) = rewrite_placeholders(where_clause, 1);
        let mut sql = format!("SELECT {} FROM {}", plan.columns().join(", "), self.table());
        push_tail(&mut sql, &where_sql, "");
        tracing::debug!(table = self.table(), sql = %sql, "norm.statement");
        SelectStatement {
            sql,
            plan
        }
    }

    fn statement(&self, sql: String, binds: Vec<Value>, fields: &[&Field]) -> Statement {
        tracing::debug!(table = self.table(), sql = %sql, binds = binds.len(), "norm.statement");
        Statement {
            sql,
            binds,
            types: fields.iter().map(|f| Some(f.ty().primitive)).collect()
        }
    }

    /// Write payload values onto `obj`; returns written fields and values
    /// in payload order.
    ///
    /// A field reached through two keys (say `userName` and `user_name`)
    /// keeps its first position and the last value.
    fn apply_payload<T: Record>(
        &self,
        obj: &mut T,
        data: &[u8],
        skip_tag: &str
    ) -> Result<(Vec<&Field>, Vec<Value>)> {
        self.ensure_type::<T>()?;
        let payload: Map<String, JsonValue> = serde_json::from_slice(data)?;

        let mut fields: Vec<&Field> = Vec::with_capacity(payload.len());
        let mut binds = Vec::with_capacity(payload.len());

        for (key, value) in payload {
            let Some(field) = self.field_by_any_name(&key) else {
                tracing::trace!(table = self.table(), key = %key, "norm.payload.unknown_key");
                continue;
            };
            if field.has_tag(skip_tag) {
                tracing::trace!(table = self.table(), key = %key, tag = skip_tag, "norm.payload.skipped");
                continue;
            }

            let stored = obj
                .set_json(field.name(), value)
                .map_err(|source| NormError::conversion(key.as_str(), source))?;

            match fields.iter().position(|f| f.name() == field.name()) {
                Some(i) => binds[i] = stored,
                None => {
                    fields.push(field);
                    binds.push(stored);
                }
            }
        }

        Ok((fields, binds))
    }
}

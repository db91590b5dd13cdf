// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types.
//!
//! | Variant | Raised by | Recoverable |
//! |---------|-----------|-------------|
//! | [`NormError::Structure`] | model building, instance accessors | no |
//! | [`NormError::UnknownField`] | [`Model::value_of`](crate::Model::value_of) | yes |
//! | [`NormError::Conversion`] | payload writes, row scans | yes |
//! | [`NormError::NoChanges`] | [`Model::update_sql`](crate::Model::update_sql) | yes |
//! | [`NormError::UnsupportedType`] | DDL generation in strict mode | no |
//! | [`NormError::Payload`] | payload decoding | yes |
//! | `NormError::Database` | row decoding (`postgres` feature) | yes |
//!
//! Unknown filter and payload keys are never an error: they are skipped.

use thiserror::Error;

use crate::Statement;

/// Result type for norm operations.
pub type Result<T> = std::result::Result<T, NormError>;

/// A value could not be converted into a field's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ConversionError {
    /// Human readable name of the accepted input.
    pub expected: &'static str,

    /// Description of the rejected input.
    pub found: String
}

impl ConversionError {
    /// Create a conversion error.
    #[must_use]
    pub fn new(expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.into()
        }
    }

    /// The record has no field with this declared name.
    #[must_use]
    pub fn unknown_field(field: &str) -> Self {
        Self::new("a declared field", format!("`{field}`"))
    }
}

/// Errors returned by model building and SQL synthesis.
#[derive(Debug, Error)]
pub enum NormError {
    /// The record description or bound instance does not fit the model.
    #[error("structure error: {0}")]
    Structure(String),

    /// A key could not be resolved to a model field.
    #[error("unknown field `{0}`")]
    UnknownField(String),

    /// A payload or row value does not convert to the field's type.
    #[error("cannot convert value for field `{field}`: {source}")]
    Conversion {
        /// Payload key or column the value was destined for.
        field:  String,
        /// Underlying conversion failure.
        source: ConversionError
    },

    /// An update payload resolved to zero settable fields.
    ///
    /// The statement assembled so far is carried along so callers can
    /// inspect it, but it must not be executed.
    #[error("no data to update")]
    NoChanges {
        /// The statement produced despite the missing SET list.
        statement: Statement
    },

    /// A field type has no known SQL column type.
    #[error("unsupported type `{rust_type}` for column `{column}`")]
    UnsupportedType {
        /// Column name.
        column:    String,
        /// Declared Rust type.
        rust_type: &'static str
    },

    /// The payload is not a JSON object.
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A row column could not be decoded.
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error)
}

impl NormError {
    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }

    pub(crate) fn conversion(field: impl Into<String>, source: ConversionError) -> Self {
        Self::Conversion {
            field: field.into(),
            source
        }
    }
}

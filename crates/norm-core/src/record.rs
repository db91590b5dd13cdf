// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Self-describing records.
//!
//! [`Record`] is what a model is built from. It is normally generated by
//! `#[derive(Record)]`, but can be written by hand:
//!
//! ```rust
//! use norm_core::{ColumnType, ConversionError, FieldDescriptor, Record, Value};
//! use serde_json::Value as JsonValue;
//!
//! #[derive(Default)]
//! struct Tag {
//!     id:   i64,
//!     name: String
//! }
//!
//! impl Record for Tag {
//!     const TYPE_NAME: &'static str = "Tag";
//!
//!     fn fields() -> &'static [FieldDescriptor] {
//!         const FIELDS: &[FieldDescriptor] = &[
//!             FieldDescriptor::new("id", Some(",pk"), <i64 as ColumnType>::TYPE),
//!             FieldDescriptor::new("name", None, <String as ColumnType>::TYPE)
//!         ];
//!         FIELDS
//!     }
//!
//!     fn get(&self, field: &str) -> Option<Value> {
//!         match field {
//!             "id" => Some(self.id.to_value()),
//!             "name" => Some(self.name.to_value()),
//!             _ => None
//!         }
//!     }
//!
//!     fn set(&mut self, field: &str, value: Value) -> Result<(), ConversionError> {
//!         match field {
//!             "id" => self.id = ColumnType::from_value(value)?,
//!             "name" => self.name = ColumnType::from_value(value)?,
//!             _ => return Err(ConversionError::unknown_field(field))
//!         }
//!         Ok(())
//!     }
//!
//!     fn set_json(&mut self, field: &str, value: JsonValue) -> Result<Value, ConversionError> {
//!         match field {
//!             "id" => {
//!                 self.id = ColumnType::from_json(value)?;
//!                 Ok(self.id.to_value())
//!             }
//!             "name" => {
//!                 self.name = ColumnType::from_json(value)?;
//!                 Ok(self.name.to_value())
//!             }
//!             _ => Err(ConversionError::unknown_field(field))
//!         }
//!     }
//! }
//! ```

use serde_json::Value as JsonValue;

use crate::{ConversionError, TypeInfo, Value};

/// Declaration of one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared field name.
    pub name: &'static str,

    /// Raw tag text, if any.
    pub tag: Option<&'static str>,

    /// Declared type.
    pub ty: TypeInfo
}

impl FieldDescriptor {
    /// Create a descriptor.
    #[must_use]
    pub const fn new(name: &'static str, tag: Option<&'static str>, ty: TypeInfo) -> Self {
        Self {
            name,
            tag,
            ty
        }
    }
}

/// A struct that can be mapped to a table.
///
/// All accessors address fields by their declared name.
pub trait Record: 'static {
    /// Declared type name; the default table name is its snake_case form.
    const TYPE_NAME: &'static str;

    /// Explicit table name.
    const TABLE: Option<&'static str> = None;

    /// Fields in declaration order.
    fn fields() -> &'static [FieldDescriptor];

    /// Read a field as a bind value.
    fn get(&self, field: &str) -> Option<Value>;

    /// Assign a row value to a field.
    fn set(&mut self, field: &str, value: Value) -> Result<(), ConversionError>;

    /// Convert a payload value to the field's type and assign it.
    ///
    /// Returns the stored value. On error the field is left untouched.
    fn set_json(&mut self, field: &str, value: JsonValue) -> Result<Value, ConversionError>;
}

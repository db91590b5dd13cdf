// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field type descriptors.
//!
//! Every persisted field type implements [`ColumnType`], which provides a
//! const [`TypeInfo`] for the model and the conversions used by payload
//! writes and row scans.
//!
//! # Type Mapping Table
//!
//! | Rust Type | Primitive | Column kind |
//! |-----------|-----------|-------------|
//! | `String` | `Text` | text |
//! | `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32` | `I8`..`U32` | integer |
//! | `f32`, `f64` | `F32`, `F64` | other |
//! | `bool` | `Bool` | boolean |
//! | `DateTime<Utc>` | `TimestampTz` | temporal |
//! | `NaiveDateTime` | `Timestamp` | temporal |
//! | `NaiveDate` | `Date` | temporal |
//! | `serde_json::Value` | `Json` | json |
//! | `HashMap<String, serde_json::Value>` | `JsonMap` | json |
//! | `Vec<u8>` | `Bytes` | other |
//! | `Option<T>` | as `T` | as `T`, nullable |

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

use crate::{
    ConversionError, Value,
    value::describe_json
};

/// Concrete field type after unwrapping `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `String`.
    Text,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `u8`.
    U8,
    /// `u16`.
    U16,
    /// `u32`.
    U32,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
    /// `bool`.
    Bool,
    /// `chrono::DateTime<Utc>`.
    TimestampTz,
    /// `chrono::NaiveDateTime`.
    Timestamp,
    /// `chrono::NaiveDate`.
    Date,
    /// `serde_json::Value`.
    Json,
    /// `HashMap<String, serde_json::Value>`.
    JsonMap,
    /// `Vec<u8>`.
    Bytes
}

impl Primitive {
    /// Column kind driving condition and DDL strategies.
    #[must_use]
    pub const fn kind(self) -> ColumnKind {
        match self {
            Self::Text => ColumnKind::Text,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::U8 | Self::U16 | Self::U32 => {
                ColumnKind::Integer
            }
            Self::Bool => ColumnKind::Boolean,
            Self::TimestampTz | Self::Timestamp | Self::Date => ColumnKind::Temporal,
            Self::Json | Self::JsonMap => ColumnKind::Json,
            Self::F32 | Self::F64 | Self::Bytes => ColumnKind::Other
        }
    }

    /// Rust spelling of the type.
    #[must_use]
    pub const fn rust_name(self) -> &'static str {
        match self {
            Self::Text => "String",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::TimestampTz => "DateTime<Utc>",
            Self::Timestamp => "NaiveDateTime",
            Self::Date => "NaiveDate",
            Self::Json => "serde_json::Value",
            Self::JsonMap => "HashMap<String, serde_json::Value>",
            Self::Bytes => "Vec<u8>"
        }
    }
}

/// Closed set of column kinds.
///
/// Resolved once per field when the model is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// String-like columns.
    Text,
    /// Integer columns.
    Integer,
    /// Date/time columns.
    Temporal,
    /// JSON documents.
    Json,
    /// Booleans.
    Boolean,
    /// Persisted, but with no condition strategy.
    Other
}

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// Type after unwrapping `Option`.
    pub primitive: Primitive,

    /// Whether the declared type is `Option<_>`.
    pub nullable: bool
}

impl TypeInfo {
    /// Non-nullable type.
    #[must_use]
    pub const fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            nullable: false
        }
    }

    /// Same type wrapped in `Option`.
    #[must_use]
    pub const fn nullable(self) -> Self {
        Self {
            primitive: self.primitive,
            nullable:  true
        }
    }

    /// Column kind of the primitive.
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        self.primitive.kind()
    }
}

/// A Rust type that can back a persisted field.
pub trait ColumnType: Sized {
    /// Type descriptor recorded in the model.
    const TYPE: TypeInfo;

    /// Current value as a bind value.
    fn to_value(&self) -> Value;

    /// Convert a row value.
    fn from_value(value: Value) -> Result<Self, ConversionError>;

    /// Convert a loosely typed payload value.
    fn from_json(value: JsonValue) -> Result<Self, ConversionError>;
}

impl ColumnType for String {
    const TYPE: TypeInfo = TypeInfo::new(Primitive::Text);

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(ConversionError::new("text", other.kind_name()))
        }
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        match value {
            JsonValue::String(s) => Ok(s),
            other => Err(ConversionError::new("a string", describe_json(&other)))
        }
    }
}

/// 2^63, the first float above `i64::MAX`.
const I64_END: f64 = 9_223_372_036_854_775_808.0;

/// Integral JSON number, accepting floats without a fractional part.
///
/// Floats outside the `i64` range are rejected rather than saturated.
pub(crate) fn json_integer(value: &JsonValue) -> Option<i64> {
    let JsonValue::Number(number) = value else {
        return None;
    };
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= -I64_END && *f < I64_END)
            .map(|f| f as i64)
    })
}

macro_rules! integer_column {
    ($($ty:ty => $primitive:ident),* $(,)?) => {
        $(
            impl ColumnType for $ty {
                const TYPE: TypeInfo = TypeInfo::new(Primitive::$primitive);

                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }

                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).map_err(|_| {
                            ConversionError::new(stringify!($ty), format!("out of range {i}"))
                        }),
                        other => Err(ConversionError::new(stringify!($ty), other.kind_name()))
                    }
                }

                fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
                    json_integer(&value)
                        .and_then(|i| <$ty>::try_from(i).ok())
                        .ok_or_else(|| ConversionError::new(stringify!($ty), describe_json(&value)))
                }
            }
        )*
    };
}

integer_column! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
}

impl ColumnType for f64 {
    const TYPE: TypeInfo = TypeInfo::new(Primitive::F64);

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as Self),
            other => Err(ConversionError::new("f64", other.kind_name()))
        }
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        value
            .as_f64()
            .ok_or_else(|| ConversionError::new("f64", describe_json(&value)))
    }
}

impl ColumnType for f32 {
    const TYPE: TypeInfo = TypeInfo::new(Primitive::F32);

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        f64::from_value(value)
            .map(|f| f as Self)
            .map_err(|err| ConversionError::new("f32", err.found))
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        value
            .as_f64()
            .map(|f| f as Self)
            .ok_or_else(|| ConversionError::new("f32", describe_json(&value)))
    }
}

impl ColumnType for bool {
    const TYPE: TypeInfo = TypeInfo::new(Primitive::Bool);

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ConversionError::new("bool", other.kind_name()))
        }
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        value
            .as_bool()
            .ok_or_else(|| ConversionError::new("a bool", describe_json(&value)))
    }
}

impl ColumnType for DateTime<Utc> {
    const TYPE: TypeInfo = TypeInfo::new(Primitive::TimestampTz);

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Timestamp(t) => Ok(t),
            Value::DateTime(t) => Ok(t.and_utc()),
            Value::Text(s) => parse_rfc3339(&s),
            other => Err(ConversionError::new("timestamp", other.kind_name()))
        }
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        match value {
            JsonValue::String(s) => parse_rfc3339(&s),
            other => Err(ConversionError::new(
                "an RFC 3339 timestamp",
                describe_json(&other)
            ))
        }
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, ConversionError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ConversionError::new("an RFC 3339 timestamp", format!("{s:?}")))
}

impl ColumnType for NaiveDateTime {
    const TYPE: TypeInfo = TypeInfo::new(Primitive::Timestamp);

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::DateTime(t) => Ok(t),
            Value::Timestamp(t) => Ok(t.naive_utc()),
            Value::Text(s) => parse_naive(&s),
            other => Err(ConversionError::new("datetime", other.kind_name()))
        }
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        match value {
            JsonValue::String(s) => parse_naive(&s),
            other => Err(ConversionError::new("a datetime", describe_json(&other)))
        }
    }
}

fn parse_naive(s: &str) -> Result<NaiveDateTime, ConversionError> {
    s.parse::<NaiveDateTime>()
        .map_err(|_| ConversionError::new("a datetime", format!("{s:?}")))
}

impl ColumnType for NaiveDate {
    const TYPE: TypeInfo = TypeInfo::new(Primitive::Date);

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Date(d) => Ok(d),
            Value::DateTime(t) => Ok(t.date()),
            Value::Text(s) => parse_date(&s),
            other => Err(ConversionError::new("date", other.kind_name()))
        }
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        match value {
            JsonValue::String(s) => parse_date(&s),
            other => Err(ConversionError::new("a date", describe_json(&other)))
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, ConversionError> {
    s.parse::<NaiveDate>()
        .map_err(|_| ConversionError::new("a date", format!("{s:?}")))
}

impl ColumnType for JsonValue {
    const TYPE: TypeInfo = TypeInfo::new(Primitive::Json);

    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Json(j) => Ok(j),
            Value::Text(s) => serde_json::from_str(&s)
                .map_err(|_| ConversionError::new("json", format!("{s:?}"))),
            other => Err(ConversionError::new("json", other.kind_name()))
        }
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl ColumnType for HashMap<String, JsonValue> {
    const TYPE: TypeInfo = TypeInfo::new(Primitive::JsonMap);

    fn to_value(&self) -> Value {
        Value::Json(JsonValue::Object(
            self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        ))
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Self::from_json(JsonValue::from_value(value)?)
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        match value {
            JsonValue::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ConversionError::new("an object", describe_json(&other)))
        }
    }
}

impl ColumnType for Vec<u8> {
    const TYPE: TypeInfo = TypeInfo::new(Primitive::Bytes);

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(ConversionError::new("bytes", other.kind_name()))
        }
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        match value {
            JsonValue::String(s) => Ok(s.into_bytes()),
            JsonValue::Array(items) => items
                .iter()
                .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Self>>()
                .ok_or_else(|| ConversionError::new("bytes", "array with non-byte items")),
            other => Err(ConversionError::new("bytes", describe_json(&other)))
        }
    }
}

impl<T: ColumnType> ColumnType for Option<T> {
    const TYPE: TypeInfo = T::TYPE.nullable();

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ColumnType::to_value)
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some)
        }
    }

    fn from_json(value: JsonValue) -> Result<Self, ConversionError> {
        match value {
            JsonValue::Null => Ok(None),
            other => T::from_json(other).map(Some)
        }
    }
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use norm::Record;

#[derive(Record)]
#[norm(table = "samples")]
pub struct Sample {
    pub text: String,
    pub tiny: i8,
    pub small: i16,
    pub int: i32,
    pub big: i64,
    pub byte: u8,
    pub word: u16,
    pub dword: u32,
    pub real: f32,
    pub double: f64,
    pub flag: bool,
    pub at: DateTime<Utc>,
    pub local: NaiveDateTime,
    pub day: NaiveDate,
    pub doc: serde_json::Value,
    pub map: HashMap<String, serde_json::Value>,
    pub raw: Vec<u8>,
    pub maybe: Option<i64>,
    pub r#type: Option<String>,
}

fn main() {
    let fields = Sample::fields();
    assert_eq!(fields.len(), 19);
    assert_eq!(fields[18].name, "type");
    assert!(fields[17].ty.nullable);
    assert_eq!(Sample::TABLE, Some("samples"));
}

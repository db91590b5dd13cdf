// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field tag parsing.
//!
//! A tag is a comma-separated list of `key` or `key=value` entries. The
//! first entry, when it has no `=`, names the column:
//!
//! ```text
//! "user_name,notnull,default='anon'"
//!  ^^^^^^^^^ column  ^^^^^^^^^^^^^^^ default = 'anon'
//! ```
//!
//! | Tag | Meaning |
//! |-----|---------|
//! | *(absent or empty)* | column = snake_case(field name) |
//! | `-` | field is not persisted |
//! | `pk` | part of the primary key |
//! | `unique` | unique constraint |
//! | `notnull` | `NOT NULL` |
//! | `default=<expr>` | `DEFAULT <expr>` |
//! | `dbType=<type>` | explicit column type |
//! | `noupdate` | ignored by update payloads |
//! | `nocreate` | ignored by insert payloads |
//! | `fk=<table>` | referenced table |

use std::collections::HashMap;

use convert_case::{Case, Casing};

/// Primary key flag.
pub const PK: &str = "pk";
/// Unique constraint flag.
pub const UNIQUE: &str = "unique";
/// `NOT NULL` flag.
pub const NOT_NULL: &str = "notnull";
/// Column default expression.
pub const DEFAULT: &str = "default";
/// Explicit column type.
pub const DB_TYPE: &str = "dbType";
/// Excluded from update payloads.
pub const NO_UPDATE: &str = "noupdate";
/// Excluded from insert payloads.
pub const NO_CREATE: &str = "nocreate";
/// Foreign key target table.
pub const FK: &str = "fk";

/// Parsed tag options of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOptions {
    name:    String,
    options: HashMap<String, String>
}

impl TagOptions {
    /// Resolved column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the option is present, with or without a value.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Value of an option; empty for bare flags.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Number of options besides the column name.
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the tag carries no options besides the column name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Default column name for a declared field name.
#[must_use]
pub fn default_name(field: &str) -> String {
    field.to_case(Case::Snake)
}

/// Parse the tag of field `field`.
///
/// Returns `None` when the tag is `-`, meaning the field is not persisted.
#[must_use]
pub fn parse(tag: Option<&str>, field: &str) -> Option<TagOptions> {
    let tag = tag.map(str::trim).unwrap_or_default();
    if tag == "-" {
        return None;
    }

    let mut parsed = TagOptions {
        name:    default_name(field),
        options: HashMap::new()
    };
    if tag.is_empty() {
        return Some(parsed);
    }

    for (i, entry) in tag.split(',').map(str::trim).enumerate() {
        if entry.is_empty() {
            continue;
        }
        match entry.split_once('=') {
            Some((key, value)) => {
                parsed
                    .options
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
            None if i == 0 => parsed.name = entry.to_string(),
            None => {
                parsed.options.insert(entry.to_string(), String::new());
            }
        }
    }

    Some(parsed)
}

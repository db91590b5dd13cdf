// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Persisted field of a model.

use convert_case::{Case, Casing};

use crate::{
    ColumnKind, TypeInfo,
    tag::{self, TagOptions}
};

/// One persisted field.
///
/// Holds names and tag options only; all SQL shaping lives in the
/// builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name:       &'static str,
    camel_name: String,
    ty:         TypeInfo,
    kind:       ColumnKind,
    tags:       TagOptions
}

impl Field {
    pub(crate) fn new(name: &'static str, ty: TypeInfo, tags: TagOptions) -> Self {
        Self {
            name,
            camel_name: name.to_case(Case::Camel),
            ty,
            kind: ty.kind(),
            tags
        }
    }

    /// Declared field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Column name.
    #[must_use]
    pub fn db_name(&self) -> &str {
        self.tags.name()
    }

    /// camelCase form of the declared name, as used by JSON payloads.
    #[must_use]
    pub fn camel_name(&self) -> &str {
        &self.camel_name
    }

    /// Declared type.
    #[must_use]
    pub const fn ty(&self) -> TypeInfo {
        self.ty
    }

    /// Column kind.
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// Parsed tag options.
    #[must_use]
    pub const fn tags(&self) -> &TagOptions {
        &self.tags
    }

    /// Whether the tag carries option `name`.
    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.has(name)
    }

    /// Value of tag option `name`.
    #[must_use]
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags.get(name)
    }

    /// Part of the primary key.
    #[must_use]
    pub fn is_pk(&self) -> bool {
        self.has_tag(tag::PK)
    }

    /// Has a unique constraint.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.has_tag(tag::UNIQUE)
    }
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use norm_core::prelude::*;
//! ```

pub use crate::{
    ColumnType, ConditionBuilder, Conditions, Config, ConversionError, LiveColumn, Model, Norm,
    NormError, Record, Result, SelectStatement, Statement, UnsupportedTypes, Value
};

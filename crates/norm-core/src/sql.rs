// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL text helpers shared by the builders.

use std::fmt::Write;

/// Placeholder list `$1, $2, ..., $count`.
///
/// # Example
///
/// ```rust
/// assert_eq!(norm_core::binds(3), "$1, $2, $3");
/// assert_eq!(norm_core::binds(0), "");
/// ```
#[must_use]
pub fn binds(count: usize) -> String {
    binds_from(1, count)
}

/// Placeholder list of `count` entries starting at `$start`.
pub(crate) fn binds_from(start: usize, count: usize) -> String {
    let mut out = String::new();
    for n in start..start + count {
        if n > start {
            out.push_str(", ");
        }
        let _ = write!(out, "${n}");
    }
    out
}

/// Rewrite `?` markers into `$start`, `$start + 1`, ...
///
/// A `?` is a marker only when it is the last character or is followed by
/// whitespace, so `?|`, `?&` or `'?x'` pass through. Returns the rewritten
/// text and the next free placeholder number.
#[must_use]
pub fn rewrite_placeholders(template: &str, start: usize) -> (String, usize) {
    let mut out = String::with_capacity(template.len() + 8);
    let mut next = start;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '?' && chars.peek().is_none_or(|n| n.is_whitespace()) {
            let _ = write!(out, "${next}");
            next += 1;
        } else {
            out.push(c);
        }
    }

    (out, next)
}

/// Split a comma-separated name list, ignoring blanks.
pub(crate) fn split_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Append ` WHERE ...` and ` RETURNING ...` when non-empty.
pub(crate) fn push_tail(sql: &mut String, where_clause: &str, returning: &str) {
    if !where_clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    if !returning.is_empty() {
        sql.push_str(" RETURNING ");
        sql.push_str(returning);
    }
}

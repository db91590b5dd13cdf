// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! WHERE condition building from loosely typed filters.
//!
//! A filter is a JSON object whose keys name fields (any name the model
//! resolves, optionally followed by `->>jsonKey`) and whose values select
//! the predicate:
//!
//! | Filter value | Predicate |
//! |--------------|-----------|
//! | `"x"`, `18`, `true` | `col=$n` |
//! | `{"gt": 18, "lte": 65}` | `col > $n AND col <= $n+1` |
//! | `{"like": "a%"}` | `col LIKE $n` (text only) |
//! | `{"isNull": true}` | `col IS NULL` |
//! | `["a", "b"]` | `col IN ($n, $n+1)` |
//!
//! Which scalars a field accepts depends on its [`ColumnKind`]:
//!
//! | Kind | Operand | Comparisons | `like` |
//! |------|---------|-------------|--------|
//! | text | string | no | yes |
//! | integer | integer | yes | no |
//! | temporal | string | yes | no |
//! | json (with `->>`) | string | no | yes |
//! | boolean | bool | no | no |
//!
//! Filter keys are processed in object order (`serde_json` is built with
//! `preserve_order`), so SQL text and bind order are reproducible. Keys that
//! do not resolve are skipped; a key whose value does not fit the field
//! contributes nothing.

use serde_json::{Map, Value as JsonValue};

use crate::{ColumnKind, Model, Value, types::json_integer};

/// Predicates and their binds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    /// One predicate per contributing filter key.
    pub fragments: Vec<String>,

    /// Bind values in placeholder order.
    pub binds: Vec<Value>
}

impl Conditions {
    /// Fragments joined with ` AND `.
    #[must_use]
    pub fn where_clause(&self) -> String {
        self.fragments.join(" AND ")
    }

    /// Whether no filter key contributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Comparison operator keywords.
const COMPARISONS: [(&str, &str); 5] =
    [("gt", ">"), ("gte", ">="), ("lt", "<"), ("lte", "<="), ("ne", "!=")];

const LIKE: &str = "like";
const IS_NULL: &str = "isNull";
const JSON_PATH: &str = "->>";

fn comparison(op: &str) -> Option<&'static str> {
    COMPARISONS
        .iter()
        .find(|(name, _)| *name == op)
        .map(|(_, sql)| *sql)
}

/// Scalar shape a column kind accepts.
#[derive(Debug, Clone, Copy)]
enum Operand {
    Text,
    Integer,
    Boolean
}

impl Operand {
    fn accept(self, value: &JsonValue) -> Option<Value> {
        match (self, value) {
            (Self::Text, JsonValue::String(s)) => Some(Value::Text(s.clone())),
            (Self::Integer, number) => json_integer(number).map(Value::Int),
            (Self::Boolean, JsonValue::Bool(b)) => Some(Value::Bool(*b)),
            _ => None
        }
    }
}

/// Condition strategy of a column kind.
#[derive(Debug, Clone, Copy)]
struct Strategy {
    operand:     Operand,
    comparisons: bool,
    like:        bool
}

const fn strategy(kind: ColumnKind, json_path: bool) -> Option<Strategy> {
    const TEXT: Strategy = Strategy {
        operand:     Operand::Text,
        comparisons: false,
        like:        true
    };

    match kind {
        ColumnKind::Text => Some(TEXT),
        ColumnKind::Json if json_path => Some(TEXT),
        ColumnKind::Integer => Some(Strategy {
            operand:     Operand::Integer,
            comparisons: true,
            like:        false
        }),
        ColumnKind::Temporal => Some(Strategy {
            operand:     Operand::Text,
            comparisons: true,
            like:        false
        }),
        ColumnKind::Boolean => Some(Strategy {
            operand:     Operand::Boolean,
            comparisons: false,
            like:        false
        }),
        ColumnKind::Json | ColumnKind::Other => None
    }
}

/// Predicate of one filter key, committed only when complete.
struct Predicate {
    column: String,
    parts:  Vec<String>,
    binds:  Vec<Value>,
    next:   usize
}

impl Predicate {
    fn bind(&mut self, value: Value) -> usize {
        self.binds.push(value);
        self.next += 1;
        self.next - 1
    }

    fn compare(&mut self, op: &str, value: Value) {
        let n = self.bind(value);
        self.parts.push(format!("{} {op} ${n}", self.column));
    }

    fn equal(&mut self, value: Value) {
        let n = self.bind(value);
        self.parts.push(format!("{}=${n}", self.column));
    }

    fn is_null(&mut self, null: bool) {
        let not = if null { "" } else { "NOT " };
        self.parts.push(format!("{} IS {not}NULL", self.column));
    }

    fn within(&mut self, values: Vec<Value>) {
        let placeholders = values
            .into_iter()
            .map(|v| format!("${}", self.bind(v)))
            .collect::<Vec<_>>();
        self.parts
            .push(format!("{} IN ({})", self.column, placeholders.join(", ")));
    }
}

/// Builds [`Conditions`] against a model.
///
/// ```rust,ignore
/// let conditions = ConditionBuilder::new(&model)
///     .prefix("u.")
///     .starting_at(3)
///     .build(&filter);
/// ```
#[derive(Debug)]
pub struct ConditionBuilder<'m> {
    model:  &'m Model,
    prefix: String,
    first:  usize
}

impl<'m> ConditionBuilder<'m> {
    /// Builder numbering from `$1` without a prefix.
    #[must_use]
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            prefix: String::new(),
            first: 1
        }
    }

    /// Prefix every column reference, e.g. with a table alias `"u."`.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Number the first placeholder `$first`, continuing earlier binds.
    #[must_use]
    pub fn starting_at(mut self, first: usize) -> Self {
        self.first = first.max(1);
        self
    }

    /// Translate `filter` into predicates.
    #[must_use]
    pub fn build(&self, filter: &Map<String, JsonValue>) -> Conditions {
        let mut out = Conditions::default();

        for (key, value) in filter {
            let (name, suffix) = match key.split_once(JSON_PATH) {
                Some((name, path)) => (name, format!("{JSON_PATH}{path}")),
                None => (key.as_str(), String::new())
            };

            let Some(field) = self.model.field_by_any_name(name) else {
                tracing::trace!(table = self.model.table(), key = %key, "norm.filter.unknown_key");
                continue;
            };
            let Some(strategy) = strategy(field.kind(), !suffix.is_empty()) else {
                tracing::trace!(table = self.model.table(), key = %key, "norm.filter.unsupported_kind");
                continue;
            };

            let mut predicate = Predicate {
                column: format!("{}{}{suffix}", self.prefix, field.db_name()),
                parts:  Vec::new(),
                binds:  Vec::new(),
                next:   self.first + out.binds.len()
            };

            if fill(&mut predicate, strategy, value).is_none() || predicate.parts.is_empty() {
                tracing::trace!(table = self.model.table(), key = %key, "norm.filter.malformed");
                continue;
            }

            out.fragments.push(predicate.parts.join(" AND "));
            out.binds.append(&mut predicate.binds);
        }

        out
    }
}

/// Fill `predicate` from one filter value; `None` when malformed.
fn fill(predicate: &mut Predicate, strategy: Strategy, value: &JsonValue) -> Option<()> {
    match value {
        JsonValue::Array(items) => {
            if items.is_empty() {
                return None;
            }
            let values = items
                .iter()
                .map(|item| strategy.operand.accept(item))
                .collect::<Option<Vec<_>>>()?;
            predicate.within(values);
        }
        JsonValue::Object(ops) => {
            for (op, operand) in ops {
                match op.as_str() {
                    IS_NULL => predicate.is_null(operand.as_bool()?),
                    LIKE if strategy.like => {
                        let value = Operand::Text.accept(operand)?;
                        predicate.compare("LIKE", value);
                    }
                    other => {
                        let sql = comparison(other).filter(|_| strategy.comparisons)?;
                        let value = strategy.operand.accept(operand)?;
                        predicate.compare(sql, value);
                    }
                }
            }
        }
        scalar => predicate.equal(strategy.operand.accept(scalar)?)
    }
    Some(())
}

impl Model {
    /// Translate `filter` into predicates numbered from `$1`.
    ///
    /// `prefix` is prepended to every column, e.g. a table alias `"u."`.
    #[must_use]
    pub fn build_conditions(&self, filter: &Map<String, JsonValue>, prefix: &str) -> Conditions {
        ConditionBuilder::new(self).prefix(prefix).build(filter)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        ColumnType, Config, ConversionError, FieldDescriptor, Record, model::tests::user_model
    };

    fn filter(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => unreachable!("filter literal must be an object")
        }
    }

    /// Placeholder numbers in order of appearance.
    fn placeholders(conditions: &Conditions) -> Vec<usize> {
        let text = conditions.fragments.join(" ");
        text.split('$')
            .skip(1)
            .map(|rest| {
                rest.chars()
                    .take_while(char::is_ascii_digit)
                    .collect::<String>()
                    .parse()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn integer_operator_map() {
        let model = user_model();
        let c = model.build_conditions(&filter(json!({"age": {"gt": 18, "lt": 65}})), "");
        assert_eq!(c.fragments, vec!["age > $1 AND age < $2"]);
        assert_eq!(c.binds, vec![Value::Int(18), Value::Int(65)]);
    }

    #[test]
    fn all_comparisons() {
        let model = user_model();
        let c = model.build_conditions(
            &filter(json!({"age": {"gte": 1, "lte": 2, "ne": 3}})),
            ""
        );
        assert_eq!(c.fragments, vec!["age >= $1 AND age <= $2 AND age != $3"]);
    }

    #[test]
    fn is_null_consumes_no_bind() {
        let model = user_model();
        let c = model.build_conditions(&filter(json!({"email": {"isNull": true}})), "");
        assert_eq!(c.fragments, vec!["email IS NULL"]);
        assert!(c.binds.is_empty());

        let c = model.build_conditions(&filter(json!({"email": {"isNull": false}})), "");
        assert_eq!(c.fragments, vec!["email IS NOT NULL"]);
        assert!(c.binds.is_empty());
    }

    #[test]
    fn in_list() {
        let model = user_model();
        let c = model.build_conditions(&filter(json!({"name": ["active", "pending"]})), "");
        assert_eq!(c.fragments, vec!["name IN ($1, $2)"]);
        assert_eq!(c.binds, vec![Value::from("active"), Value::from("pending")]);
    }

    #[test]
    fn scalar_equality_and_like_with_prefix() {
        let model = user_model();
        let c = model.build_conditions(
            &filter(json!({"name": "ann", "email": {"like": "%@x.org"}})),
            "u."
        );
        assert_eq!(c.fragments, vec!["u.name=$1", "u.email LIKE $2"]);
        assert_eq!(c.where_clause(), "u.name=$1 AND u.email LIKE $2");
    }

    #[test]
    fn numbering_is_global_and_gapless() {
        let model = user_model();
        let c = model.build_conditions(
            &filter(json!({
                "id": [1, 2, 3],
                "email": {"isNull": false},
                "age": {"gt": 1, "lt": 9},
                "name": "x",
                "active": true
            })),
            ""
        );
        let numbers = placeholders(&c);
        assert_eq!(numbers, (1..=c.binds.len()).collect::<Vec<_>>());
        assert_eq!(c.binds.len(), 7);
        assert_eq!(c.fragments.len(), 5);
        assert_eq!(c.fragments[4], "active=$7");
    }

    #[test]
    fn unknown_and_excluded_keys_skipped() {
        let model = user_model();
        let c = model.build_conditions(
            &filter(json!({"nope": 1, "password": "x", "age": 5})),
            ""
        );
        assert_eq!(c.fragments, vec!["age=$1"]);
        assert_eq!(c.binds, vec![Value::Int(5)]);
    }

    #[test]
    fn any_name_resolves() {
        let model = user_model();
        let c = model.build_conditions(&filter(json!({"id": 3})), "");
        assert_eq!(c.fragments, vec!["id=$1"]);
    }

    #[test]
    fn malformed_operator_map_drops_field_only() {
        let model = user_model();
        let c = model.build_conditions(
            &filter(json!({
                "age": {"gt": 1, "between": 2},
                "name": {"gt": "a"},
                "id": {"gt": "1"},
                "email": {"isNull": "yes"},
                "active": false
            })),
            ""
        );
        assert_eq!(c.fragments, vec!["active=$1"]);
        assert_eq!(c.binds, vec![Value::Bool(false)]);
    }

    #[test]
    fn value_shape_must_match_kind() {
        let model = user_model();
        let c = model.build_conditions(
            &filter(json!({"age": "18", "name": 5, "id": [1, "2"], "email": []})),
            ""
        );
        assert!(c.is_empty());
        assert!(c.binds.is_empty());
    }

    #[test]
    fn integral_floats_filter_like_payloads() {
        let model = user_model();
        let c = model.build_conditions(
            &filter(json!({"age": 18.0, "id": {"gte": 2.0, "lt": 2.5}})),
            ""
        );
        assert_eq!(c.fragments, vec!["age=$1"]);
        assert_eq!(c.binds, vec![Value::Int(18)]);
        assert_eq!(i32::from_json(json!(18.0)), Ok(18));
    }

    #[test]
    fn starting_at_continues_numbering() {
        let model = user_model();
        let c = ConditionBuilder::new(&model)
            .starting_at(4)
            .build(&filter(json!({"age": [1, 2]})));
        assert_eq!(c.fragments, vec!["age IN ($4, $5)"]);
    }

    struct Event;

    impl Record for Event {
        const TYPE_NAME: &'static str = "Event";

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::new(
                    "at",
                    None,
                    <chrono::DateTime<chrono::Utc> as ColumnType>::TYPE
                ),
                FieldDescriptor::new("meta", None, <JsonValue as ColumnType>::TYPE),
                FieldDescriptor::new("score", None, <f64 as ColumnType>::TYPE)
            ];
            FIELDS
        }

        fn get(&self, _field: &str) -> Option<Value> {
            None
        }

        fn set(&mut self, field: &str, _value: Value) -> Result<(), ConversionError> {
            Err(ConversionError::unknown_field(field))
        }

        fn set_json(&mut self, field: &str, _value: JsonValue) -> Result<Value, ConversionError> {
            Err(ConversionError::unknown_field(field))
        }
    }

    fn event_model() -> Model {
        Model::parse::<Event>(None, Arc::new(Config::default())).unwrap()
    }

    #[test]
    fn temporal_uses_string_operands() {
        let model = event_model();
        let c = model.build_conditions(
            &filter(json!({"at": {"gte": "2024-01-01", "lt": "2025-01-01"}})),
            "e."
        );
        assert_eq!(c.fragments, vec!["e.at >= $1 AND e.at < $2"]);
        assert_eq!(c.binds, vec![Value::from("2024-01-01"), Value::from("2025-01-01")]);

        let c = model.build_conditions(&filter(json!({"at": "2024-01-01"})), "");
        assert_eq!(c.fragments, vec!["at=$1"]);

        let c = model.build_conditions(&filter(json!({"at": {"gt": 5}})), "");
        assert!(c.is_empty());
    }

    #[test]
    fn json_requires_path() {
        let model = event_model();
        let c = model.build_conditions(&filter(json!({"meta": "x"})), "");
        assert!(c.is_empty());

        let c = model.build_conditions(
            &filter(json!({"meta->>kind": "click", "meta->>src": {"like": "web%"}})),
            ""
        );
        assert_eq!(c.fragments, vec!["meta->>kind=$1", "meta->>src LIKE $2"]);
    }

    #[test]
    fn other_kinds_have_no_conditions() {
        let model = event_model();
        let c = model.build_conditions(&filter(json!({"score": 1})), "");
        assert!(c.is_empty());
    }
}

// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Record models.
//!
//! A [`Model`] is built once per record type and then only read. Every
//! accessor that touches an instance takes it as an argument; the model
//! itself never holds one.
//!
//! # Alignment
//!
//! Column lists and value lists produced with the same filter are
//! index-aligned:
//!
//! ```text
//! db_names("id", "")      -> ["name", "email"]
//! values_obj(&u, "id")    -> [Text("ann"), Text("a@b.c")]
//! ```

use std::{any::TypeId, collections::HashMap, sync::Arc};

use convert_case::{Case, Casing};

use crate::{
    Config, Field, FieldDescriptor, NormError, Record, Result, Value,
    sql::{binds, split_list},
    tag
};

/// Field and table metadata of one record type.
#[derive(Debug, Clone)]
pub struct Model {
    type_id:    TypeId,
    type_name:  &'static str,
    table:      String,
    fields:     Vec<Field>,
    by_name:    HashMap<&'static str, usize>,
    by_db_name: HashMap<String, usize>,
    by_camel:   HashMap<String, usize>,
    config:     Arc<Config>
}

/// Scan targets of a SELECT, aligned with its column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    columns: Vec<String>,
    targets: Vec<&'static str>
}

impl ScanPlan {
    /// Column names in SELECT order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Declared field names receiving each column.
    #[must_use]
    pub fn targets(&self) -> &[&'static str] {
        &self.targets
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the plan selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Model {
    /// Build the model of `T`.
    ///
    /// `table` overrides both `T::TABLE` and the snake_case type name.
    ///
    /// # Errors
    ///
    /// [`NormError::Structure`] when a field has no name or no field is
    /// persisted.
    pub fn parse<T: Record>(table: Option<&str>, config: Arc<Config>) -> Result<Self> {
        let table = table
            .or(T::TABLE)
            .map_or_else(|| T::TYPE_NAME.to_case(Case::Snake), str::to_string);
        Self::build(TypeId::of::<T>(), T::TYPE_NAME, table, T::fields(), config)
    }

    pub(crate) fn build(
        type_id: TypeId,
        type_name: &'static str,
        table: String,
        descriptors: &[FieldDescriptor],
        config: Arc<Config>
    ) -> Result<Self> {
        if table.is_empty() {
            return Err(NormError::structure(format!(
                "`{type_name}` resolves to an empty table name"
            )));
        }

        let mut model = Self {
            type_id,
            type_name,
            table,
            fields: Vec::with_capacity(descriptors.len()),
            by_name: HashMap::new(),
            by_db_name: HashMap::new(),
            by_camel: HashMap::new(),
            config
        };

        for descriptor in descriptors {
            if descriptor.name.is_empty() {
                return Err(NormError::structure(format!(
                    "`{type_name}` declares a field without a name"
                )));
            }
            let Some(tags) = tag::parse(descriptor.tag, descriptor.name) else {
                continue;
            };
            if tags.name().is_empty() {
                return Err(NormError::structure(format!(
                    "`{type_name}.{}` resolves to an empty column name",
                    descriptor.name
                )));
            }

            let field = Field::new(descriptor.name, descriptor.ty, tags);
            let index = model.fields.len();
            model.by_name.insert(field.name(), index);
            model.by_db_name.insert(field.db_name().to_string(), index);
            model.by_camel.insert(field.camel_name().to_string(), index);
            model.fields.push(field);
        }

        if model.fields.is_empty() {
            return Err(NormError::structure(format!(
                "`{type_name}` has no persisted fields"
            )));
        }

        Ok(model)
    }

    /// Declared type name of the record.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Persisted fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Registry configuration this model was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a field by declared name, then column name, then camelCase
    /// name.
    #[must_use]
    pub fn field_by_any_name(&self, key: &str) -> Option<&Field> {
        self.by_name
            .get(key)
            .or_else(|| self.by_db_name.get(key))
            .or_else(|| self.by_camel.get(key))
            .map(|&i| &self.fields[i])
    }

    /// Column names, each prefixed with `prefix`, minus the comma-separated
    /// `exclude` list.
    #[must_use]
    pub fn db_names(&self, exclude: &str, prefix: &str) -> Vec<String> {
        self.select_excluding(exclude)
            .map(|f| format!("{prefix}{}", f.db_name()))
            .collect()
    }

    /// [`db_names`](Self::db_names) joined with `", "`.
    #[must_use]
    pub fn db_names_csv(&self, exclude: &str, prefix: &str) -> String {
        self.db_names(exclude, prefix).join(", ")
    }

    /// Column names of exactly the comma-separated `fields`, in model order.
    ///
    /// Entries may use any name [`field_by_any_name`](Self::field_by_any_name)
    /// accepts; unknown entries are ignored.
    #[must_use]
    pub fn db_names_only(&self, fields: &str, prefix: &str) -> Vec<String> {
        self.select_only(fields)
            .map(|f| format!("{prefix}{}", f.db_name()))
            .collect()
    }

    /// `column=$N` entries numbered from 1, minus `exclude`.
    #[must_use]
    pub fn db_names_with_binds(&self, exclude: &str) -> Vec<String> {
        self.select_excluding(exclude)
            .enumerate()
            .map(|(i, f)| format!("{}=${}", f.db_name(), i + 1))
            .collect()
    }

    /// Placeholder list `$1, ..., $count`.
    #[must_use]
    pub fn binds(count: usize) -> String {
        binds(count)
    }

    /// Values of `obj`, aligned with [`db_names`](Self::db_names) for the
    /// same `exclude`.
    ///
    /// # Errors
    ///
    /// [`NormError::Structure`] when `obj` is not of this model's type.
    pub fn values_obj<T: Record>(&self, obj: &T, exclude: &str) -> Result<Vec<Value>> {
        self.ensure_type::<T>()?;
        self.select_excluding(exclude)
            .map(|f| self.read(obj, f))
            .collect()
    }

    /// Values of `obj`, aligned with [`db_names_only`](Self::db_names_only)
    /// for the same `fields`.
    ///
    /// # Errors
    ///
    /// [`NormError::Structure`] when `obj` is not of this model's type.
    pub fn values_only_obj<T: Record>(&self, obj: &T, fields: &str) -> Result<Vec<Value>> {
        self.ensure_type::<T>()?;
        self.select_only(fields).map(|f| self.read(obj, f)).collect()
    }

    /// Value of one field of `obj`, addressed by any of its names.
    ///
    /// # Errors
    ///
    /// [`NormError::UnknownField`] when `key` does not resolve.
    pub fn value_of<T: Record>(&self, obj: &T, key: &str) -> Result<Value> {
        self.ensure_type::<T>()?;
        let field = self
            .field_by_any_name(key)
            .ok_or_else(|| NormError::UnknownField(key.to_string()))?;
        self.read(obj, field)
    }

    /// Scan plan for the columns left after `exclude`.
    #[must_use]
    pub fn scan_plan(&self, exclude: &str) -> ScanPlan {
        Self::plan(self.select_excluding(exclude))
    }

    /// Scan plan for exactly `fields`.
    #[must_use]
    pub fn scan_plan_only(&self, fields: &str) -> ScanPlan {
        Self::plan(self.select_only(fields))
    }

    /// Assign one row to `obj`; `row[i]` goes to `plan.targets()[i]`.
    ///
    /// # Errors
    ///
    /// [`NormError::Structure`] on a type or length mismatch,
    /// [`NormError::Conversion`] when a value does not fit its field.
    pub fn scan_obj<T: Record>(&self, obj: &mut T, plan: &ScanPlan, row: Vec<Value>) -> Result<()> {
        self.ensure_type::<T>()?;
        if row.len() != plan.len() {
            return Err(NormError::structure(format!(
                "row has {} values, `{}` scan expects {}",
                row.len(),
                self.table,
                plan.len()
            )));
        }

        for ((target, column), value) in plan.targets.iter().zip(&plan.columns).zip(row) {
            obj.set(target, value)
                .map_err(|source| NormError::conversion(column.as_str(), source))?;
        }
        Ok(())
    }

    pub(crate) fn ensure_type<T: Record>(&self) -> Result<()> {
        if TypeId::of::<T>() == self.type_id {
            Ok(())
        } else {
            Err(NormError::structure(format!(
                "`{}` passed to the model of `{}`",
                T::TYPE_NAME,
                self.type_name
            )))
        }
    }

    fn read<T: Record>(&self, obj: &T, field: &Field) -> Result<Value> {
        obj.get(field.name()).ok_or_else(|| {
            NormError::structure(format!(
                "`{}` does not expose field `{}`",
                self.type_name,
                field.name()
            ))
        })
    }

    fn plan<'a>(fields: impl Iterator<Item = &'a Field>) -> ScanPlan {
        let (columns, targets) = fields.map(|f| (f.db_name().to_string(), f.name())).unzip();
        ScanPlan {
            columns,
            targets
        }
    }

    pub(crate) fn select_excluding<'a>(
        &'a self,
        exclude: &str
    ) -> impl Iterator<Item = &'a Field> + 'a {
        let excluded = split_list(exclude)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        self.fields
            .iter()
            .filter(move |f| !excluded.iter().any(|e| e == f.db_name()))
    }

    pub(crate) fn select_only<'a>(&'a self, fields: &str) -> impl Iterator<Item = &'a Field> + 'a {
        let wanted = split_list(fields)
            .into_iter()
            .filter_map(|key| self.field_by_any_name(key))
            .map(Field::name)
            .collect::<Vec<_>>();
        self.fields
            .iter()
            .filter(move |f| wanted.contains(&f.name()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::Value as JsonValue;

    use super::*;
    use crate::{ColumnType, ConversionError, tag::NO_UPDATE};

    /// Hand-written record shared by the builder tests.
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct User {
        pub id:       i64,
        pub name:     String,
        pub email:    Option<String>,
        pub age:      i32,
        pub password: String,
        pub active:   bool
    }

    impl Record for User {
        const TYPE_NAME: &'static str = "User";
        const TABLE: Option<&'static str> = Some("users");

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::new("id", Some(",pk,nocreate,noupdate"), <i64 as ColumnType>::TYPE),
                FieldDescriptor::new("name", Some(",notnull"), <String as ColumnType>::TYPE),
                FieldDescriptor::new("email", Some("email,unique"), <Option<String> as ColumnType>::TYPE),
                FieldDescriptor::new("age", None, <i32 as ColumnType>::TYPE),
                FieldDescriptor::new("password", Some("-"), <String as ColumnType>::TYPE),
                FieldDescriptor::new("active", Some(",default=true"), <bool as ColumnType>::TYPE)
            ];
            FIELDS
        }

        fn get(&self, field: &str) -> Option<Value> {
            match field {
                "id" => Some(self.id.to_value()),
                "name" => Some(self.name.to_value()),
                "email" => Some(self.email.to_value()),
                "age" => Some(self.age.to_value()),
                "password" => Some(self.password.to_value()),
                "active" => Some(self.active.to_value()),
                _ => None
            }
        }

        fn set(&mut self, field: &str, value: Value) -> std::result::Result<(), ConversionError> {
            match field {
                "id" => self.id = ColumnType::from_value(value)?,
                "name" => self.name = ColumnType::from_value(value)?,
                "email" => self.email = ColumnType::from_value(value)?,
                "age" => self.age = ColumnType::from_value(value)?,
                "password" => self.password = ColumnType::from_value(value)?,
                "active" => self.active = ColumnType::from_value(value)?,
                _ => return Err(ConversionError::unknown_field(field))
            }
            Ok(())
        }

        fn set_json(
            &mut self,
            field: &str,
            value: JsonValue
        ) -> std::result::Result<Value, ConversionError> {
            match field {
                "id" => self.id = ColumnType::from_json(value)?,
                "name" => self.name = ColumnType::from_json(value)?,
                "email" => self.email = ColumnType::from_json(value)?,
                "age" => self.age = ColumnType::from_json(value)?,
                "password" => self.password = ColumnType::from_json(value)?,
                "active" => self.active = ColumnType::from_json(value)?,
                _ => return Err(ConversionError::unknown_field(field))
            }
            Ok(self.get(field).unwrap_or(Value::Null))
        }
    }

    /// Record with no persisted fields.
    pub struct Hidden;

    impl Record for Hidden {
        const TYPE_NAME: &'static str = "Hidden";

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] =
                &[FieldDescriptor::new("secret", Some("-"), <String as ColumnType>::TYPE)];
            FIELDS
        }

        fn get(&self, _field: &str) -> Option<Value> {
            None
        }

        fn set(&mut self, field: &str, _value: Value) -> std::result::Result<(), ConversionError> {
            Err(ConversionError::unknown_field(field))
        }

        fn set_json(
            &mut self,
            field: &str,
            _value: JsonValue
        ) -> std::result::Result<Value, ConversionError> {
            Err(ConversionError::unknown_field(field))
        }
    }

    pub fn user_model() -> Model {
        Model::parse::<User>(None, Arc::new(Config::default())).unwrap()
    }

    fn sample() -> User {
        User {
            id:       7,
            name:     "ann".into(),
            email:    Some("ann@example.com".into()),
            age:      30,
            password: "secret".into(),
            active:   true
        }
    }

    #[test]
    fn parse_skips_excluded_fields() {
        let model = user_model();
        assert_eq!(model.table(), "users");
        assert_eq!(model.fields().len(), 5);
        assert!(model.field_by_any_name("password").is_none());
    }

    #[test]
    fn table_override_and_default() {
        let config = Arc::new(Config::default());
        let model = Model::parse::<User>(Some("people"), Arc::clone(&config)).unwrap();
        assert_eq!(model.table(), "people");
        assert_eq!(model.type_name(), "User");
    }

    #[test]
    fn no_persisted_fields_is_structure_error() {
        let err = Model::parse::<Hidden>(None, Arc::new(Config::default())).unwrap_err();
        assert!(matches!(err, NormError::Structure(_)));
    }

    #[test]
    fn empty_descriptor_name_is_structure_error() {
        let descriptors = [FieldDescriptor::new("", None, <i64 as ColumnType>::TYPE)];
        let err = Model::build(
            TypeId::of::<()>(),
            "Broken",
            "broken".into(),
            &descriptors,
            Arc::new(Config::default())
        )
        .unwrap_err();
        assert!(matches!(err, NormError::Structure(_)));
    }

    #[test]
    fn resolution_priority() {
        let descriptors = [
            FieldDescriptor::new("login", Some("user_name"), <String as ColumnType>::TYPE),
            FieldDescriptor::new("user_name", Some("nick"), <String as ColumnType>::TYPE)
        ];
        let model = Model::build(
            TypeId::of::<()>(),
            "Account",
            "account".into(),
            &descriptors,
            Arc::new(Config::default())
        )
        .unwrap();

        // declared name beats column name
        assert_eq!(model.field_by_any_name("user_name").unwrap().name(), "user_name");
        assert_eq!(model.field_by_any_name("nick").unwrap().name(), "user_name");
        assert_eq!(model.field_by_any_name("userName").unwrap().name(), "user_name");
        assert_eq!(model.field_by_any_name("login").unwrap().name(), "login");
    }

    #[test]
    fn db_names_stable_and_filtered() {
        let model = user_model();
        let all = model.db_names("", "");
        assert_eq!(all, vec!["id", "name", "email", "age", "active"]);
        assert_eq!(all, model.db_names("", ""));
        assert_eq!(model.db_names("id, age", "u."), vec!["u.name", "u.email", "u.active"]);
        assert_eq!(model.db_names_csv("id", ""), "name, email, age, active");
    }

    #[test]
    fn db_names_only_keeps_model_order() {
        let model = user_model();
        assert_eq!(model.db_names_only("age,id,nope", ""), vec!["id", "age"]);
    }

    #[test]
    fn db_names_with_binds_numbers() {
        let model = user_model();
        assert_eq!(
            model.db_names_with_binds("id,email,active"),
            vec!["name=$1", "age=$2"]
        );
    }

    #[test]
    fn values_align_with_names() {
        let model = user_model();
        let user = sample();
        let names = model.db_names("id", "");
        let values = model.values_obj(&user, "id").unwrap();
        assert_eq!(names.len(), values.len());
        assert_eq!(values[0], Value::Text("ann".into()));
        assert_eq!(values[1], Value::Text("ann@example.com".into()));
        assert_eq!(values[2], Value::Int(30));
        assert_eq!(values[3], Value::Bool(true));
    }

    #[test]
    fn values_only_align() {
        let model = user_model();
        let values = model.values_only_obj(&sample(), "age,name").unwrap();
        assert_eq!(values, vec![Value::Text("ann".into()), Value::Int(30)]);
    }

    #[test]
    fn value_of_any_name() {
        let model = user_model();
        assert_eq!(model.value_of(&sample(), "age").unwrap(), Value::Int(30));
        assert!(matches!(
            model.value_of(&sample(), "password"),
            Err(NormError::UnknownField(_))
        ));
    }

    #[test]
    fn wrong_instance_type_fails() {
        let model = user_model();
        let err = model.values_obj(&Hidden, "").unwrap_err();
        assert!(matches!(err, NormError::Structure(_)));
    }

    #[test]
    fn scan_assigns_row() {
        let model = user_model();
        let plan = model.scan_plan("active");
        assert_eq!(plan.columns(), model.db_names("active", "").as_slice());

        let mut user = User::default();
        model
            .scan_obj(
                &mut user,
                &plan,
                vec![
                    Value::Int(1),
                    Value::Text("bob".into()),
                    Value::Null,
                    Value::Int(41)
                ]
            )
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "bob");
        assert_eq!(user.email, None);
        assert_eq!(user.age, 41);
    }

    #[test]
    fn scan_length_mismatch() {
        let model = user_model();
        let plan = model.scan_plan_only("id");
        let err = model.scan_obj(&mut User::default(), &plan, vec![]).unwrap_err();
        assert!(matches!(err, NormError::Structure(_)));
    }

    #[test]
    fn scan_conversion_error_names_column() {
        let model = user_model();
        let plan = model.scan_plan_only("age");
        let err = model
            .scan_obj(&mut User::default(), &plan, vec![Value::Text("x".into())])
            .unwrap_err();
        assert!(matches!(err, NormError::Conversion { ref field, .. } if field == "age"));
    }

    #[test]
    fn tag_flags_visible_on_fields() {
        let model = user_model();
        assert!(model.field_by_any_name("id").unwrap().has_tag(NO_UPDATE));
        assert!(model.field_by_any_name("email").unwrap().is_unique());
    }
}

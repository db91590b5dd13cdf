// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Caller-owned model registry.
//!
//! A [`Norm`] caches one [`Model`] per record type and indexes it by table
//! name. Models are built on first use and shared behind [`Arc`]:
//!
//! ```text
//! norm.model::<User>() ──► cached? ──yes──► Arc<Model>
//!                            │
//!                            no
//!                            ▼
//!                 Model::parse::<User>(..) ──► insert by type and table
//! ```
//!
//! The registry is a plain value: create it at startup, share it (it is
//! `Send + Sync`), drop it with the application. There is no global
//! instance.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard}
};

use crate::{Config, Model, Record, Result};

/// A tuple of record types, registered together by [`Norm::add_models`].
pub trait RecordSet {
    /// Register every member with `norm`.
    ///
    /// # Errors
    ///
    /// The first model building error.
    fn add_to(norm: &Norm) -> Result<()>;
}

macro_rules! record_set {
    ($($record:ident),+) => {
        impl<$($record: Record),+> RecordSet for ($($record,)+) {
            fn add_to(norm: &Norm) -> Result<()> {
                $(norm.add_model::<$record>(None)?;)+
                Ok(())
            }
        }
    };
}

record_set!(A);
record_set!(A, B);
record_set!(A, B, C);
record_set!(A, B, C, D);
record_set!(A, B, C, D, E);
record_set!(A, B, C, D, E, F);
record_set!(A, B, C, D, E, F, G);
record_set!(A, B, C, D, E, F, G, H);

#[derive(Debug, Default)]
struct Models {
    by_type:  HashMap<TypeId, Arc<Model>>,
    by_table: HashMap<String, Arc<Model>>
}

impl Models {
    fn insert(&mut self, type_id: TypeId, model: Arc<Model>) {
        if let Some(previous) = self.by_type.insert(type_id, Arc::clone(&model))
            && previous.table() != model.table()
        {
            self.by_table.remove(previous.table());
        }
        self.by_table.insert(model.table().to_string(), model);
    }
}

/// Registry of models sharing one [`Config`].
///
/// # Example
///
/// ```rust
/// use norm_core::{Config, Norm};
///
/// let norm = Norm::new(Config::default().with_default_string("varchar(255)"));
/// assert!(norm.tables().is_empty());
/// ```
#[derive(Debug)]
pub struct Norm {
    config: Arc<Config>,
    models: RwLock<Models>
}

impl Default for Norm {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Norm {
    /// Empty registry.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            models: RwLock::new(Models::default())
        }
    }

    /// Configuration shared by all models.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Model of `T`, built with the default table name on first use.
    ///
    /// # Errors
    ///
    /// [`NormError::Structure`](crate::NormError::Structure) when `T` cannot
    /// be modeled.
    pub fn model<T: Record>(&self) -> Result<Arc<Model>> {
        let type_id = TypeId::of::<T>();
        if let Some(model) = self.read_models().by_type.get(&type_id) {
            return Ok(Arc::clone(model));
        }

        let built = Arc::new(Model::parse::<T>(None, Arc::clone(&self.config))?);
        let mut models = self.write_models();
        if let Some(model) = models.by_type.get(&type_id) {
            return Ok(Arc::clone(model));
        }
        tracing::debug!(
            record = T::TYPE_NAME,
            table = built.table(),
            fields = built.fields().len(),
            "norm.model"
        );
        models.insert(type_id, Arc::clone(&built));
        Ok(built)
    }

    /// Build and register the model of `T`, optionally under an explicit
    /// table name.
    ///
    /// Replaces any model previously registered for `T`.
    ///
    /// # Errors
    ///
    /// [`NormError::Structure`](crate::NormError::Structure) when `T` cannot
    /// be modeled.
    pub fn add_model<T: Record>(&self, table: Option<&str>) -> Result<Arc<Model>> {
        let model = Arc::new(Model::parse::<T>(table, Arc::clone(&self.config))?);
        tracing::debug!(
            record = T::TYPE_NAME,
            table = model.table(),
            fields = model.fields().len(),
            "norm.model"
        );
        self.write_models()
            .insert(TypeId::of::<T>(), Arc::clone(&model));
        Ok(model)
    }

    /// Register every record type of the tuple `S` under its default table.
    ///
    /// ```rust,ignore
    /// norm.add_models::<(User, Post, Comment)>()?;
    /// ```
    ///
    /// # Errors
    ///
    /// The first error of [`add_model`](Self::add_model); models registered
    /// before it stay registered.
    pub fn add_models<S: RecordSet>(&self) -> Result<()> {
        S::add_to(self)
    }

    /// Model registered for table `table`.
    #[must_use]
    pub fn t(&self, table: &str) -> Option<Arc<Model>> {
        self.read_models().by_table.get(table).cloned()
    }

    /// Registered table names, sorted.
    #[must_use]
    pub fn tables(&self) -> Vec<String> {
        let mut tables = self
            .read_models()
            .by_table
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        tables.sort();
        tables
    }

    fn read_models(&self) -> RwLockReadGuard<'_, Models> {
        self.models.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_models(&self) -> RwLockWriteGuard<'_, Models> {
        self.models.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{
        NormError,
        model::tests::{Hidden, User}
    };

    #[test]
    fn lazy_model_is_cached() {
        let norm = Norm::default();
        let first = norm.model::<User>().unwrap();
        let second = norm.model::<User>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(norm.tables(), vec!["users"]);
        assert!(Arc::ptr_eq(&norm.t("users").unwrap(), &first));
    }

    #[test]
    fn add_model_with_table_replaces() {
        let norm = Norm::default();
        norm.model::<User>().unwrap();
        let people = norm.add_model::<User>(Some("people")).unwrap();
        assert_eq!(people.table(), "people");
        assert_eq!(norm.tables(), vec!["people"]);
        assert!(norm.t("users").is_none());
        assert!(Arc::ptr_eq(&norm.model::<User>().unwrap(), &people));
    }

    #[test]
    fn structure_errors_are_not_cached() {
        let norm = Norm::default();
        assert!(matches!(norm.model::<Hidden>(), Err(NormError::Structure(_))));
        assert!(norm.tables().is_empty());
    }

    #[test]
    fn add_models_stops_at_first_error() {
        let norm = Norm::default();
        let err = norm.add_models::<(User, Hidden)>().unwrap_err();
        assert!(matches!(err, NormError::Structure(_)));
        assert_eq!(norm.tables(), vec!["users"]);
    }

    #[test]
    fn config_is_shared() {
        let norm = Norm::new(Config::default().with_default_string("varchar(64)"));
        let model = norm.model::<User>().unwrap();
        assert_eq!(model.config().default_string, "varchar(64)");
        assert_eq!(norm.config().default_string, "varchar(64)");
    }

    #[test]
    fn concurrent_first_use_yields_one_model() {
        let norm = Arc::new(Norm::default());
        let models = (0..8)
            .map(|_| {
                let norm = Arc::clone(&norm);
                thread::spawn(move || norm.model::<User>().unwrap())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>();

        let cached = norm.model::<User>().unwrap();
        assert!(models.iter().all(|m| Arc::ptr_eq(m, &cached)));
    }
}

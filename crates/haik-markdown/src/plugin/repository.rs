//! Plugin lookup.
//!
//! A [`PluginRepository`] answers whether it knows a plugin id and creates
//! fresh instances. The engine consults a [`PluginRegistry`] holding several
//! repositories, most recently registered first.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::{Plugin, PluginError};

/// Source of plugin instances.
pub trait PluginRepository: Send + Sync {
    /// Check whether `id` is provided. Must not have side effects.
    fn exists(&self, id: &str) -> bool;

    /// Create a fresh instance of `id`.
    fn load(&self, id: &str) -> Result<Box<dyn Plugin>, PluginError>;

    /// Every id this repository provides.
    fn get_all(&self) -> Vec<String>;
}

/// Constructor for a plugin instance.
pub type PluginFactory = Box<dyn Fn() -> Box<dyn Plugin> + Send + Sync>;

/// Repository backed by constructor closures.
///
/// # Example
///
/// ```
/// use haik_markdown::{FactoryRepository, Plugin, PluginRepository};
///
/// struct Hr;
/// impl Plugin for Hr {}
///
/// let repo = FactoryRepository::new().with_plugin("hr", || Box::new(Hr));
/// assert!(repo.exists("hr"));
/// assert!(repo.load("hr").is_ok());
/// assert_eq!(repo.get_all(), vec!["hr".to_owned()]);
/// ```
#[derive(Default)]
pub struct FactoryRepository {
    factories: BTreeMap<String, PluginFactory>,
}

impl FactoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin. Ids are stored lower-cased; a repeated id replaces the
    /// earlier factory.
    #[must_use]
    pub fn with_plugin<F>(mut self, id: &str, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Plugin> + Send + Sync + 'static,
    {
        self.register(id, factory);
        self
    }

    pub fn register<F>(&mut self, id: &str, factory: F)
    where
        F: Fn() -> Box<dyn Plugin> + Send + Sync + 'static,
    {
        self.factories
            .insert(id.to_ascii_lowercase(), Box::new(factory));
    }

    /// Drop the given ids.
    #[must_use]
    pub fn without<S: AsRef<str>>(mut self, ids: &[S]) -> Self {
        for id in ids {
            self.factories.remove(&id.as_ref().to_ascii_lowercase());
        }
        self
    }
}

impl fmt::Debug for FactoryRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRepository")
            .field("ids", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PluginRepository for FactoryRepository {
    fn exists(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    fn load(&self, id: &str) -> Result<Box<dyn Plugin>, PluginError> {
        self.factories
            .get(id)
            .map(|factory| factory())
            .ok_or_else(|| PluginError::NotFound { id: id.to_owned() })
    }

    fn get_all(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}

/// Ordered set of repositories.
///
/// Lookup walks repositories from the most recently registered to the
/// oldest; the first one that knows an id provides it.
#[derive(Default)]
pub struct PluginRegistry {
    repositories: Vec<Box<dyn PluginRepository>>,
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository ahead of the existing ones.
    pub fn register(&mut self, repository: impl PluginRepository + 'static) {
        self.repositories.insert(0, Box::new(repository));
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("ids", &self.get_all())
            .finish()
    }
}

impl PluginRepository for PluginRegistry {
    fn exists(&self, id: &str) -> bool {
        self.repositories.iter().any(|repo| repo.exists(id))
    }

    fn load(&self, id: &str) -> Result<Box<dyn Plugin>, PluginError> {
        self.repositories
            .iter()
            .find(|repo| repo.exists(id))
            .ok_or_else(|| PluginError::NotFound { id: id.to_owned() })?
            .load(id)
    }

    /// Union of every repository's ids, de-duplicated and sorted.
    fn get_all(&self) -> Vec<String> {
        self.repositories
            .iter()
            .flat_map(|repo| repo.get_all())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

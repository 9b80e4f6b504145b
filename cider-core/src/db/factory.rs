use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use super::repository::{RepositoryError, SimulationRepository};

/// Where to store templates, scenarios and results.
///
/// `backend` selects a registered [`RepositoryFactory`] by name;
/// `connection_string` is handed to that factory untouched.
///
/// | backend  | connection_string examples                          |
/// |----------|-----------------------------------------------------|
/// | `sqlite` | `cider.db`, `sqlite:cider.db?mode=rwc`, `:memory:`  |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl DbConfig {
    pub fn new(
        backend: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            connection_string: connection_string.into(),
        }
    }
}

impl Default for DbConfig {
    /// In-memory SQLite, which is gone once the process exits.
    fn default() -> Self {
        Self::new("sqlite", ":memory:")
    }
}

/// Builds repositories for one storage backend.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Lowercase name matched against [`DbConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Opens the store and returns a repository with its schema in place.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SimulationRepository>, RepositoryError>;
}

/// Backend factories keyed by [`RepositoryFactory::backend_name`].
///
/// Binaries register every backend they link at startup and then call
/// [`create`](Self::create) with the user's [`DbConfig`].
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory, replacing any earlier one with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        let name = factory.backend_name();
        if self.factories.insert(name, factory).is_some() {
            debug!(backend = name, "replaced repository factory");
        }
    }

    pub fn is_registered(
        &self,
        backend: &str,
    ) -> bool {
        self.factories.contains_key(backend)
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Creates a repository with the factory named by `config.backend`.
    ///
    /// # Errors
    ///
    /// * [`RepositoryError::Configuration`] when no such backend is
    ///   registered; the message lists the ones that are.
    /// * Whatever the selected factory returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SimulationRepository>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            )));
        };

        debug!(backend = %config.backend, "creating repository");
        factory.create(config).await
    }
}

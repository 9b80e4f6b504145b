use std::path::PathBuf;

use async_trait::async_trait;
use cider_core::db::{DbConfig, RepositoryFactory};
use cider_core::{RepositoryError, SimulationRepository};
use tracing::info;

use crate::repository::SqliteRepository;

/// Directory holding the seed SQL files.
///
/// Resolution order:
/// 1. `CIDER_DB_SQLITE_SEEDS_DIR` when set.
/// 2. `./seeds` when it exists in the working directory.
/// 3. `$CARGO_MANIFEST_DIR/seeds`.
pub fn seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CIDER_DB_SQLITE_SEEDS_DIR") {
        return PathBuf::from(dir);
    }
    let cwd_seeds = PathBuf::from("./seeds");
    if cwd_seeds.is_dir() {
        return cwd_seeds;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// [`RepositoryFactory`] for the `"sqlite"` backend.
///
/// ```rust,no_run
/// use cider_core::db::RepositoryRegistry;
/// use cider_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens `config.connection_string`, migrates it and loads the seeds.
    ///
    /// The connection string may be a bare path (`cider.db`), a sqlx URL
    /// (`sqlite:cider.db?mode=rwc`) or `:memory:`.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn SimulationRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{:#}", e)))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{:#}", e)))?;

        let seeds = seeds_dir();
        repo.run_seeds(&seeds)
            .await
            .map_err(|e| RepositoryError::Database(format!("{:#}", e)))?;

        info!(
            database = %config.connection_string,
            seeds = %seeds.display(),
            "opened sqlite repository"
        );
        Ok(Box::new(repo))
    }
}

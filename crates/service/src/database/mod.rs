mod blob_provider;
mod sqlite;

use std::ops::Deref;
use std::path::Path;

use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct Database(SqlitePool);

impl Database {
    /// Open (creating if missing) the database file at `path` and run migrations
    pub async fn open(path: &Path) -> Result<Self, DatabaseSetupError> {
        let pool = sqlite::connect_sqlite_file(path).await?;
        sqlite::migrate_sqlite(&pool).await?;
        Ok(Self::new(pool))
    }

    /// A fresh database that lives as long as this handle and its clones
    pub async fn in_memory() -> Result<Self, DatabaseSetupError> {
        let pool = sqlite::connect_sqlite_memory().await?;
        sqlite::migrate_sqlite(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }

    /// Round-trip a trivial query to confirm the database answers
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.0).await?;
        Ok(())
    }
}

impl Deref for Database {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseSetupError {
    #[error("error occurred while attempting database migration: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    #[error("unable to perform initial connection and check of the database: {0}")]
    Unavailable(#[from] sqlx::Error),
}

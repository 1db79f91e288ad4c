//! Connection factory and the storage capability shared by both backends.

use std::path::Path;

use async_trait::async_trait;

use crate::config::{BackendKind, DatabaseConfig};
use crate::error::Result;

pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresBackend;
pub use sqlite::SqliteBackend;

/// Outcome of making sure the target database exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseStatus {
    Created,
    AlreadyExists,
}

/// Operations the schema initializer and the CSV loader need from a database.
///
/// Table names passed in must already have been checked with
/// [`crate::identifiers::validate_table_name`].
#[async_trait]
pub trait Backend: Send {
    fn kind(&self) -> BackendKind;

    /// Runs a whole statement batch in one transaction and commits it.
    async fn execute_batch(&mut self, sql: &str) -> Result<()>;

    /// Removes every row from `table`.
    async fn truncate(&mut self, table: &str) -> Result<()>;

    /// Streams a CSV file, header line included, into `table`. Returns the
    /// number of data rows written.
    async fn bulk_load(&mut self, table: &str, columns: &[&str], csv_path: &Path) -> Result<u64>;

    async fn count_rows(&mut self, table: &str) -> Result<i64>;

    async fn close(self: Box<Self>) -> Result<()>;
}

/// Opens a single connection to the configured database. No pooling, no retry.
pub async fn open(config: &DatabaseConfig) -> Result<Box<dyn Backend>> {
    let backend: Box<dyn Backend> = match config {
        DatabaseConfig::Postgres(pg) => Box::new(PostgresBackend::connect(pg).await?),
        DatabaseConfig::Sqlite(sqlite) => Box::new(SqliteBackend::connect(sqlite).await?),
    };
    Ok(backend)
}

/// Makes sure the target database exists, creating it when absent.
pub async fn ensure_database(config: &DatabaseConfig) -> Result<DatabaseStatus> {
    match config {
        DatabaseConfig::Postgres(pg) => postgres::ensure_database(pg).await,
        DatabaseConfig::Sqlite(sqlite) => sqlite::ensure_database(sqlite).await,
    }
}

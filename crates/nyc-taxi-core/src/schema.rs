//! Database bootstrap: make sure the target database exists, then apply the
//! static schema file to it.
//!
//! The whole file runs as one batch inside a single transaction. Re-running is
//! safe as long as the file guards its statements (the shipped files use
//! `IF NOT EXISTS`).

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{BackendKind, DatabaseConfig};
use crate::db::{self, DatabaseStatus};
use crate::error::{Error, Result};

pub const POSTGRES_SCHEMA_FILE: &str = "schema.sql";
pub const SQLITE_SCHEMA_FILE: &str = "schema_sqlite.sql";

/// Schema file shipped in this crate's `sql/` directory for `kind`.
pub fn default_schema_path(kind: BackendKind) -> PathBuf {
    let file = match kind {
        BackendKind::Postgres => POSTGRES_SCHEMA_FILE,
        BackendKind::Sqlite => SQLITE_SCHEMA_FILE,
    };
    Path::new(env!("CARGO_MANIFEST_DIR")).join("sql").join(file)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub target: String,
    pub database: DatabaseStatus,
    pub schema_path: PathBuf,
}

/// Creates the database if needed and applies `schema_path` to it.
///
/// The database is ensured before the schema file is read, so a missing file
/// still leaves an existing (possibly just created) database behind.
pub async fn initialize(config: &DatabaseConfig, schema_path: &Path) -> Result<InitReport> {
    let database = db::ensure_database(config).await?;
    apply_schema(config, schema_path).await?;

    info!(target_db = %config.describe(), "DB initialization complete");
    Ok(InitReport {
        target: config.describe(),
        database,
        schema_path: schema_path.to_path_buf(),
    })
}

/// Reads the schema file and executes its full contents, then commits.
pub async fn apply_schema(config: &DatabaseConfig, schema_path: &Path) -> Result<()> {
    ensure_schema_file(schema_path).await?;
    let sql = tokio::fs::read_to_string(schema_path).await?;

    let mut backend = db::open(config).await?;
    backend.execute_batch(&sql).await?;
    backend.close().await?;

    info!(
        schema = %schema_path.display(),
        target_db = %config.describe(),
        "Applied schema"
    );
    Ok(())
}

async fn ensure_schema_file(schema_path: &Path) -> Result<()> {
    if tokio::fs::try_exists(schema_path).await? {
        Ok(())
    } else {
        Err(Error::SchemaNotFound(schema_path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_schema_files_exist() {
        for kind in [BackendKind::Postgres, BackendKind::Sqlite] {
            let path = default_schema_path(kind);
            assert!(path.is_file(), "missing {}", path.display());
        }
    }
}

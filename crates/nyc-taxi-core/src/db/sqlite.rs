use std::path::Path;

use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord};
use sqlx::{Connection, Executor, SqliteConnection};
use tracing::{debug, info};

use super::{Backend, DatabaseStatus};
use crate::config::{BackendKind, SqliteConfig};
use crate::error::{Error, Result};

pub struct SqliteBackend {
    conn: SqliteConnection,
}

impl SqliteBackend {
    /// Opens an existing database file. A missing file is an error here;
    /// only [`ensure_database`] creates one.
    pub async fn connect(config: &SqliteConfig) -> Result<Self> {
        let conn = SqliteConnection::connect_with(&config.connect_options()).await?;
        debug!(path = %config.path.display(), "Opened SQLite database");
        Ok(Self { conn })
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<()> {
        let mut tx = self.conn.begin().await?;
        tx.execute(sqlx::raw_sql(sql)).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn truncate(&mut self, table: &str) -> Result<()> {
        let sql = format!("DELETE FROM {table}");
        sqlx::query(&sql).execute(&mut self.conn).await?;
        Ok(())
    }

    /// SQLite has no COPY, so the file is parsed client-side and every record
    /// goes through one prepared INSERT inside a single transaction. As with
    /// `COPY ... (FORMAT csv, HEADER true)` the first line is skipped and
    /// empty fields are stored as NULL.
    async fn bulk_load(&mut self, table: &str, columns: &[&str], csv_path: &Path) -> Result<u64> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(csv_path)?;
        let statement = insert_statement(table, columns);

        let mut tx = self.conn.begin().await?;
        let mut record = StringRecord::new();
        let mut rows = 0u64;

        while reader.read_record(&mut record)? {
            if record.len() != columns.len() {
                return Err(Error::MalformedRow {
                    line: record.position().map(|pos| pos.line()).unwrap_or_default(),
                    expected: columns.len(),
                    found: record.len(),
                });
            }

            let mut query = sqlx::query(&statement);
            for field in record.iter() {
                let value = (!field.is_empty()).then(|| field.to_string());
                query = query.bind(value);
            }
            query.execute(&mut *tx).await?;
            rows += 1;
        }

        tx.commit().await?;
        Ok(rows)
    }

    async fn count_rows(&mut self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&mut self.conn)
            .await?;
        Ok(count)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

fn insert_statement(table: &str, columns: &[&str]) -> String {
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    )
}

/// For SQLite the database is the file itself.
pub(crate) async fn ensure_database(config: &SqliteConfig) -> Result<DatabaseStatus> {
    let path = config.path.as_path();
    if tokio::fs::try_exists(path).await? {
        info!(path = %path.display(), "Database already exists");
        return Ok(DatabaseStatus::AlreadyExists);
    }

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let conn =
        SqliteConnection::connect_with(&config.connect_options().create_if_missing(true)).await?;
    conn.close().await?;

    info!(path = %path.display(), "Created database");
    Ok(DatabaseStatus::Created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_statement_has_one_placeholder_per_column() {
        let sql = insert_statement("trips", &["pickup_datetime", "fare_amount", "tip_amount"]);
        assert_eq!(
            sql,
            "INSERT INTO trips (pickup_datetime, fare_amount, tip_amount) VALUES (?, ?, ?)"
        );
    }
}

use std::path::Path;

use async_trait::async_trait;
use sqlx::{Connection, Executor, PgConnection};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use super::{Backend, DatabaseStatus};
use crate::config::{BackendKind, PostgresConfig};
use crate::error::Result;
use crate::identifiers::{quote_identifier, validate_database_name};

const COPY_CHUNK_SIZE: usize = 64 * 1024;

pub struct PostgresBackend {
    conn: PgConnection,
}

impl PostgresBackend {
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let conn = PgConnection::connect_with(&config.connect_options()).await?;
        debug!(database = config.database(), "Connected to Postgres");
        Ok(Self { conn })
    }
}

#[async_trait]
impl Backend for PostgresBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Postgres
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<()> {
        let mut tx = self.conn.begin().await?;
        tx.execute(sqlx::raw_sql(sql)).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn truncate(&mut self, table: &str) -> Result<()> {
        let sql = format!("TRUNCATE TABLE {table}");
        sqlx::query(&sql).execute(&mut self.conn).await?;
        Ok(())
    }

    async fn bulk_load(&mut self, table: &str, columns: &[&str], csv_path: &Path) -> Result<u64> {
        let statement = copy_statement(table, columns);
        let mut file = tokio::fs::File::open(csv_path).await?;

        let mut copy = self.conn.copy_in_raw(&statement).await?;
        let mut buffer = vec![0u8; COPY_CHUNK_SIZE];
        loop {
            let read = match file.read(&mut buffer).await {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) => {
                    copy.abort(format!("failed to read {}: {err}", csv_path.display()))
                        .await?;
                    return Err(err.into());
                }
            };
            copy.send(&buffer[..read]).await?;
        }

        let rows = copy.finish().await?;
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

/// Server-side CSV parse; the first line of the stream is the header.
fn copy_statement(table: &str, columns: &[&str]) -> String {
    format!(
        "COPY {table} ({}) FROM STDIN WITH (FORMAT csv, HEADER true)",
        columns.join(",")
    )
}

pub(crate) async fn ensure_database(config: &PostgresConfig) -> Result<DatabaseStatus> {
    let name = config.database();
    validate_database_name(name)?;

    let mut admin = PgConnection::connect_with(&config.admin_options()).await?;

    let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(name)
        .fetch_optional(&mut admin)
        .await?
        .is_some();

    let status = if exists {
        info!(database = name, "Database already exists");
        DatabaseStatus::AlreadyExists
    } else {
        // CREATE DATABASE cannot run inside a transaction block.
        let sql = format!("CREATE DATABASE {}", quote_identifier(name));
        sqlx::raw_sql(&sql).execute(&mut admin).await?;
        info!(database = name, "Created database");
        DatabaseStatus::Created
    };

    admin.close().await?;
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_statement_names_columns_and_header() {
        let sql = copy_statement("trips", &["pickup_datetime", "dropoff_datetime"]);
        assert_eq!(
            sql,
            "COPY trips (pickup_datetime,dropoff_datetime) FROM STDIN WITH (FORMAT csv, HEADER true)"
        );
    }
}

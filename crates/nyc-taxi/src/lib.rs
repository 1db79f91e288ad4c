//! Shared pieces of the `init-db` and `load-data` binaries: connection
//! flags, logging setup and the mapping from library errors to exit codes.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use nyc_taxi_core::config::{
    DatabaseConfig, PgParams, PostgresConfig, SqliteConfig, DEFAULT_DATABASE, DEFAULT_HOST,
    DEFAULT_PORT, DEFAULT_USER,
};
use nyc_taxi_core::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Postgres,
    Sqlite,
}

/// Connection flags. Each Postgres flag falls back to the matching `PG*`
/// variable, then to the built-in default.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Storage backend to target
    #[arg(long, value_enum, default_value_t = Backend::Postgres)]
    pub backend: Backend,

    /// Full connection URL; takes precedence over the discrete Postgres flags
    #[arg(long)]
    pub database_url: Option<String>,

    #[arg(long, env = "PGHOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "PGPORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, env = "PGDATABASE", default_value = DEFAULT_DATABASE)]
    pub dbname: String,

    #[arg(long, env = "PGUSER", default_value = DEFAULT_USER)]
    pub user: String,

    /// Postgres password (or set PGPASSWORD env)
    #[arg(long, env = "PGPASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// SQLite database file (default: nyc_taxi.db beside the core crate)
    #[arg(long, env = "SQLITE_PATH")]
    pub sqlite_path: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn into_config(self) -> nyc_taxi_core::Result<DatabaseConfig> {
        let config = match self.backend {
            Backend::Postgres => match self.database_url {
                Some(url) => PostgresConfig::from_database_url(&url)?.into(),
                None => PostgresConfig::from_params(&PgParams {
                    host: self.host,
                    port: self.port,
                    user: self.user,
                    password: self.password.filter(|password| !password.is_empty()),
                    dbname: self.dbname,
                })
                .into(),
            },
            Backend::Sqlite => {
                SqliteConfig::new(self.sqlite_path.unwrap_or_else(SqliteConfig::default_path))
                    .into()
            }
        };
        Ok(config)
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Joins the error chain with `": "`, skipping causes whose text already
/// appears earlier (library errors embed their source in their own message).
pub fn error_report(err: &anyhow::Error) -> String {
    let mut report = String::new();
    for cause in err.chain() {
        let message = cause.to_string();
        if report.contains(&message) {
            continue;
        }
        if !report.is_empty() {
            report.push_str(": ");
        }
        report.push_str(&message);
    }
    report
}

/// `load-data`: 1 when the CSV is missing, 2 for everything else.
pub fn load_exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(Error::CsvNotFound(_)) => 1,
        _ => 2,
    }
}

/// `init-db`: 2 when the schema file is missing, 1 for everything else.
pub fn init_exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(Error::SchemaNotFound(_)) => 2,
        _ => 1,
    }
}

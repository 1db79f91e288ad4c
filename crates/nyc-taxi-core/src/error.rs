// crates/nyc-taxi-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV not found at {}", .0.display())]
    CsvNotFound(PathBuf),

    #[error("CSV {} appears to be empty or missing a header row", .0.display())]
    EmptyCsv(PathBuf),

    #[error(
        "CSV header does not match expected columns.\n\
         Expected (order-sensitive): {expected:?}\n\
         Found: {found:?}\n\
         Missing: {missing:?}\n\
         Extra: {extra:?}"
    )]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("Invalid identifier '{name}': {reason}")]
    InvalidIdentifier { name: String, reason: &'static str },

    #[error("CSV line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("schema.sql not found at {}", .0.display())]
    SchemaNotFound(PathBuf),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

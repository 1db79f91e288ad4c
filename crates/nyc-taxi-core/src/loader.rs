// crates/nyc-taxi-core/src/loader.rs

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{DatabaseConfig, DEFAULT_TABLE};
use crate::db::{self, Backend};
use crate::error::{Error, Result};
use crate::identifiers::validate_table_name;
use crate::validation::{read_csv_header, validate_header, EXPECTED_COLUMNS};

pub const DEFAULT_CSV_PATH: &str = "data/cleaned_data.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub csv_path: PathBuf,
    pub table: String,
    /// Delete every existing row before copying.
    pub truncate: bool,
    pub skip_header_check: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            table: DEFAULT_TABLE.to_string(),
            truncate: false,
            skip_header_check: false,
        }
    }
}

impl LoadOptions {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub table: String,
    pub header_checked: bool,
    pub truncated: bool,
    /// Data rows written by this run, as reported by the backend.
    pub rows_copied: u64,
    /// Total rows in the table after the load. Includes rows that were
    /// already there when the table was not truncated.
    pub table_rows: i64,
}

/// Validates the CSV, then truncates (optionally), bulk-copies and counts.
///
/// Nothing touches the database until the file exists, the table name is a
/// plain identifier and, unless skipped, the header matches
/// [`EXPECTED_COLUMNS`] exactly.
pub async fn load(config: &DatabaseConfig, options: &LoadOptions) -> Result<LoadReport> {
    let header_checked = preflight(options)?;

    let mut backend = db::open(config).await?;
    let report = copy_into(backend.as_mut(), options, header_checked).await?;
    backend.close().await?;

    Ok(report)
}

/// Checks that run before any connection is opened. Returns whether the
/// header was validated.
pub fn preflight(options: &LoadOptions) -> Result<bool> {
    if !options.csv_path.exists() {
        return Err(Error::CsvNotFound(options.csv_path.clone()));
    }
    validate_table_name(&options.table)?;

    if options.skip_header_check {
        warn!(csv = %options.csv_path.display(), "Skipping CSV header validation");
        return Ok(false);
    }

    let found = read_csv_header(&options.csv_path)?;
    validate_header(&found, &EXPECTED_COLUMNS)?;
    info!("Header validation: OK");
    Ok(true)
}

/// Runs the mutating half of a load against an already open backend.
pub async fn copy_into(
    backend: &mut dyn Backend,
    options: &LoadOptions,
    header_checked: bool,
) -> Result<LoadReport> {
    let table = options.table.as_str();

    if options.truncate {
        info!(table, "Truncating table");
        backend.truncate(table).await?;
    }

    info!(
        csv = %options.csv_path.display(),
        table,
        backend = %backend.kind(),
        "Loading CSV"
    );
    let rows_copied = backend
        .bulk_load(table, &EXPECTED_COLUMNS, &options.csv_path)
        .await?;

    let table_rows = backend.count_rows(table).await?;
    info!(table, rows_copied, table_rows, "Load complete");

    Ok(LoadReport {
        table: options.table.clone(),
        header_checked,
        truncated: options.truncate,
        rows_copied,
        table_rows,
    })
}

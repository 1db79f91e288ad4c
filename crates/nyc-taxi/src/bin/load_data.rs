use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use nyc_taxi::{error_report, init_tracing, load_exit_code, ConnectionArgs};
use nyc_taxi_core::config::DEFAULT_TABLE;
use nyc_taxi_core::loader::{self, LoadOptions, DEFAULT_CSV_PATH};

/// Load cleaned NYC taxi CSV into the trips table
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct Cli {
    /// Path to cleaned CSV
    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    csv: PathBuf,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Target table
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Truncate table before load
    #[arg(long)]
    truncate: bool,

    /// Skip CSV header validation
    #[arg(long)]
    skip_header_check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR during load: {}", error_report(&err));
            ExitCode::from(load_exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let options = LoadOptions {
        csv_path: cli.csv,
        table: cli.table,
        truncate: cli.truncate,
        skip_header_check: cli.skip_header_check,
    };
    let config = cli.connection.into_config()?;

    let report = loader::load(&config, &options)
        .await
        .with_context(|| {
            format!(
                "loading {} into {}",
                options.csv_path.display(),
                config.describe()
            )
        })?;

    println!("Load complete. Row count: {}", report.table_rows);
    Ok(())
}

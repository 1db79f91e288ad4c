use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use nyc_taxi::{error_report, init_exit_code, init_tracing, ConnectionArgs};
use nyc_taxi_core::db::DatabaseStatus;
use nyc_taxi_core::schema::{self, default_schema_path};

/// Create the NYC taxi database if needed and apply the schema file
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Schema file to apply (default: the file shipped for the chosen backend)
    #[arg(long)]
    schema: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {}", error_report(&err));
            ExitCode::from(init_exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.connection.into_config()?;
    let schema_path = cli
        .schema
        .unwrap_or_else(|| default_schema_path(config.kind()));

    let report = schema::initialize(&config, &schema_path).await?;

    match report.database {
        DatabaseStatus::Created => println!("Created database {}", report.target),
        DatabaseStatus::AlreadyExists => println!("Database {} already exists", report.target),
    }
    println!(
        "Applied schema from {} to {}",
        report.schema_path.display(),
        report.target
    );
    println!("DB initialization complete");
    Ok(())
}

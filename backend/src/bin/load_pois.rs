//! Replace the stored POI collection with the rows of a local spreadsheet.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, bail, eyre};
use poi_backend::domain::ports::PoiUploadCommand;
use poi_backend::domain::{Error, PoiUploadService, UploadedWorkbook};
use poi_backend::outbound::persistence::{DbPool, DieselPoiRepository, PoolConfig};
use poi_backend::outbound::workbook::CalamineWorkbookSource;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

/// `load-pois` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "load-pois",
    about = "Replace every stored POI with the rows of a spreadsheet",
    version
)]
struct CliArgs {
    /// Path to an `.xlsx`, `.xls`, `.xlsb` or `.ods` workbook.
    #[arg(long = "sheet", value_name = "path")]
    sheet: PathBuf,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Drop and recreate the POI table before loading.
    #[arg(long = "reset-schema")]
    reset_schema: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
    {
        eprintln!("tracing init failed: {error}");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(CliArgs::parse()))
}

async fn async_main(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url)?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(2))
        .await
        .map_err(|error| eyre!("create database pool: {error}"))?;
    let repository = Arc::new(DieselPoiRepository::new(pool));

    if args.reset_schema {
        repository
            .sync_schema()
            .await
            .wrap_err("reset POI schema")?;
        println!("schema=reset");
    }

    let command = PoiUploadService::new(Arc::new(CalamineWorkbookSource), repository);
    let outcome = command
        .upload(UploadedWorkbook::existing(args.sheet))
        .await
        .map_err(describe_failure)?;

    println!("file={}", outcome.file_name);
    println!("stored_count={}", outcome.stored_count);
    println!("rejected_rows={}", outcome.diagnostics.len());
    for line in &outcome.diagnostics {
        println!("  {line}");
    }
    Ok(())
}

/// Fold per-row diagnostics carried in error details into the report.
fn describe_failure(error: Error) -> color_eyre::Report {
    let lines: Vec<&str> = error
        .details()
        .and_then(|details| details.get("errors"))
        .and_then(|errors| errors.as_array())
        .map(|errors| errors.iter().filter_map(|line| line.as_str()).collect())
        .unwrap_or_default();
    if lines.is_empty() {
        eyre!("load failed: {}", error.message())
    } else {
        eyre!("load failed: {}\n  {}", error.message(), lines.join("\n  "))
    }
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            bail!("--database-url must not be empty when provided");
        }
        return Ok(value);
    }

    let from_env = env::var("DATABASE_URL")
        .map_err(|_| eyre!("database URL missing: set --database-url or DATABASE_URL"))?;
    if from_env.trim().is_empty() {
        bail!("DATABASE_URL must not be empty");
    }
    Ok(from_env)
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use clap::Parser;
    use rstest::rstest;
    use serde_json::json;

    use super::{CliArgs, Error, describe_failure, resolve_database_url};

    #[rstest]
    fn resolve_database_url_rejects_empty_explicit() {
        let error = resolve_database_url(Some("   ".to_owned())).expect_err("empty should fail");
        assert!(error.to_string().contains("must not be empty"));
    }

    #[rstest]
    fn resolve_database_url_prefers_explicit_value() {
        let url = resolve_database_url(Some("postgres://localhost/poi".to_owned()))
            .expect("explicit url");
        assert_eq!(url, "postgres://localhost/poi");
    }

    #[rstest]
    fn parses_reset_flag() {
        let args = CliArgs::try_parse_from(["load-pois", "--sheet", "pois.xlsx", "--reset-schema"])
            .expect("args parse");
        assert!(args.reset_schema);
        assert_eq!(args.sheet.to_str(), Some("pois.xlsx"));
        assert!(args.database_url.is_none());
    }

    #[rstest]
    fn sheet_is_required() {
        assert!(CliArgs::try_parse_from(["load-pois"]).is_err());
    }

    #[rstest]
    fn failure_report_lists_row_diagnostics() {
        let error = Error::invalid_request("Data validation failed")
            .with_details(json!({ "errors": ["Row 2: title is empty"] }));
        let report = describe_failure(error).to_string();
        assert!(report.contains("Data validation failed"));
        assert!(report.contains("Row 2: title is empty"));
    }
}

//! CLI entry point for the emissions dashboard.
//!
//! Provides subcommands for building a dashboard report from a CSV file, a
//! CSV URL or the backend API, uploading CSVs to the backend, and checking a
//! CSV against the import rules locally.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emissions_dashboard::analyzers::analyzer::{DEFAULT_TOP_N, build_dashboard};
use emissions_dashboard::{
    config::DashboardConfig,
    fetch::{BasicClient, fetch_text},
    import::{ImportError, validate_import},
    infra::backend::BackendClient,
    output::{export_dashboard, print_json, print_pretty, print_summary},
    parser::parse_records,
    record::EmissionRecord,
    services::emissions_api::EmissionsApi,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "emissions_dashboard")]
#[command(about = "CO₂ emissions and energy consumption analytics", long_about = None)]
struct Cli {
    /// Backend host (overrides API_HOST)
    #[arg(long, global = true)]
    api_host: Option<String>,

    /// Backend port (overrides API_PORT)
    #[arg(long, global = true)]
    api_port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate records and report every dashboard projection
    Report {
        /// CSV file or URL to read; fetches from the backend when omitted
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        /// Number of companies in the ranked charts
        #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
        top: usize,

        /// Log the full report as JSON instead of a summary
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Optional: write one CSV per projection into this directory
        #[arg(short, long)]
        export_dir: Option<PathBuf>,
    },
    /// Upload a CSV file to the backend for import
    Upload {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Validate a CSV file against the import rules without uploading it
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Count rows already stored in the backend as updates
        #[arg(long, default_value_t = false)]
        against_api: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/emissions_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("emissions_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = DashboardConfig::from_env()?;
    if let Some(host) = cli.api_host {
        config.api_host = host;
    }
    if let Some(port) = cli.api_port {
        config.api_port = port;
    }

    let backend = BackendClient::new(&config)?;

    match cli.command {
        Commands::Report {
            source,
            top,
            json,
            export_dir,
        } => {
            let records = load_records(source.as_deref(), &backend, &config).await?;
            if records.is_empty() {
                warn!("No records to aggregate");
            }

            let dashboard = build_dashboard(&records, top);
            print_pretty(&dashboard);
            if json {
                print_json(&dashboard)?;
            } else {
                print_summary(&dashboard);
            }

            if let Some(dir) = export_dir {
                export_dashboard(&dir, &dashboard)?;
            }
        }
        Commands::Upload { file } => {
            let report = backend.import_csv(&file).await?;
            for e in &report.errors {
                warn!(error = %e, "Row rejected by backend");
            }
            print_json(&report)?;
        }
        Commands::Check { file, against_api } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let existing = if against_api {
                backend.list_records().await?
            } else {
                Vec::new()
            };

            match validate_import(&text, &existing) {
                Ok(outcome) => {
                    for e in &outcome.response.errors {
                        warn!(error = %e, "Row rejected");
                    }
                    print_json(&outcome.response)?;
                }
                Err(ImportError::NoValidRows { errors }) => {
                    for e in &errors {
                        error!(error = %e, "Row rejected");
                    }
                    return Err(ImportError::NoValidRows { errors }.into());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

/// Loads records from a CSV path or URL, or from the backend when no source is given.
#[tracing::instrument(skip(backend, config))]
async fn load_records(
    source: Option<&str>,
    backend: &BackendClient,
    config: &DashboardConfig,
) -> Result<Vec<EmissionRecord>> {
    let records = match source {
        Some(url) if url.starts_with("http") => {
            let client = BasicClient::with_timeout(config.request_timeout())?;
            let text = fetch_text(&client, url).await?;
            parse_records(&text)
        }
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {path}"))?;
            parse_records(&text)
        }
        None => backend.list_records().await?,
    };

    info!(count = records.len(), "Records loaded");
    Ok(records)
}

//! Report Card - generate a student's report card from the academic portal.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use report_card as app;
use serde::Serialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::client::PortalClient;
use app::config::{AppConfig, ConfigLoadResult, LoggingConfig};
use app::models::GenerationResult;
use app::service::{Destination, ReportCardService};

/// Student report card generator.
#[derive(Parser)]
#[command(name = "report-card", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long, global = true)]
    dev: bool,

    /// Portal bearer token, overrides the config file
    #[arg(long, global = true, env = "REPORT_CARD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the report card PDF and save it
    Generate {
        /// Output directory (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Choose the file location with a save dialog
        #[arg(long, conflicts_with = "output")]
        pick: bool,

        /// Also write an Excel spreadsheet
        #[arg(long)]
        spreadsheet: bool,
    },
    /// Check whether a report card can be generated
    Check,
    /// Show report card headline numbers without rendering
    Preview,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };

    let (config, missing) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, false),
        ConfigLoadResult::Missing => (AppConfig::default(), true),
        ConfigLoadResult::Invalid(e) => {
            return Err(e).with_context(|| format!("invalid config at {}", config_path.display()));
        }
    };

    let _guard = init_logging(&config.logging);

    tracing::info!("Report Card starting...");
    tracing::info!("Config path: {:?}", config_path);
    if missing {
        config
            .save(&config_path)
            .with_context(|| format!("failed to write default config to {}", config_path.display()))?;
        tracing::info!("Config missing, wrote defaults to {:?}", config_path);
    }

    let mut client = PortalClient::new(&config.portal).context("failed to build portal client")?;
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }
    let service = ReportCardService::new(client, &config.report);

    let success = match cli.command {
        Command::Generate {
            output,
            pick,
            spreadsheet,
        } => {
            let destination = if pick {
                Destination::Dialog
            } else {
                Destination::Directory(output.unwrap_or_else(|| config.report.output_dir.clone()))
            };
            let spreadsheet = spreadsheet || config.report.export_spreadsheet;

            let result = service.generate_and_save(&destination, spreadsheet).await;
            print_json(&result)?;
            result.success
        }
        Command::Check => {
            let eligibility = service.check_eligibility().await;
            print_json(&eligibility)?;
            eligibility.eligible
        }
        Command::Preview => match service.preview().await {
            Ok(preview) => {
                print_json(&preview)?;
                true
            }
            Err(e) => {
                tracing::error!("Failed to get report card preview: {e}");
                print_json(&GenerationResult::failed("Unable to load report card preview.", None))?;
                false
            }
        },
    };

    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Logs go to stderr, and to daily files when a directory is configured.
/// `RUST_LOG` overrides the configured level.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "report-card.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

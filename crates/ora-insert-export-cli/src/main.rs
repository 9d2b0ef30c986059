//! ora-insert-export CLI - export Oracle tables as SQL INSERT scripts.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use ora_insert_export::{Config, ExportError, ExportOrchestrator, Layout};
use tracing::{error, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer as _;

#[derive(Parser)]
#[command(name = "ora-insert-export")]
#[command(about = "Export Oracle table contents as replayable SQL INSERT scripts")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the export
    Run {
        /// Override the output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Override the file layout: separate or combined
        #[arg(long)]
        layout: Option<String>,

        /// Dry run: resolve metadata and show the plan without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Test the source database connection
    HealthCheck,

    /// Write a sample configuration file
    Init {
        /// Output path for the configuration file [default: config.yaml]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ExportError> {
    let cli = Cli::parse();

    // Handle init separately (doesn't need an existing config)
    if let Commands::Init { output, force } = &cli.command {
        let path = output.clone().unwrap_or_else(|| PathBuf::from("config.yaml"));
        return write_sample_config(&path, *force);
    }

    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Init { .. } => unreachable!(), // Handled above
        Commands::Run {
            output_dir,
            layout,
            dry_run,
        } => {
            // Apply overrides
            if let Some(dir) = output_dir {
                config.export.output_dir = dir;
            }
            if let Some(layout) = layout {
                config.export.layout = parse_layout(&layout)?;
            }

            // The audit log lives next to the generated scripts, so the
            // output directory must exist before logging starts.
            std::fs::create_dir_all(&config.export.output_dir)?;
            let log_path = config.export.output_dir.join(format!(
                "export_{}.log",
                Utc::now().format("%Y%m%d_%H%M%S")
            ));
            setup_logging(&cli.verbosity, File::create(&log_path)?);

            info!("Loaded configuration from {}", cli.config.display());
            info!("Audit log: {}", log_path.display());

            let orchestrator = ExportOrchestrator::new(config)?;
            let results = match orchestrator.run(dry_run).await {
                Ok(results) => results,
                Err(e) => {
                    error!("{}", e.format_detailed());
                    return Err(e);
                }
            };

            let total_rows: u64 = results.iter().map(|r| r.rows_exported).sum();
            let status = if dry_run {
                "Dry run completed!"
            } else {
                "Export completed!"
            };
            println!("\n{}", status);
            println!("  Tables: {}", results.len());
            for result in &results {
                println!("    {}: {} rows", result.table_name, result.rows_exported);
            }
            println!("  Total rows: {}", total_rows);
        }

        Commands::HealthCheck => {
            setup_console_logging(&cli.verbosity);

            let orchestrator = ExportOrchestrator::new(config)?;
            match orchestrator.health_check().await {
                Ok(schema) => {
                    println!("Source connection OK (session schema: {})", schema);
                }
                Err(e) => {
                    error!("{}", e.format_detailed());
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}

fn write_sample_config(path: &Path, force: bool) -> Result<(), ExportError> {
    if path.exists() && !force {
        return Err(ExportError::Config(format!(
            "{} already exists - use --force to overwrite",
            path.display()
        )));
    }
    std::fs::write(path, ora_insert_export::config::SAMPLE_CONFIG)?;
    println!("Wrote sample configuration to {}", path.display());
    Ok(())
}

fn parse_layout(value: &str) -> Result<Layout, ExportError> {
    match value.to_lowercase().as_str() {
        "separate" => Ok(Layout::Separate),
        "combined" => Ok(Layout::Combined),
        other => Err(ExportError::Config(format!(
            "Unknown layout '{}' (expected 'separate' or 'combined')",
            other
        ))),
    }
}

fn parse_level(verbosity: &str) -> Level {
    match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Dual-sink audit logging: timestamped lines to the console and to the log
/// file in the output directory.
fn setup_logging(verbosity: &str, log_file: File) {
    let level = LevelFilter::from_level(parse_level(verbosity));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_filter(level),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Arc::new(log_file))
                .with_filter(level),
        )
        .init();
}

fn setup_console_logging(verbosity: &str) {
    tracing_subscriber::fmt()
        .with_max_level(parse_level(verbosity))
        .with_target(false)
        .init();
}

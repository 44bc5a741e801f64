// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! photosift: photo triage
//!
//! Runs the batch passes (dedupe, date sort, non-image sort, conversion) or
//! the review server over an input and an output directory.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use photosift::config::AppConfig;
use photosift::organizer::Organizer;

/// photosift CLI - deduplicate, date-sort and review photos
#[derive(Parser, Debug)]
#[command(name = "photosift")]
#[command(version)]
#[command(about = "Deduplicate, date-sort and review photos", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "photosift.json", global = true)]
    config: PathBuf,

    /// Directory to triage (overrides config and INPUT_DIR)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Directory receiving sorted files (overrides config and OUTPUT_DIR)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the review page (default)
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },

    /// Move every copy but the first of identical files to Duplicate/
    Dedupe,

    /// Move images with a capture date into a folder per year
    SortByDate,

    /// Move files that are not openable images to Non-Image/
    SortNonImages,

    /// Re-encode images of the given MIME types as PNG
    Convert {
        /// MIME type to convert, repeatable (defaults to the configured list)
        #[arg(short, long = "mime")]
        mime: Vec<String>,
    },

    /// Dedupe, sort by date, convert, then sort non-images
    Triage,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write the effective configuration to a file
    Generate {
        /// Output file path
        #[arg(default_value = "photosift.json")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration, then layer environment and flags on top
    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config.apply_env()?;
    if let Some(input) = cli.input {
        config.input_dir = Some(input);
    }
    if let Some(output) = cli.output {
        config.output_dir = Some(output);
    }

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
        open: false,
    });

    if let Commands::Config { action } = command {
        return run_config_command(&config, action);
    }

    let organizer = build_organizer(&config)?;

    match command {
        Commands::Serve { host, port, open } => {
            if let Some(host) = host {
                config.web.host = host;
            }
            if let Some(port) = port {
                config.web.port = port;
            }
            if open {
                let url = format!("http://{}:{}", config.web.host, config.web.port);
                if let Err(e) = open_browser(&url) {
                    error!("Failed to open browser: {}", e);
                }
            }
            photosift::web::start_server(&config.web, organizer).await?;
        }
        Commands::Dedupe => {
            let moved = organizer.move_duplicates()?;
            info!("Moved {} duplicates", moved);
        }
        Commands::SortByDate => {
            let moved = organizer.classify_by_date()?;
            info!("Moved {} dated files", moved);
        }
        Commands::SortNonImages => {
            let moved = organizer.classify_non_images()?;
            info!("Moved {} non-images", moved);
        }
        Commands::Convert { mime } => {
            let mime_types = if mime.is_empty() {
                config.conversion.mime_types.clone()
            } else {
                mime
            };
            run_conversions(&organizer, &mime_types)?;
        }
        Commands::Triage => run_triage(&organizer, &config.conversion.mime_types)?,
        Commands::Config { .. } => unreachable!("handled before the organizer is built"),
    }

    Ok(())
}

fn build_organizer(config: &AppConfig) -> anyhow::Result<Organizer> {
    let (input, output) = config.directories()?;
    if !input.is_dir() {
        bail!("input directory {} does not exist", input.display());
    }
    info!("Input: {}", input.display());
    info!("Output: {}", output.display());
    Ok(Organizer::new(input, output))
}

fn run_conversions(organizer: &Organizer, mime_types: &[String]) -> anyhow::Result<()> {
    for mime_type in mime_types {
        let report = organizer.convert_images(mime_type)?;
        if !report.failed.is_empty() {
            warn!("{} {} files kept after failed conversion", report.failed.len(), mime_type);
        }
    }
    Ok(())
}

fn run_triage(organizer: &Organizer, mime_types: &[String]) -> anyhow::Result<()> {
    let duplicates = organizer.move_duplicates()?;
    let dated = organizer.classify_by_date()?;
    run_conversions(organizer, mime_types)?;
    let non_images = organizer.classify_non_images()?;
    let left = organizer.list_pending_files()?.len();

    info!(
        "Triage done: {} duplicates, {} dated, {} non-images, {} left for review",
        duplicates, dated, non_images, left
    );
    Ok(())
}

fn run_config_command(config: &AppConfig, action: ConfigCommands) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigCommands::Generate { path } => {
            write_config(config, &path)?;
            println!("Generated config at {:?}", path);
        }
    }
    Ok(())
}

fn write_config(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    config.save(path)?;
    Ok(())
}

fn open_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()?;
    }
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }
    Ok(())
}

//! Aircheck - timed broadcast stream capture
//!
//! Run with `aircheck` (or `aircheck capture`) from a cron job or systemd
//! timer to record one clip per tick. Use `aircheck config` to inspect
//! the effective configuration.

use aircheck::capture::{self, Outcome, ProcessRunner};
use aircheck::config;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aircheck")]
#[command(author, version, about = "Timed capture of a live audio broadcast into hour-labeled archives")]
#[command(long_about = "
Aircheck records one fixed-length clip of a live broadcast stream per
invocation and files it under {destination_root}/Hour_HH/HHh_MMm.mp3,
where the label is elapsed broadcast time (event start plus drift
correction, minus scheduled breaks).

Invoke it from an external scheduler, e.g. a cron entry every five
minutes for a 330-second clip. Runs before the event or during a
configured break exit 0 without recording.

Requires ffmpeg (or avconv) on PATH.
")]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Override stream URL
    #[arg(long, value_name = "URL")]
    stream: Option<String>,

    /// Override destination root directory
    #[arg(long, value_name = "DIR")]
    destination: Option<PathBuf>,

    /// Override clip length in seconds
    #[arg(long, value_name = "SECS")]
    clip_length: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one clip for the current slot (default if no command specified)
    Capture,

    /// Show current configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("aircheck={},warn", log_level))),
        )
        .with_target(false)
        .init();

    // Load configuration
    let mut config = config::load_config(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(stream) = cli.stream {
        config.capture.stream_url = stream;
    }
    if let Some(destination) = cli.destination {
        config.capture.destination_root = destination;
    }
    if let Some(clip_length) = cli.clip_length {
        config.capture.clip_length_secs = clip_length;
    }
    config.validate()?;

    // Run the appropriate command
    match cli.command.unwrap_or(Commands::Capture) {
        Commands::Capture => {
            run_capture(&config)?;
        }

        Commands::Config => {
            show_config(&config);
        }
    }

    Ok(())
}

/// Perform one scheduled capture
fn run_capture(config: &config::Config) -> anyhow::Result<()> {
    // Interpret "now" in the event's fixed offset so labels and break
    // windows agree with the configured schedule
    let now = Utc::now().with_timezone(&config.event.start.timezone());

    match capture::run_once(config, now, &ProcessRunner)? {
        Outcome::Skipped(reason) => {
            println!("Skipping capture: {}", reason);
        }
        Outcome::Captured {
            hours,
            minutes,
            destination,
        } => {
            println!(
                "Stream capture complete: {:02}h {:02}m -> {}",
                hours,
                minutes,
                destination.display()
            );
        }
    }

    Ok(())
}

/// Show current configuration
fn show_config(config: &config::Config) {
    println!("Current Configuration\n");
    println!("=====================\n");

    println!("[event]");
    println!("  start = {}", config.event.start.to_rfc3339());
    println!("  correction_minutes = {}", config.event.correction_minutes);
    for brk in &config.event.breaks {
        println!("\n  [[event.breaks]]");
        println!("  start = {}", brk.start.to_rfc3339());
        println!("  end = {}", brk.end.to_rfc3339());
    }

    println!("\n[capture]");
    println!("  stream_url = {:?}", config.capture.stream_url);
    println!("  destination_root = {:?}", config.capture.destination_root);
    println!("  clip_length_secs = {}", config.capture.clip_length_secs);
    println!("  programs = {:?}", config.capture.programs);

    println!("\n---");
    println!(
        "Config file: {:?}",
        config::Config::default_path().unwrap_or_else(|| PathBuf::from("(not found)"))
    );
}

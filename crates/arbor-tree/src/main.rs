//! arbor: hand-tracked particle tree in the terminal
//!
//! Usage:
//!   arbor                                  # interactive, keyboard hand
//!   arbor --image a.jpg --image b.jpg      # with images to grab
//!   arbor --headless 600 --seed 7          # scripted run, prints a summary

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use arbor_config::{ArborConfig, FormationMode, LoggingConfig};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use arbor_tree::{ImageSource, Settings};

/// Log file used by the interactive view when none is configured
const DEFAULT_LOG_FILE: &str = "arbor.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Immediate,
    Debounce,
}

#[derive(Debug, Parser)]
#[command(name = "arbor", version, about = "Hand-tracked particle tree")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for the particle formation
    #[arg(long)]
    seed: Option<u64>,

    /// Number of particles
    #[arg(long, value_name = "N")]
    particles: Option<usize>,

    /// Image to show in the ring (repeatable)
    #[arg(long = "image", value_name = "SRC")]
    images: Vec<String>,

    /// How formation changes respond to the hand
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Frames of agreement required before a debounced change
    #[arg(long, value_name = "FRAMES")]
    dwell: Option<u32>,

    /// Run this many frames with a scripted hand and print a summary
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,

    /// Write logs here instead of the configured file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = arbor_config::load(cli.config.as_deref()).context("failed to load config")?;
    apply_overrides(&mut config, &cli);
    config.validate().context("invalid settings")?;

    init_logging(&config.logging, cli.log_file.clone(), cli.headless.is_some())?;

    let mut settings = Settings::from(&config);
    if !cli.images.is_empty() {
        settings = settings.with_images(cli.images.iter().map(|s| ImageSource::new(s.as_str())).collect());
    }

    match cli.headless {
        Some(frames) => {
            let summary = arbor_tree::run_headless(settings, frames)?;
            for row in &summary.snapshot {
                println!("{}", row.trim_end());
            }
            print!("{}", summary);
        }
        None => {
            let stats = arbor_tree::run_interactive(settings)?;
            println!(
                "{} frames, {} formation changes",
                stats.frames, stats.formation_changes
            );
        }
    }

    Ok(())
}

/// Command-line flags win over the config file
fn apply_overrides(config: &mut ArborConfig, cli: &Cli) {
    if let Some(seed) = cli.seed {
        config.scene.seed = Some(seed);
    }
    if let Some(particles) = cli.particles {
        config.scene.particle_count = particles;
    }
    if let Some(policy) = cli.policy {
        config.controller.mode = match policy {
            PolicyArg::Immediate => FormationMode::Immediate,
            PolicyArg::Debounce => FormationMode::Debounce,
        };
    }
    if let Some(dwell) = cli.dwell {
        config.controller.dwell_frames = dwell;
    }
}

/// The terminal view owns stdout, so interactive runs log to a file.
/// Headless runs log to stderr. `RUST_LOG` overrides the configured level.
fn init_logging(logging: &LoggingConfig, log_file: Option<PathBuf>, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if headless && log_file.is_none() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    let path = log_file
        .or_else(|| logging.file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

//! Rotaug CLI - rotation/flip augmentation for oriented-box datasets
//!
//! Command-line interface over `rotaug-core`.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use rayon::ThreadPoolBuilder;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::augment::AugmentCommand;
use commands::convert::ConvertCommand;
use commands::normalize::NormalizeCommand;

#[derive(Parser)]
#[command(
    name = "rotaug",
    version,
    about = "Rotation/flip augmentation for oriented-box detection datasets",
    after_help = "EXAMPLES:\n  \
                  # x8 dataset (4 quarter turns, with and without mirror)\n  \
                  rotaug augment data/parts out/parts_x8\n\n  \
                  # x16 with 45 degree steps and two image folders\n  \
                  rotaug augment data/dual out/dual_x16 --step 45 --image-folder images --image-folder image\n\n  \
                  # Turn polygon annotations into oriented rectangles in place\n  \
                  rotaug normalize data/json --target rotation\n\n  \
                  # Annotation documents to OBB label text\n  \
                  rotaug convert data/json data/labels --format obb"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write rotated/flipped variants of a dataset's images and labels
    Augment(AugmentCommand),

    /// Normalize annotation shapes in place
    Normalize(NormalizeCommand),

    /// Convert annotation documents to OBB or rect label text
    Convert(ConvertCommand),
}

fn main() -> Result<()> {
    // Size the rayon pool from the environment, e.g. to keep CI runs light
    if let Ok(threads_str) = std::env::var("ROTAUG_THREADS") {
        if let Ok(num_threads) = threads_str.parse::<usize>() {
            ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .ok(); // Ignore error if already initialized
        }
    }

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Augment(cmd) => cmd.execute(),
        Commands::Normalize(cmd) => cmd.execute(),
        Commands::Convert(cmd) => cmd.execute(),
    }
}

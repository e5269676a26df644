// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "qrscan")]
#[command(about = "QR scan gating with region-of-interest detection")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode QR codes in an image file
    Decode {
        /// Image file to decode
        image: PathBuf,
    },

    /// Run an image through the detection gate
    Gate {
        /// Image file to decode and gate
        image: PathBuf,
    },

    /// Drive a scan session over a directory of frame images
    Run {
        /// Directory holding the frame images (fed in name order)
        frames: PathBuf,

        /// Frames per second to feed
        #[arg(short, long, default_value = "30")]
        fps: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=qrscan=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { image } => cli::decode_image(&image),
        Commands::Gate { image } => cli::gate_image(&image),
        Commands::Run { frames, fps } => cli::run_session(&frames, fps),
    }
}

// SPDX-License-Identifier: GPL-3.0-only

use assetscan::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "assetscan")]
#[command(about = "Scan asset QR codes and look them up in a CSV dataset")]
#[command(version = assetscan::constants::app_info::version())]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: ~/.config/assetscan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset URL or CSV file path
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Column holding the asset identifier
    #[arg(long, global = true)]
    key_column: Option<String>,

    /// Camera device node
    #[arg(long, global = true)]
    device: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan codes with the camera in the terminal (default)
    Scan,

    /// List available cameras
    List,

    /// Look up one asset identifier
    Lookup {
        /// Asset identifier, matched exactly
        id: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan still images instead of the camera
    Decode {
        /// Image files to scan, in order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Print results as JSON lines
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they stay out of command output.
    // Set RUST_LOG to control the level, e.g. RUST_LOG=assetscan=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?.with_overrides(
        cli.dataset,
        cli.key_column,
        cli.device,
    );

    match cli.command {
        Some(Commands::Scan) | None => assetscan::terminal::run(&config)?,
        Some(Commands::List) => cli::list_cameras()?,
        Some(Commands::Lookup { id, json }) => cli::lookup(&config, &id, json)?,
        Some(Commands::Decode { images, json }) => cli::decode_images(&config, images, json)?,
    }

    Ok(())
}

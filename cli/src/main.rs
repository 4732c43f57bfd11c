// Desktop tooling crate: unwrap/expect acceptable in tests.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing))]
#![allow(missing_docs)]

mod post_build;
mod show_config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pio-upload")]
#[command(about = "Run the host upload script after a firmware build", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the artifact and run the upload script for its platform
    PostBuild {
        /// Finished firmware image (printed only, never read); wins over --build-dir
        artifact: Option<PathBuf>,
        /// Platform identifier, e.g. espressif8266 or espressif32
        #[arg(long, env = "PIOPLATFORM")]
        platform: String,
        /// Build directory; the artifact becomes $BUILD_DIR/${PROGNAME}.bin
        #[arg(long, env = "BUILD_DIR")]
        build_dir: Option<PathBuf>,
        /// Program name used with --build-dir
        #[arg(long, env = "PROGNAME", default_value = "firmware")]
        progname: String,
        /// JSON file with shell and script overrides
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the resolved upload configuration
    Config {
        /// JSON file with shell and script overrides
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::PostBuild {
            artifact,
            platform,
            build_dir,
            progname,
            config,
        } => {
            let artifact = post_build::resolve_artifact(artifact, build_dir, &progname)?;
            post_build::run(artifact, platform, config.as_deref())
        }
        Commands::Config { config } => show_config::run(config.as_deref()),
    }
}

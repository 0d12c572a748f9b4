//! paththumb CLI - cacheable square thumbnails from local image paths.
//!
//! Inputs given as bare paths are thumbnailed (sampled down toward the
//! configured size, center-cropped, JPEG encoded) and written to the
//! thumbnail directory under a hash of the source. `file://` URLs are read
//! through unchanged and not cached.
//!
//! # Usage
//!
//! ```bash
//! # Thumbnail a single image
//! paththumb generate ~/Pictures/beach.jpg
//!
//! # Thumbnail a directory, JSON lines on stdout
//! paththumb generate ./photos/ --output-dir ./thumbs --json
//!
//! # Which strategy handles an input?
//! paththumb check file:///tmp/icon.png
//!
//! # View configuration
//! paththumb config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// paththumb - square JPEG thumbnails for local images.
#[derive(Parser, Debug)]
#[command(name = "paththumb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate thumbnails for image paths, directories or file:// URLs
    Generate(cli::generate::GenerateArgs),

    /// Show which download strategy handles an input
    Check(cli::check::CheckArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match paththumb_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `paththumb config path`."
            );
            paththumb_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("paththumb v{}", paththumb_core::VERSION);

    match cli.command {
        Commands::Generate(args) => cli::generate::execute(args, config).await,
        Commands::Check(args) => cli::check::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

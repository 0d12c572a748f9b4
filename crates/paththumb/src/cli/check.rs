//! The `paththumb check` command.

use clap::Args;
use paththumb_core::{Config, DownloaderSet};

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path or URL to route
    pub input: String,
}

/// Print the strategy that would serve the input and whether it is cached.
pub fn execute(args: CheckArgs, config: &Config) -> anyhow::Result<()> {
    let downloaders = DownloaderSet::local(&config.thumbnail);
    println!("{}", describe(&downloaders, &args.input));
    Ok(())
}

fn describe(downloaders: &DownloaderSet, input: &str) -> String {
    match downloaders.select(input) {
        Some(downloader) => format!(
            "{input}: {} (cache {})",
            downloader.name(),
            if downloader.allow_cache() {
                "allowed"
            } else {
                "disabled"
            }
        ),
        None => format!("{input}: no local downloader accepts this input"),
    }
}

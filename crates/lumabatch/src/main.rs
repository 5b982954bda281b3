//! lumabatch CLI - batch luminance-to-alpha and PNG conversion.
//!
//! Every eligible image in the input directory is decoded, transformed and
//! written as `<stem>.png` to the output directory.
//!
//! # Usage
//!
//! ```bash
//! # Fade bright pixels to transparent across a directory of scans
//! lumabatch --input ./scans --output ./out --function luma2alpha
//!
//! # Custom weights and threshold, four worker threads, JSONL report
//! lumabatch -i ./scans -o ./out -f luma2alpha-custom \
//!     --coef-r 0.2 --coef-g 0.7 --coef-b 0.1 --threshold 180 -t 4 \
//!     --report report.jsonl
//!
//! # Plain PNG conversion of a single file
//! lumabatch -i photo.jpg -o ./out -f png
//! ```

use std::path::PathBuf;

use clap::Parser;
use lumabatch_core::Config;

mod cli;
mod logging;

/// lumabatch - batch luminance-to-alpha and PNG conversion for image directories.
#[derive(Parser, Debug)]
#[command(name = "lumabatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,

    /// Path to a config file (default: platform config directory)
    #[arg(long, env = "LUMABATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    process: cli::process::ProcessArgs,
}

/// Load the config file, falling back to defaults when the default file is unusable.
///
/// An explicitly requested file that cannot be loaded is an error.
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Ok(Config::load_from(path)?);
    }

    // Logging isn't initialized yet, so warnings go straight to stderr.
    Ok(Config::load().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config: {e}\n  \
             Using default configuration. Config path: {}",
            Config::default_path().display()
        );
        Config::default()
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("lumabatch v{}", lumabatch_core::VERSION);

    cli::process::execute(cli.process, &config).await
}

//! Processing images: flags, dispatch, single-file mode.

mod batch;
mod setup;
pub mod types;

pub use types::Function;

use clap::Args;
use lumabatch_core::{pipeline::discovery, process_single, Config, Transform};
use std::path::PathBuf;

use batch::process_batch;
use setup::setup_processor;
use types::parse_coefficient;

/// Arguments for processing a directory (or a single image).
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Input directory containing images (or a single image file)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for processed images
    #[arg(short, long)]
    pub output: PathBuf,

    /// Processing function
    #[arg(short, long, value_enum)]
    pub function: Function,

    /// Number of worker threads (default: auto)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Luminance threshold (0-255) at which pixels start to fade
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Red weight for luma2alpha-custom (0.0-1.0)
    #[arg(long, value_parser = parse_coefficient)]
    pub coef_r: Option<f32>,

    /// Green weight for luma2alpha-custom (0.0-1.0)
    #[arg(long, value_parser = parse_coefficient)]
    pub coef_g: Option<f32>,

    /// Blue weight for luma2alpha-custom (0.0-1.0)
    #[arg(long, value_parser = parse_coefficient)]
    pub coef_b: Option<f32>,

    /// Write a per-file report (JSON, or JSON Lines for `.jsonl` paths)
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Manual Default impl for constructing ProcessArgs outside of clap.
impl Default for ProcessArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            function: Function::Luma2Alpha,
            threads: None,
            threshold: None,
            coef_r: None,
            coef_g: None,
            coef_b: None,
            report: None,
        }
    }
}

/// Options resolved by setup_processor().
#[derive(Debug, Clone)]
pub(crate) struct ProcessContext {
    pub transform: Transform,
    pub workers: usize,
}

/// Execute a processing run.
pub async fn execute(args: ProcessArgs, config: &Config) -> anyhow::Result<()> {
    let ctx = setup_processor(&args, config);

    eprintln!("Input:    {}", args.input.display());
    eprintln!("Output:   {}", args.output.display());
    eprintln!("Function: {}", args.function);
    eprintln!(
        "Threads:  {}",
        match ctx.workers {
            0 => "auto".to_string(),
            n => n.to_string(),
        }
    );

    if args.input.is_file() && discovery::is_eligible(&args.input) {
        process_one(ctx, &args).await
    } else {
        process_batch(ctx, &args).await
    }
}

/// Process a single image file.
async fn process_one(ctx: ProcessContext, args: &ProcessArgs) -> anyhow::Result<()> {
    let input = args.input.clone();
    let output_dir = args.output.clone();
    let written = tokio::task::spawn_blocking(move || {
        process_single(&input, &output_dir, ctx.transform)
    })
    .await??;

    tracing::info!("Output written to {:?}", written);
    eprintln!("\nProcessing completed successfully");
    Ok(())
}

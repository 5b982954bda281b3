//! lumabatch core - batch pixel transforms over directories of images.
//!
//! Each image in an input directory is decoded, passed through one transform
//! and written as PNG to an output directory. Files are processed in parallel
//! on a fixed-size worker pool, and a batch only returns once every file has
//! finished, successfully or not.
//!
//! # Architecture
//!
//! ```text
//! discover → [ load → transform → save ] × N on WorkerPool → BatchResult
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use lumabatch_core::{BatchCoordinator, BatchOptions, LumaParameters, Transform};
//!
//! let options = BatchOptions::new("./scans", "./out")
//!     .with_transform(Transform::LumaToAlpha(LumaParameters::with_threshold(180)));
//! let result = BatchCoordinator::new(options).run(|p| {
//!     println!("[{}/{}] {}", p.completed, p.total, p.file_name);
//! })?;
//! println!("{} succeeded, {} failed", result.succeeded(), result.failed());
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod pixel;
pub mod pool;
pub mod transform;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{BatchError, ConfigError, LumaBatchError, PipelineError, PipelineResult, Result};
pub use output::{write_report, ReportFormat, ReportWriter};
pub use pipeline::{
    process_single, BatchCoordinator, BatchOptions, BatchProgress, DiscoveredFile, ImageProcessor,
};
pub use pixel::{PixelBuffer, PixelLayout};
pub use pool::{resolve_worker_count, WorkerPool};
pub use transform::{LumaParameters, Transform};
pub use types::{BatchResult, FileOutcome, FileRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

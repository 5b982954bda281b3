//! Batch processing pipeline.
//!
//! - **discovery**: Find eligible image files in a directory
//! - **codec**: Decode files into pixel buffers, encode results as PNG
//! - **processor**: Load → transform → save for a single file
//! - **batch**: Fan files out over the worker pool and collect outcomes

pub mod batch;
pub mod codec;
pub mod discovery;
pub mod processor;

// Re-exports for convenient access
pub use batch::{BatchCoordinator, BatchOptions, BatchProgress};
pub use discovery::{DiscoveredFile, InputFormat};
pub use processor::{output_path_for, process_single, ImageProcessor};

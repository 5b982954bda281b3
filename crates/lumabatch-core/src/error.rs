//! Error types for the lumabatch pipeline.
//!
//! Errors are split by blast radius: [`BatchError`] aborts a whole run before
//! any work is scheduled, [`PipelineError`] is local to one file and only ever
//! ends up in that file's outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for lumabatch operations.
#[derive(Error, Debug)]
pub enum LumaBatchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Batch-level precondition failures
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// Per-file processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors that fail a batch as a whole. None of these leave partial output.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Input directory does not exist
    #[error("Input directory does not exist: {0}")]
    InputNotFound(PathBuf),

    /// Input path exists but is not a directory
    #[error("Input path is not a directory: {0}")]
    InputNotDirectory(PathBuf),

    /// No file in the input directory has a supported image extension
    #[error("No valid image files found in {0}")]
    NoEligibleFiles(PathBuf),

    /// Output directory could not be created
    #[error("Cannot create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Worker threads could not be spawned
    #[error("Failed to start worker pool: {0}")]
    Pool(#[source] std::io::Error),
}

/// Per-file processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading or decoding the input failed, or produced an invalid buffer
    #[error("Load error for {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// The transform produced an invalid buffer
    #[error("Transform failed for {path}: {message}")]
    Transform { path: PathBuf, message: String },

    /// Encoding or writing the PNG failed
    #[error("Save error for {path}: {message}")]
    Save { path: PathBuf, message: String },

    /// The task body panicked
    #[error("Processing panicked for {path}")]
    Panicked { path: PathBuf },
}

impl PipelineError {
    /// Name of the stage the error belongs to.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Load { .. } => "load",
            Self::Transform { .. } => "transform",
            Self::Save { .. } => "save",
            Self::Panicked { .. } => "panic",
        }
    }
}

/// Convenience type alias for lumabatch results.
pub type Result<T> = std::result::Result<T, LumaBatchError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

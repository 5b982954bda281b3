//! Per-file pipeline: load → transform → save.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{BatchError, PipelineError, PipelineResult, Result};
use crate::transform::Transform;

use super::codec;

/// Runs one transform over individual files.
///
/// Holds no mutable state, so one instance can be shared by every worker.
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    transform: Transform,
}

impl ImageProcessor {
    pub fn new(transform: Transform) -> Self {
        Self { transform }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Process one file into `output_dir`, returning the written path.
    ///
    /// The output directory must already exist.
    pub fn process(&self, input: &Path, output_dir: &Path) -> PipelineResult<PathBuf> {
        let start = Instant::now();
        tracing::debug!("Processing: {:?}", input);

        let decoded = codec::load(input)?;
        tracing::trace!("  Load: {:?}", start.elapsed());

        let transform_start = Instant::now();
        let output = self.transform.apply(&decoded);
        drop(decoded);
        if !output.is_valid() {
            return Err(PipelineError::Transform {
                path: input.to_path_buf(),
                message: format!("{} produced an invalid image", self.transform.name()),
            });
        }
        tracing::trace!("  Transform: {:?}", transform_start.elapsed());

        let save_start = Instant::now();
        let output_path = output_path_for(input, output_dir);
        codec::save_png(&output_path, &output)?;
        tracing::trace!("  Save: {:?}", save_start.elapsed());

        tracing::debug!(
            "Processed {:?} in {:?} ({}x{})",
            input,
            start.elapsed(),
            output.width(),
            output.height()
        );
        Ok(output_path)
    }
}

/// `output_dir/<input stem>.png`, whatever the input extension was.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name: OsString = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".png");
    output_dir.join(name)
}

/// Process a single file outside of a batch.
///
/// Creates `output_dir` if needed. Unlike a batch, a per-file failure is
/// returned as the error.
pub fn process_single(
    input: &Path,
    output_dir: &Path,
    transform: Transform,
) -> Result<PathBuf> {
    if !input.is_file() {
        return Err(PipelineError::Load {
            path: input.to_path_buf(),
            message: "Input file does not exist".to_string(),
        }
        .into());
    }
    std::fs::create_dir_all(output_dir).map_err(|source| BatchError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let processor = ImageProcessor::new(transform);
    Ok(processor.process(input, output_dir)?)
}

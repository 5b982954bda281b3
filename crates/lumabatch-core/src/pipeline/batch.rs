//! Batch orchestration over a [`WorkerPool`].
//!
//! Every task reports exactly one [`FileOutcome`] over a channel. The
//! coordinator thread is the only consumer, so the completed count and the
//! outcome map are never shared between threads.

use crossbeam::channel::{self, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{BatchError, PipelineError, PipelineResult};
use crate::pool::{resolve_worker_count, WorkerPool};
use crate::transform::Transform;
use crate::types::{BatchResult, FileOutcome};

use super::discovery::{self, file_name_of};
use super::processor::ImageProcessor;

/// Inputs for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory scanned (non-recursively) for images
    pub input_dir: PathBuf,
    /// Directory receiving `<stem>.png` results; created if missing
    pub output_dir: PathBuf,
    /// Transform applied to every file
    pub transform: Transform,
    /// Worker threads; `0` picks one per available CPU
    pub workers: usize,
}

impl BatchOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            transform: Transform::default(),
            workers: 0,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

/// Progress notification, sent once per finished file.
#[derive(Debug)]
pub struct BatchProgress<'a> {
    /// Files finished so far, including this one
    pub completed: usize,
    /// Eligible files in the batch
    pub total: usize,
    /// Name of the file that just finished
    pub file_name: &'a str,
    /// How it finished
    pub outcome: &'a FileOutcome,
}

/// Runs one end-to-end batch.
pub struct BatchCoordinator {
    options: BatchOptions,
}

impl BatchCoordinator {
    pub fn new(options: BatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Run the batch, calling `on_progress` on this thread once per file in
    /// completion order.
    ///
    /// Only directory-level problems fail the batch. Per-file failures are
    /// recorded in the returned [`BatchResult`].
    pub fn run<F>(&self, mut on_progress: F) -> Result<BatchResult, BatchError>
    where
        F: FnMut(&BatchProgress<'_>),
    {
        let input_dir = &self.options.input_dir;
        let output_dir = &self.options.output_dir;
        check_input_dir(input_dir)?;

        let files = discovery::discover(input_dir);
        if files.is_empty() {
            tracing::warn!("No supported image files found in {:?}", input_dir);
            return Err(BatchError::NoEligibleFiles(input_dir.clone()));
        }

        std::fs::create_dir_all(output_dir).map_err(|source| BatchError::CreateOutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let workers = resolve_worker_count(self.options.workers);
        let pool = WorkerPool::new(workers).map_err(BatchError::Pool)?;
        let total = files.len();
        tracing::info!(
            "Processing {} file(s) with {} on {} worker(s)",
            total,
            self.options.transform.name(),
            pool.num_threads()
        );

        let start = Instant::now();
        let processor = Arc::new(ImageProcessor::new(self.options.transform));
        let (tx, rx) = channel::unbounded();

        for file in files {
            let reporter = OutcomeReporter::new(tx.clone(), file.path);
            let processor = Arc::clone(&processor);
            let output_dir = output_dir.clone();
            pool.submit(move || {
                let result = processor.process(reporter.path(), &output_dir);
                reporter.finish(result);
            });
        }
        // Only the reporters hold senders now; the loop below ends once the
        // last one is gone.
        drop(tx);

        let mut result = BatchResult::new(total);
        for report in rx.iter() {
            let FileReport { file_name, outcome } = report;
            if let FileOutcome::Failed { message, .. } = &outcome {
                tracing::error!("Failed: {} - {}", file_name, message);
            }
            let completed = result.completed + 1;
            on_progress(&BatchProgress {
                completed,
                total,
                file_name: &file_name,
                outcome: &outcome,
            });
            result.record(file_name, outcome);
        }

        pool.await_drain();

        tracing::info!(
            "Batch finished in {:?}: {} succeeded, {} failed",
            start.elapsed(),
            result.succeeded(),
            result.failed()
        );
        Ok(result)
    }
}

fn check_input_dir(input_dir: &Path) -> Result<(), BatchError> {
    if !input_dir.exists() {
        return Err(BatchError::InputNotFound(input_dir.to_path_buf()));
    }
    if !input_dir.is_dir() {
        return Err(BatchError::InputNotDirectory(input_dir.to_path_buf()));
    }
    Ok(())
}

struct FileReport {
    file_name: String,
    outcome: FileOutcome,
}

/// Sends a file's outcome exactly once.
///
/// If the task unwinds or is discarded before calling [`finish`], the drop
/// reports a failure instead, so the coordinator always hears back.
///
/// [`finish`]: OutcomeReporter::finish
struct OutcomeReporter {
    tx: Sender<FileReport>,
    path: PathBuf,
    sent: bool,
}

impl OutcomeReporter {
    fn new(tx: Sender<FileReport>, path: PathBuf) -> Self {
        Self {
            tx,
            path,
            sent: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn finish(mut self, result: PipelineResult<PathBuf>) {
        self.send(result.into());
    }

    fn send(&mut self, outcome: FileOutcome) {
        if self.sent {
            return;
        }
        self.sent = true;
        let report = FileReport {
            file_name: file_name_of(&self.path),
            outcome,
        };
        // The receiver only goes away if the coordinator itself is unwinding.
        let _ = self.tx.send(report);
    }
}

impl Drop for OutcomeReporter {
    fn drop(&mut self) {
        if !self.sent {
            let result: PipelineResult<PathBuf> = Err(PipelineError::Panicked {
                path: self.path.clone(),
            });
            self.send(result.into());
        }
    }
}

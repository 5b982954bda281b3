//! Batch outcome types.
//!
//! These are what a batch run hands back to its caller, and what the CLI
//! serializes into a report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::PipelineResult;

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The transformed PNG was written
    Succeeded {
        /// Path of the written PNG
        output: PathBuf,
    },
    /// The file was counted but produced no output
    Failed {
        /// Pipeline stage that failed: load, transform, save or panic
        stage: String,
        /// Human-readable cause
        message: String,
    },
}

impl FileOutcome {
    /// Whether output was written.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

impl From<PipelineResult<PathBuf>> for FileOutcome {
    fn from(result: PipelineResult<PathBuf>) -> Self {
        match result {
            Ok(output) => Self::Succeeded { output },
            Err(e) => Self::Failed {
                stage: e.stage().to_string(),
                message: e.to_string(),
            },
        }
    }
}

/// One row of a batch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_name: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Aggregate result of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    /// Number of eligible files discovered
    pub total: usize,

    /// Number of files whose processing finished, successfully or not
    pub completed: usize,

    /// Outcome per input file name
    pub outcomes: BTreeMap<String, FileOutcome>,
}

impl BatchResult {
    /// Empty result for a batch of `total` files.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Record one finished file and return the new completed count.
    pub fn record(&mut self, file_name: String, outcome: FileOutcome) -> usize {
        self.outcomes.insert(file_name, outcome);
        self.completed += 1;
        self.completed
    }

    /// Files that produced output.
    pub fn succeeded(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_success()).count()
    }

    /// Files that were counted but produced no output.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Every discovered file has been accounted for.
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    /// Flatten into report rows, ordered by file name.
    pub fn records(&self) -> Vec<FileRecord> {
        self.outcomes
            .iter()
            .map(|(file_name, outcome)| FileRecord {
                file_name: file_name.clone(),
                outcome: outcome.clone(),
            })
            .collect()
    }
}

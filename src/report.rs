//! Per-run outcome, printed as a summary and optionally saved as JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What happened to one drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// PDF written.
    Converted,
    /// Listed only (dry run).
    Planned,
    /// Given up after a non-busy error.
    Abandoned { reason: String },
    /// Every attempt was rejected as busy.
    RetriesExhausted { reason: String },
}

impl FileStatus {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            FileStatus::Abandoned { .. } | FileStatus::RetriesExhausted { .. }
        )
    }
}

/// Outcome for a single input drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub attempts: u32,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Outcome of a whole batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Application start attempts used (0 for a dry run).
    pub init_attempts: u32,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn converted(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Converted))
    }

    pub fn failed(&self) -> usize {
        self.count(FileStatus::is_failure)
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Reports of the drawings that were not converted.
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.status.is_failure())
    }

    /// Write the report as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

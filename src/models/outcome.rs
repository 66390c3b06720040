use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Result of the write pass for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum WriteOutcome {
    Written,
    Skipped(String),
    Failed(String),
}

impl WriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::Skipped(_) => "skipped",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

/// Per-file outcomes of one run, in draft order, plus backend warnings.
///
/// Warnings never change an outcome: a backend that complains after applying
/// a write still reports that file as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    pub files: Vec<FileOutcome>,
    pub warnings: Vec<String>,
}

impl ReconciliationOutcome {
    pub fn get(&self, path: &Path) -> Option<&WriteOutcome> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| &f.outcome)
    }

    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| f.outcome.is_written())
            .map(|f| f.path.as_path())
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().filter_map(|f| match &f.outcome {
            WriteOutcome::Skipped(reason) => Some((f.path.as_path(), reason.as_str())),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().filter_map(|f| match &f.outcome {
            WriteOutcome::Failed(reason) => Some((f.path.as_path(), reason.as_str())),
            _ => None,
        })
    }

    /// No file failed.
    pub fn is_clean(&self) -> bool {
        self.failed().next().is_none()
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A file matched by the search, with the field value it held when staged.
///
/// `current` is `None` when the field is absent. The draft renders absent and
/// empty values identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub current: Option<String>,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>, current: Option<String>) -> Self {
        Self {
            path: path.into(),
            current,
        }
    }

    /// Value as shown in the draft.
    pub fn display_value(&self) -> &str {
        self.current.as_deref().unwrap_or("")
    }
}

/// Ordered candidate files plus the description pre-filled on the first line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub description: String,
    pub files: Vec<CandidateFile>,
}

impl Manifest {
    /// Manifest with an empty draft description.
    pub fn new(files: Vec<CandidateFile>) -> Self {
        Self {
            description: String::new(),
            files,
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths().any(|p| p == path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

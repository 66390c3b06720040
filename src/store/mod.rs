//! Metadata backends.
//!
//! A [`MetadataStore`] reads and writes one named field per file. Backends that
//! can process many files in one session override [`MetadataStore::read_batch`]
//! and [`MetadataStore::write_batch`]; the defaults fall back to one call per
//! file.

mod exiftool;
mod memory;

use std::path::{Path, PathBuf};

pub use exiftool::ExifToolStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::models::WriteOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Leave the backend's copy of each original file in place.
    pub preserve_originals: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            preserve_originals: true,
        }
    }
}

/// Per-path result of one batch write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<(PathBuf, WriteOutcome)>,
    /// Backend complaints that do not undo a write (e.g. teardown errors).
    pub warnings: Vec<String>,
}

impl BatchReport {
    pub fn outcome(&self, path: &Path) -> Option<&WriteOutcome> {
        self.outcomes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, outcome)| outcome)
    }
}

pub trait MetadataStore {
    /// Current value of `field`, `None` when the file does not carry it.
    fn read(&self, path: &Path, field: &str) -> Result<Option<String>, StoreError>;

    fn write(
        &mut self,
        path: &Path,
        field: &str,
        value: &str,
        options: WriteOptions,
    ) -> Result<(), StoreError>;

    /// Results in the order of `paths`.
    fn read_batch(
        &self,
        paths: &[PathBuf],
        field: &str,
    ) -> Vec<Result<Option<String>, StoreError>> {
        paths.iter().map(|p| self.read(p, field)).collect()
    }

    /// Write `value` to every path. One file's failure never stops the others.
    fn write_batch(
        &mut self,
        paths: &[PathBuf],
        field: &str,
        value: &str,
        options: WriteOptions,
    ) -> BatchReport {
        let outcomes = paths
            .iter()
            .map(|path| {
                let outcome = match self.write(path, field, value, options) {
                    Ok(()) => WriteOutcome::Written,
                    Err(e) => WriteOutcome::Failed(e.to_string()),
                };
                (path.clone(), outcome)
            })
            .collect();
        BatchReport {
            outcomes,
            warnings: Vec::new(),
        }
    }
}

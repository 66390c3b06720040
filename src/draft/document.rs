use std::fs;
use std::io::{Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::CommitError;

/// Temporary file holding the draft while the editor runs.
///
/// The file is removed when the value is dropped, on success and on every
/// abort path alike.
#[derive(Debug)]
pub struct DraftDocument {
    file: NamedTempFile,
}

impl DraftDocument {
    /// Create a hidden `.EXIF-<term>-XXXXXX` file in `dir`.
    pub fn create_in(dir: &Path, term: &str) -> Result<Self, CommitError> {
        let prefix = format!(".EXIF-{}-", file_name_safe(term));
        let file = tempfile::Builder::new()
            .prefix(&prefix)
            .tempfile_in(dir)
            .map_err(CommitError::Draft)?;
        tracing::debug!("Draft document at {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Replace the document contents and flush them to disk.
    pub fn write(&mut self, text: &str) -> Result<(), CommitError> {
        let file = self.file.as_file_mut();
        file.set_len(0)
            .and_then(|_| file.rewind())
            .and_then(|_| file.write_all(text.as_bytes()))
            .and_then(|_| file.sync_all())
            .map_err(CommitError::Draft)
    }

    /// Read the document back by path; editors may have replaced the file.
    pub fn read_back(&self) -> Result<String, CommitError> {
        Ok(fs::read_to_string(self.path())?)
    }
}

fn file_name_safe(term: &str) -> String {
    term.chars()
        .map(|c| match c {
            '/' | '\\' | '*' | '?' | '[' | ']' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

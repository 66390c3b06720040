use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::StoreError;

use super::{MetadataStore, WriteOptions};

/// Map-backed store. Keys are `(path, field)`.
///
/// Paths marked with [`MemoryStore::fail_on`] reject reads and writes, which
/// lets callers exercise partial-failure handling without touching the disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<(PathBuf, String), String>,
    failing: HashSet<PathBuf>,
    originals: HashMap<PathBuf, Vec<(String, Option<String>)>>,
    writes: Vec<(PathBuf, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, path: impl Into<PathBuf>, field: &str, value: &str) -> Self {
        self.values
            .insert((path.into(), field.to_string()), value.to_string());
        self
    }

    pub fn fail_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    pub fn value(&self, path: &Path, field: &str) -> Option<&str> {
        self.values
            .get(&(path.to_path_buf(), field.to_string()))
            .map(String::as_str)
    }

    /// Every successful write, in order.
    pub fn writes(&self) -> &[(PathBuf, String)] {
        &self.writes
    }

    /// Previous values kept for `path` while originals were preserved.
    pub fn originals(&self, path: &Path) -> &[(String, Option<String>)] {
        self.originals.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    fn check(&self, path: &Path) -> Result<(), StoreError> {
        if self.failing.contains(path) {
            return Err(StoreError::File {
                path: path.to_path_buf(),
                message: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

impl MetadataStore for MemoryStore {
    fn read(&self, path: &Path, field: &str) -> Result<Option<String>, StoreError> {
        self.check(path)?;
        Ok(self.value(path, field).map(str::to_string))
    }

    fn write(
        &mut self,
        path: &Path,
        field: &str,
        value: &str,
        options: WriteOptions,
    ) -> Result<(), StoreError> {
        self.check(path)?;
        let key = (path.to_path_buf(), field.to_string());
        let previous = self.values.insert(key, value.to_string());
        if options.preserve_originals {
            self.originals
                .entry(path.to_path_buf())
                .or_default()
                .push((field.to_string(), previous));
        }
        self.writes.push((path.to_path_buf(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WriteOutcome;

    #[test]
    fn reads_present_and_absent_values() {
        let store = MemoryStore::new().with_value("a.jpg", "ImageDescription", "old");
        assert_eq!(
            store.read(Path::new("a.jpg"), "ImageDescription").unwrap(),
            Some("old".to_string())
        );
        assert_eq!(store.read(Path::new("b.jpg"), "ImageDescription").unwrap(), None);
        assert_eq!(store.read(Path::new("a.jpg"), "XPComment").unwrap(), None);
    }

    #[test]
    fn default_batch_isolates_failures() {
        let mut store = MemoryStore::new().fail_on("2.jpg");
        let paths: Vec<PathBuf> = ["1.jpg", "2.jpg", "3.jpg"].iter().map(PathBuf::from).collect();

        let report = store.write_batch(&paths, "ImageDescription", "new", WriteOptions::default());

        assert_eq!(report.outcome(Path::new("1.jpg")), Some(&WriteOutcome::Written));
        assert!(matches!(
            report.outcome(Path::new("2.jpg")),
            Some(WriteOutcome::Failed(_))
        ));
        assert_eq!(report.outcome(Path::new("3.jpg")), Some(&WriteOutcome::Written));
        assert_eq!(store.writes().len(), 2);
    }

    #[test]
    fn originals_only_kept_when_preserved() {
        let mut store = MemoryStore::new().with_value("a.jpg", "ImageDescription", "old");
        store
            .write(
                Path::new("a.jpg"),
                "ImageDescription",
                "new",
                WriteOptions { preserve_originals: true },
            )
            .unwrap();
        store
            .write(
                Path::new("b.jpg"),
                "ImageDescription",
                "new",
                WriteOptions { preserve_originals: false },
            )
            .unwrap();

        assert_eq!(
            store.originals(Path::new("a.jpg")),
            &[("ImageDescription".to_string(), Some("old".to_string()))]
        );
        assert!(store.originals(Path::new("b.jpg")).is_empty());
        assert_eq!(store.value(Path::new("b.jpg"), "ImageDescription"), Some("new"));
    }
}

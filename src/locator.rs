//! Resolve a search term into candidate files.

use std::collections::HashSet;
use std::path::PathBuf;

use glob::{MatchOptions, Pattern};

use crate::error::CommitError;

/// Globs `<root>/*<term>*` in each root, non-recursively.
#[derive(Debug, Clone)]
pub struct FileLocator {
    roots: Vec<PathBuf>,
}

impl FileLocator {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Regular, non-hidden files matching the term. Roots are searched in
    /// order; within a root, matches come back sorted. A path found under
    /// two roots is kept once, at its first position.
    ///
    /// The term is used as a glob fragment, so it may carry wildcards.
    pub fn locate(&self, term: &str) -> Result<Vec<PathBuf>, CommitError> {
        if term.is_empty() {
            return Err(CommitError::NoSearchTerm);
        }
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for root in &self.roots {
            let root = root.to_string_lossy();
            let pattern = format!("{}/*{}*", Pattern::escape(root.trim_end_matches('/')), term);
            tracing::debug!("Searching {}", pattern);

            for entry in glob::glob_with(&pattern, options)? {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        tracing::warn!("Skipping unreadable entry: {}", e);
                        continue;
                    }
                };
                if path.is_file() && seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }
        Ok(files)
    }
}

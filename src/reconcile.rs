//! Turn an edited draft into metadata writes.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::CommitError;
use crate::models::{FileOutcome, Manifest, ParseResult, ReconciliationOutcome, WriteOutcome};
use crate::store::{MetadataStore, WriteOptions};

const NOT_STAGED: &str = "not part of the staged file list";
const REPEATED: &str = "listed more than once";

pub struct Reconciler<'a, S: MetadataStore + ?Sized> {
    store: &'a mut S,
    field: &'a str,
    options: WriteOptions,
}

impl<'a, S: MetadataStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a mut S, field: &'a str, options: WriteOptions) -> Self {
        Self {
            store,
            field,
            options,
        }
    }

    /// Apply the edited description to every listed file.
    ///
    /// Aborts with no writes when the description or the file list is empty.
    /// Only files from the staged manifest are written, each at most once,
    /// all in a single batch. The returned outcomes follow draft order.
    pub fn apply(
        &mut self,
        manifest: &Manifest,
        edit: &ParseResult,
    ) -> Result<ReconciliationOutcome, CommitError> {
        edit.validate()?;

        let mut seen = HashSet::new();
        let mut targets: Vec<PathBuf> = Vec::new();
        let mut planned: Vec<(PathBuf, Option<WriteOutcome>)> = Vec::new();
        for path in &edit.paths {
            let skip = if !manifest.contains(path) {
                Some(WriteOutcome::Skipped(NOT_STAGED.to_string()))
            } else if !seen.insert(path.clone()) {
                Some(WriteOutcome::Skipped(REPEATED.to_string()))
            } else {
                targets.push(path.clone());
                None
            };
            if let Some(WriteOutcome::Skipped(reason)) = &skip {
                tracing::warn!("Skipping {}: {}", path.display(), reason);
            }
            planned.push((path.clone(), skip));
        }

        let report = if targets.is_empty() {
            Default::default()
        } else {
            tracing::info!("Writing {} to {} file(s)", self.field, targets.len());
            self.store.write_batch(&targets, self.field, &edit.description, self.options)
        };

        let files = planned
            .into_iter()
            .map(|(path, skip)| {
                let outcome = skip.unwrap_or_else(|| {
                    report.outcome(&path).cloned().unwrap_or_else(|| {
                        WriteOutcome::Failed("backend returned no result".to_string())
                    })
                });
                if let WriteOutcome::Failed(reason) = &outcome {
                    tracing::warn!("Failed to write {}: {}", path.display(), reason);
                }
                FileOutcome { path, outcome }
            })
            .collect();

        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }

        Ok(ReconciliationOutcome {
            files,
            warnings: report.warnings,
        })
    }
}

//! One batch run: locate, stage, edit, parse, reconcile.

use std::path::PathBuf;

use crate::config::Config;
use crate::draft::{self, DraftDocument};
use crate::editor::Editor;
use crate::error::CommitError;
use crate::locator::FileLocator;
use crate::models::{CandidateFile, Manifest, ReconciliationOutcome};
use crate::reconcile::Reconciler;
use crate::store::{MetadataStore, WriteOptions};

pub struct Workflow<S, E> {
    config: Config,
    store: S,
    editor: E,
    draft_dir: PathBuf,
}

impl<S: MetadataStore, E: Editor> Workflow<S, E> {
    /// Drafts are created in the current directory.
    pub fn new(config: Config, store: S, editor: E) -> Self {
        Self {
            config,
            store,
            editor,
            draft_dir: PathBuf::from("."),
        }
    }

    pub fn with_draft_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.draft_dir = dir.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn run(&mut self, term: &str) -> Result<ReconciliationOutcome, CommitError> {
        self.config.validate()?;
        println!("Searching [{}]", term);

        let locator = FileLocator::new(self.config.search_roots());
        let paths: Vec<PathBuf> = locator
            .locate(term)?
            .into_iter()
            .filter(|path| {
                let ok = draft::can_render(path);
                if !ok {
                    tracing::warn!("Skipping {:?}: name cannot be listed in the draft", path);
                }
                ok
            })
            .collect();
        if paths.is_empty() {
            return Err(CommitError::NoMatches(term.to_string()));
        }
        tracing::info!("Found {} file(s) matching {:?}", paths.len(), term);

        let manifest = self.stage(paths);
        let text = draft::render(&manifest, &self.config);

        // Dropping the draft removes it, whichever way this function returns.
        let mut document = DraftDocument::create_in(&self.draft_dir, term)?;
        document.write(&text)?;
        self.editor.edit(document.path())?;
        let edited = document.read_back()?;

        let edit = draft::parse(&edited, &self.config);
        edit.validate()?;
        println!("New Description: {}", edit.description);

        let options = WriteOptions {
            preserve_originals: self.config.preserve_originals,
        };
        let mut reconciler = Reconciler::new(&mut self.store, &self.config.field_name, options);
        reconciler.apply(&manifest, &edit)
    }

    /// Read current values. A file whose value cannot be read is still
    /// staged, with an empty value.
    fn stage(&self, paths: Vec<PathBuf>) -> Manifest {
        let field = &self.config.field_name;
        let values = self.store.read_batch(&paths, field);
        let values = values
            .into_iter()
            .map(Some)
            .chain(std::iter::repeat_with(|| None));

        let files = paths
            .into_iter()
            .zip(values)
            .map(|(path, value)| {
                let current = match value {
                    Some(Ok(current)) => current,
                    Some(Err(e)) => {
                        tracing::warn!("Cannot read {} from {}: {}", field, path.display(), e);
                        None
                    }
                    None => {
                        tracing::warn!("No {} result for {}", field, path.display());
                        None
                    }
                };
                CandidateFile { path, current }
            })
            .collect();
        Manifest::new(files)
    }
}

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("cannot create draft document: {0}")]
    Draft(#[source] std::io::Error),

    #[error("no search term")]
    NoSearchTerm,

    #[error("no files match {0:?}")]
    NoMatches(String),

    #[error("no target files")]
    NoTargetFiles,

    #[error("no new description")]
    NoDescription,

    #[error("failed to launch editor {command:?}: {source}")]
    EditorLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("editor command {0:?} is empty or malformed")]
    EditorCommand(String),

    #[error("editor exited with {0}, change aborted")]
    EditorStatus(ExitStatus),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CommitError {
    /// Expected, explained outcomes (nothing to do) as opposed to failures.
    pub fn is_empty_input(&self) -> bool {
        matches!(
            self,
            Self::NoSearchTerm | Self::NoMatches(_) | Self::NoTargetFiles | Self::NoDescription
        )
    }
}

/// Metadata backend errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("cannot launch {program}: {message}")]
    Launch { program: String, message: String },

    #[error("{path}: {message}")]
    File { path: PathBuf, message: String },

    #[error("unreadable backend output: {0}")]
    Output(String),
}

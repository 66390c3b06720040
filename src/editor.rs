//! Hand the draft to an interactive editor.

use std::path::Path;
use std::process::Command;

use crate::error::CommitError;

pub trait Editor {
    /// Block until the user is done editing the file at `path`.
    fn edit(&self, path: &Path) -> Result<(), CommitError>;
}

impl<F> Editor for F
where
    F: Fn(&Path) -> Result<(), CommitError>,
{
    fn edit(&self, path: &Path) -> Result<(), CommitError> {
        self(path)
    }
}

/// Runs an external program on the terminal, e.g. `vim` or `code --wait`.
#[derive(Debug, Clone)]
pub struct CommandEditor {
    command: String,
}

impl CommandEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Program and leading arguments, split with shell quoting rules.
    fn argv(&self) -> Result<(String, Vec<String>), CommitError> {
        let mut words = shlex::split(&self.command)
            .filter(|w| !w.is_empty())
            .ok_or_else(|| CommitError::EditorCommand(self.command.clone()))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| CommitError::EditorCommand(self.command.clone()))?;
        Ok((program, words.collect()))
    }
}

impl Editor for CommandEditor {
    fn edit(&self, path: &Path) -> Result<(), CommitError> {
        let (program, args) = self.argv()?;
        tracing::info!("Opening {} in {}", path.display(), program);

        // No timeout: the run waits as long as the user keeps editing.
        let status = Command::new(&program)
            .args(&args)
            .arg(path)
            .status()
            .map_err(|source| CommitError::EditorLaunch {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(CommitError::EditorStatus(status));
        }
        Ok(())
    }
}

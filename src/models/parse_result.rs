use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CommitError;

/// Description and file list recovered from an edited draft.
///
/// Paths keep document order and duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub description: String,
    pub paths: Vec<PathBuf>,
}

impl ParseResult {
    /// Abort policy, applied before any write.
    ///
    /// The description is checked first: clearing the first line aborts with
    /// [`CommitError::NoDescription`] no matter what else the draft holds.
    pub fn validate(&self) -> Result<(), CommitError> {
        if self.description.trim().is_empty() {
            return Err(CommitError::NoDescription);
        }
        if self.paths.is_empty() {
            return Err(CommitError::NoTargetFiles);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_description_wins_over_empty_file_list() {
        let result = ParseResult::default();
        assert!(matches!(result.validate(), Err(CommitError::NoDescription)));
    }

    #[test]
    fn whitespace_description_is_empty() {
        let result = ParseResult {
            description: "   \t".to_string(),
            paths: vec![PathBuf::from("a.jpg")],
        };
        assert!(matches!(result.validate(), Err(CommitError::NoDescription)));
    }

    #[test]
    fn no_paths_aborts() {
        let result = ParseResult {
            description: "Summer".to_string(),
            paths: vec![],
        };
        assert!(matches!(result.validate(), Err(CommitError::NoTargetFiles)));
    }

    #[test]
    fn accepts_description_and_paths() {
        let result = ParseResult {
            description: "Summer".to_string(),
            paths: vec![PathBuf::from("a.jpg")],
        };
        assert!(result.validate().is_ok());
    }
}

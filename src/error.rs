//! Error types for workspace loading and rename.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or updating files.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The uri has no extension of a supported language.
    #[error("Unsupported language for {0}")]
    UnsupportedLanguage(String),

    /// The text does not fit the 32-bit offsets of the syntax tree.
    #[error("File {uri} is too large ({len} bytes)")]
    TextTooLarge { uri: String, len: usize },

    /// IO error during loading.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    /// Create an IO error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reasons a rename request is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    /// The declaration comes from the standard library or the stubs.
    #[error("Can not rename element from Standard Library")]
    ReadOnlyDeclaration,

    /// The cursor is not on a renameable identifier.
    #[error("Cannot rename this element")]
    NotAnIdentifier,

    /// The new name is empty or contains backticks.
    #[error("Invalid name: {0}")]
    InvalidName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_error_messages() {
        assert_eq!(
            RenameError::ReadOnlyDeclaration.to_string(),
            "Can not rename element from Standard Library"
        );
        assert_eq!(
            RenameError::InvalidName(String::new()).to_string(),
            "Invalid name: "
        );
    }

    #[test]
    fn test_analysis_error_messages() {
        let err = AnalysisError::UnsupportedLanguage("a.txt".to_string());
        assert_eq!(err.to_string(), "Unsupported language for a.txt");

        let err = AnalysisError::io(
            "/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().starts_with("IO error at /missing"));
    }
}

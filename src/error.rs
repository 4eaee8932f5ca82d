use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating or loading generator pages.
///
/// Missing sections inside a page are never reported here: extractors resolve
/// them to empty values instead.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A page that was expected to exist could not be found.
    #[error("source page not found: {}", path.display())]
    SourceNotFound { path: PathBuf },
    /// The html directory handed to the index scanner does not exist.
    #[error("html directory does not exist: {}", path.display())]
    MissingDirectory { path: PathBuf },
    /// The html directory exists but has no index page.
    #[error("index page {index_file} not found in {}", dir.display())]
    MissingIndex { dir: PathBuf, index_file: String },
    /// Any other failure while reading a page.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The pattern used to enumerate pages could not be compiled.
    #[error("invalid glob pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ExtractError {
    /// Returns `true` for setup failures that make the whole batch unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExtractError::MissingDirectory { .. }
                | ExtractError::MissingIndex { .. }
                | ExtractError::InvalidGlob { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let missing_index = ExtractError::MissingIndex {
            dir: PathBuf::from("html"),
            index_file: "annotated.html".to_string(),
        };
        assert!(missing_index.is_fatal());
        assert!(ExtractError::MissingDirectory {
            path: PathBuf::from("html")
        }
        .is_fatal());

        let not_found = ExtractError::SourceNotFound {
            path: PathBuf::from("html/classFoo.html"),
        };
        assert!(!not_found.is_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = ExtractError::MissingIndex {
            dir: PathBuf::from("html"),
            index_file: "annotated.html".to_string(),
        };
        assert_eq!(err.to_string(), "index page annotated.html not found in html");

        let err = ExtractError::SourceNotFound {
            path: PathBuf::from("classFoo.html"),
        };
        assert_eq!(err.to_string(), "source page not found: classFoo.html");
    }
}

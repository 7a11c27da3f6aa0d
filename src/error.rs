//! Error types for authoraware-merge
//!
//! Every variant aborts the run. Messages name the offending file or line so
//! the corpus can be fixed by hand.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// authoraware-merge error types
#[derive(Error, Debug)]
pub enum Error {
    /// Filename does not follow `<corpus>_<region>_<category>_<sequence>`
    #[error("Malformed filename '{name}': expected at least 4 '_'-separated tokens, found {tokens}")]
    MalformedFilename {
        /// Offending filename
        name: String,
        /// Number of tokens found
        tokens: usize,
    },

    /// Metadata file lacks required columns
    #[error("Schema error in {}: missing column(s) {}", path.display(), missing.join(", "))]
    Schema {
        /// Metadata file
        path: PathBuf,
        /// Names of the absent columns
        missing: Vec<String>,
    },

    /// Secondary dataset line is not a JSON object
    #[error("Parse error in {} at line {line}: {source}", path.display())]
    Parse {
        /// Secondary dataset file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Underlying decode failure
        source: serde_json::Error,
    },

    /// Identifier passed the filter but has no metadata (invariant violation)
    #[error("No metadata for human code '{0}'\nThe valid-code filter should have excluded it. Please report this issue.")]
    MissingMetadata(String),

    /// Human text file is not valid UTF-8
    #[error("Failed to decode {} as UTF-8", path.display())]
    Decode {
        /// Text file
        path: PathBuf,
    },

    /// Metadata CSV could not be read
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        /// Metadata file
        path: PathBuf,
        /// Underlying CSV failure
        source: csv::Error,
    },

    /// Output serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error on a known path
    #[error("IO error on {}: {source}", path.display())]
    PathIo {
        /// File or directory being accessed
        path: PathBuf,
        /// Underlying IO failure
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach a path to an IO error.
    pub(crate) fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::PathIo { path, source }
    }
}

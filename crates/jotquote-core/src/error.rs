//! Error handling
//!
//! Every failure the library reports is a `QuoteError`. None of them are
//! internal bugs: they propagate to the command line or web boundary and are
//! shown to the user as a single message.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing, storing or selecting quotes
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Quote file (or other referenced path) does not exist
    #[error("the quote file '{}' was not found", .path.display())]
    NotFound { path: PathBuf },

    /// A single line failed to parse; no line context attached yet
    #[error("{0}")]
    Parse(String),

    /// A line failed to parse, with the position it came from
    #[error("syntax error on line {line} of {source_name}: {reason}.  Line with error: \"{text}\"")]
    Syntax {
        line: usize,
        source_name: String,
        reason: String,
        text: String,
    },

    /// Invalid character in a quote field or tag
    #[error("{0}")]
    Validation(String),

    /// The same quote text appears twice in one batch or file
    #[error("a duplicate quote was found on line {line} of '{source_name}'.  Quote: \"{text}\".")]
    Duplicate {
        line: usize,
        source_name: String,
        text: String,
    },

    /// A new quote is already present in the quote file
    #[error("the quote \"{text}\" is already in the quote file {}.", .path.display())]
    AlreadyPresent { text: String, path: PathBuf },

    /// Line number selector beyond the end of the file
    #[error("the number argument {number} is too large, there are only {count} quotes in the file.")]
    NumberOutOfRange { number: usize, count: usize },

    /// More than one quote shares a fingerprint
    #[error("a hash collision occurred, more than one quote in the quote file matches hash '{hash}'.")]
    HashCollision { hash: String },

    /// A selection that must identify exactly one quote identified none
    #[error("no quote matched {0}.")]
    NoSelection(String),

    /// Unknown `line_separator` configuration value
    #[error("the value '{0}' is not valid value for the line_separator property.  Valid values are 'platform', 'windows', or 'unix'.")]
    InvalidLineSeparator(String),

    /// Existing backup is larger than the file about to be written
    #[error("the backup file '{backup}' is larger than the quote file '{file}' would be after this operation.  This is suspicious, the quote file was not modified.  If this was expected, delete the backup file and try again.")]
    BackupLarger { backup: String, file: String },

    /// Writing failed; the target file was left untouched
    #[error("an error occurred writing the quotes.  The file '{}' was not modified.", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read a file that exists
    #[error("failed to read '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl QuoteError {
    /// Create a read error with path context
    ///
    /// A missing file is reported as `NotFound` rather than a generic read failure.
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => QuoteError::NotFound { path },
            _ => QuoteError::Read {
                path,
                source: error,
            },
        }
    }
}

/// Result type for quote operations
pub type Result<T> = std::result::Result<T, QuoteError>;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while splitting CSV files.
#[derive(Error, Debug)]
pub enum SplitError {
    /// No input file was given to the run.
    #[error("Missing at least one file specification.")]
    MissingInput,

    /// The configured encoding label is not a known encoding.
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// An I/O failure on an input or output file.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A quoted field was still open when the input ended.
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: u64 },

    /// A data row whose field count differs from the header's.
    #[error(
        "File \"{}\" has an uneven row on line {line}; expected {expected} fields, got {actual} instead.",
        path.display()
    )]
    UnevenRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        actual: usize,
    },
}

impl SplitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

//! Typed errors for the input and parsing layers.
//!
//! Browser interaction errors stay as `anyhow` chains carrying the locator
//! that failed; the errors here cover the cases the tool owns end to end.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while locating or reading FASTA input.
#[derive(Debug, Error)]
pub enum FastaError {
    /// The input path names neither a file nor a directory.
    #[error("input path does not exist: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("failed to read {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to scan directory {}", .path.display())]
    Unlistable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while converting rendered result text into report rows.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A result line had fewer whitespace-separated fields than its column
    /// layout requires.
    #[error("result row has only {found} fields: {line:?}")]
    TruncatedRow { line: String, found: usize },
}

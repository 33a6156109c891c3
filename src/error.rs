//! Error taxonomy for the analysis pipeline
//!
//! Every failure in the core is fatal: the run aborts on the first error and
//! no partial reports are written, since the later tables all assume a fully
//! consistent event sequence. Each variant carries enough context (line
//! numbers, names, paths) to be shown to the user as-is.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(
        "Log file format invalid. Only RLM report formatted logs are supported. \
         ISV logs are not supported"
    )]
    InvalidFormat,

    /// A row matched an event kind but is too short for that kind's column
    /// schema. The line number is 1-based.
    #[error("Missing data on line {line}")]
    EventData { line: usize },

    /// A registry lookup failed for a name that should have been registered
    /// during extraction. Signals an internal defect, not bad input.
    #[error("No index to '{name}'")]
    InvalidIndex { name: String },

    #[error("Invalid product version formatting on line {line}")]
    InvalidProductVersion { line: usize },

    #[error("{}", open_message("file", .path))]
    CannotOpenFile { path: PathBuf },

    #[error("{}", open_message("directory", .path))]
    CannotFindDir { path: PathBuf },

    #[error("Invalid timestamp '{value}'")]
    InvalidTimestamp { value: String },
}

fn open_message(kind: &str, path: &PathBuf) -> String {
    if path.as_os_str().is_empty() {
        format!("No {} selected", kind)
    } else {
        format!("Unable to open {}: {}", kind, path.display())
    }
}

/*!
 * Error types for the tscribe core.
 *
 * This module contains custom error types for the different failure
 * families, using the thiserror crate for ergonomic error definitions.
 * No failure here is fatal: every error leaves the in-memory model in its
 * last-known-consistent state.
 */

use thiserror::Error;

/// Errors produced by the transcript editing core
#[derive(Error, Debug)]
pub enum EditorError {
    /// A file could not be read or written; the operation is aborted and
    /// the model is unchanged
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// The file being loaded is not a transcript (wrong root element);
    /// the previous model state is retained
    #[error("Incorrect file")]
    IncorrectFile,

    /// The transcript XML is structurally broken beyond what missing
    /// attributes can cover
    #[error("Malformed transcript: {0}")]
    Xml(String),

    /// A request was rejected before any mutation took place
    #[error("{0}")]
    Validation(String),

    /// The remote suggestion lookup did not answer within its window
    #[error("Reply timeout after {0} ms")]
    ReplyTimeout(u64),
}

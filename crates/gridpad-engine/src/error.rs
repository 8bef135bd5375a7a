use gridpad_core::StoreError;
use thiserror::Error;

/// Errors surfaced by engine operations. Anything not listed here is a
/// silent no-op by design of the operations themselves.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Date/Time formatting rejects the whole selection when any cell
    /// fails to parse.
    #[error("invalid date value: {0:?}")]
    InvalidDate(String),

    /// Document import rejected; the store was not touched.
    #[error("invalid file format: {0}")]
    Import(String),

    /// Saving the current state to the document format failed.
    #[error("could not serialize document: {0}")]
    Save(String),

    #[error("csv export failed: {0}")]
    Export(String),

    /// Toolbar action that has no engine implementation.
    #[error("command not implemented: {0}")]
    NotImplemented(&'static str),
}

//! Error types for the packfinder front end.

/// Top-level error type for the packfinder front end.
#[derive(Debug, thiserror::Error)]
pub enum PackfinderError {
    /// Configuration file could not be parsed or written.
    #[error("config error: {0}")]
    Config(String),

    /// Invalid command-line input.
    #[error("invalid input: {0}")]
    Input(String),

    /// Search engine error.
    #[error(transparent)]
    Search(#[from] pack_search::SearchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, PackfinderError>;

//! Error handling for sporto-core.

use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

//! Error types for the `pandoc-api` service.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failures raised while talking to the converter process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The converter wrote diagnostics to its error stream, or could not be
    /// started for a conversion.
    #[error("conversion failed: {message}")]
    ConversionFailed {
        /// Captured error-stream text.
        message: String,
    },

    /// The converter's help text could not be obtained.
    #[error("converter '{program}' is unavailable: {message}")]
    UpstreamUnavailable {
        /// Converter binary that was invoked.
        program: String,
        /// Reason the help text could not be read.
        message: String,
    },
}

/// Errors surfaced by the service outside request handling.
#[derive(Debug, Error)]
pub enum PandocApiError {
    /// Configuration sources could not be merged or deserialised.
    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// The converter could not be queried.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// Filesystem access failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The listening socket could not be opened.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Requested listen address.
        address: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other failure, described in prose.
    #[error("{0}")]
    Message(String),
}

impl From<figment::Error> for PandocApiError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Convenience alias for results carrying [`PandocApiError`].
pub type Result<T, E = PandocApiError> = std::result::Result<T, E>;

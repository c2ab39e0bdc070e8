//! Error types for pointcsvlib

use thiserror::Error;

use crate::render::RenderError;

/// Errors that can occur while streaming a report
#[derive(Error, Debug)]
pub enum PointCsvError {
    /// An ingestion call was made in a state that does not allow it
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The renderer of the active point failed on a present value
    #[error("failed to render value for point '{point}': {source}")]
    Render {
        point: String,
        #[source]
        source: RenderError,
    },

    /// A row could not be encoded
    #[error("failed to encode row: {0}")]
    Encode(#[from] csv::Error),

    /// The output sink rejected a write, flush, or close
    #[error("sink error: {0}")]
    Sink(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A recorded event could not be parsed
    #[error("invalid event on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Invalid configuration (header bundles, encoder options)
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PointCsvError {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        PointCsvError::Protocol(message.into())
    }

    /// Whether this error reports misuse of the ingestion protocol
    pub fn is_protocol(&self) -> bool {
        matches!(self, PointCsvError::Protocol(_))
    }
}

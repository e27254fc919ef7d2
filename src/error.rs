//! Error types for the grid world crate

use thiserror::Error;

use crate::environment::Tile;

/// Main error type for the grid world crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("{name} must be between 0 and 1, inclusive (got {value})")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("malformed environment description: {message}")]
    Format { message: String },

    #[error("tile {tile} is out of range (the grid has {tile_count} tiles)")]
    OutOfRange { tile: Tile, tile_count: usize },

    #[error("tile {tile} has no legal actions")]
    EmptyActionSet { tile: Tile },

    #[error("no environment has been loaded")]
    NoEnvironment,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Error::Format {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::format(source.to_string())
    }
}

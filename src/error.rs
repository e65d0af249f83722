use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid filter specification: {0}")]
    InvalidFilterSpec(String),

    #[error("Invalid band specification: {0}")]
    InvalidBandSpec(String),

    #[error("Degenerate Kaiser window: {0}")]
    DegenerateWindow(String),

    #[error("Channel mismatch: filter has {expected} channels, chunk has {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Malformed sample chunk: {0}")]
    ChunkShape(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;

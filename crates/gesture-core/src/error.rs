//! Error types for the gesture training workspace.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("recording parse error: {0}")]
    RecordingParse(String),

    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("insufficient samples: need {required} rows, have {available}")]
    InsufficientSamples { required: usize, available: usize },

    #[error("unknown gesture: {0}")]
    UnknownGesture(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("training error: {0}")]
    Training(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

//! Error types for alignment and decoding

use thiserror::Error;

/// Errors raised by the alignment pipeline
///
/// Every variant is caught by [`crate::audio::sync::Synchronizer::sync`] and
/// reported as a [`crate::audio::sync::SyncOutcome::Failure`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Empty input: {what} has no samples")]
    EmptyInput { what: &'static str },

    #[error("Invalid sample rate: {rate} Hz")]
    InvalidRate { rate: u32 },

    #[error("Numeric computation failed: {0}")]
    NumericComputation(String),
}

/// Errors raised while validating or decoding audio files
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Unsupported format: .{ext}. Supported: {supported}")]
    UnsupportedFormat { ext: String, supported: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No decodable audio track")]
    MissingTrack,

    #[error("Missing sample rate in codec parameters")]
    MissingSampleRate,

    #[error("Decoder error: {0}")]
    Symphonia(#[from] symphonia::core::errors::Error),

    #[error("Decoded stream contains no samples")]
    Empty,
}

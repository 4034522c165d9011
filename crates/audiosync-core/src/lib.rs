//! Audiosync Core - Cross-correlation alignment of audio recordings
//!
//! Estimates the time offset between two recordings of the same event by
//! locating the lag that maximizes their cross-correlation. The alignment
//! pipeline lives in [`audio`]; [`decode`] and [`processor`] turn audio files
//! into sample sequences and run the pipeline on them.

pub mod audio;
pub mod config;
pub mod decode;
pub mod error;
pub mod processor;

pub use audio::sequence::SampleSequence;
pub use audio::sync::{sync, Alignment, SyncOutcome, Synchronizer};
pub use config::SyncConfig;
pub use error::{DecodeError, SyncError};
pub use processor::{sync_audio_files, FileInfo, SyncProcessor};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (YYYY-MM-DD), set by build.rs
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "audio-sync-api";

//! File-level synchronization
//!
//! Validates and decodes two audio files, then aligns them with a
//! [`Synchronizer`]. Validation problems are returned as errors; anything that
//! goes wrong once decoding starts is reported as a [`SyncOutcome::Failure`].

use std::path::Path;

use serde::Serialize;

use crate::audio::sync::{SyncOutcome, Synchronizer};
use crate::config::SyncConfig;
use crate::decode::decode_file;
use crate::error::DecodeError;

/// File extensions accepted by [`validate_file`]
pub const SUPPORTED_FORMATS: [&str; 6] = ["wav", "mp3", "mp4", "flac", "m4a", "aac"];

/// Lowercase extension of `path`, or an empty string
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Check that `path` exists and has a supported extension
pub fn validate_file(path: &Path) -> Result<(), DecodeError> {
    if !path.exists() {
        return Err(DecodeError::NotFound(path.display().to_string()));
    }

    let ext = extension_of(path);
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(DecodeError::UnsupportedFormat {
            ext,
            supported: SUPPORTED_FORMATS.join(", "),
        });
    }
    Ok(())
}

/// Basic information about an audio file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    pub file_path: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Decodes and aligns pairs of audio files
#[derive(Debug, Clone, Default)]
pub struct SyncProcessor {
    synchronizer: Synchronizer,
}

impl SyncProcessor {
    /// Create a processor with the given alignment configuration
    pub fn new(config: SyncConfig) -> Self {
        Self {
            synchronizer: Synchronizer::new(config),
        }
    }

    /// Extensions this processor accepts
    pub fn supported_formats(&self) -> &'static [&'static str] {
        &SUPPORTED_FORMATS
    }

    /// The underlying synchronizer
    pub fn synchronizer(&self) -> &Synchronizer {
        &self.synchronizer
    }

    /// Align `target_file` against `reference_file`
    ///
    /// # Errors
    /// Returns [`DecodeError::NotFound`] or [`DecodeError::UnsupportedFormat`]
    /// when either file fails validation. Decoding and alignment failures are
    /// returned as `Ok(SyncOutcome::Failure { .. })`.
    pub fn sync_files(
        &self,
        reference_file: &Path,
        target_file: &Path,
    ) -> Result<SyncOutcome, DecodeError> {
        validate_file(reference_file)?;
        validate_file(target_file)?;

        tracing::info!(
            reference = %reference_file.display(),
            target = %target_file.display(),
            "sync_files_started"
        );

        let decoded = decode_file(reference_file)
            .and_then(|reference| decode_file(target_file).map(|target| (reference, target)));
        let (reference, target) = match decoded {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "decode_failed");
                return Ok(SyncOutcome::Failure {
                    message: e.to_string(),
                });
            }
        };

        let outcome = self.synchronizer.sync(&reference, &target);
        if let Some(offset) = outcome.offset_seconds() {
            tracing::info!(offset_seconds = offset, "sync_files_completed");
        }
        Ok(outcome)
    }

    /// Duration, rate and format of `path`
    ///
    /// # Errors
    /// Validation errors are returned; decode failures are reported in the
    /// returned [`FileInfo`] with `exists: false`.
    pub fn file_info(&self, path: &Path) -> Result<FileInfo, DecodeError> {
        validate_file(path)?;

        let file_path = path.display().to_string();
        Ok(match decode_file(path) {
            Ok(sequence) => FileInfo {
                file_path,
                exists: true,
                duration_seconds: Some(sequence.duration_seconds()),
                sample_rate: Some(sequence.sample_rate()),
                format: Some(format!(".{}", extension_of(path))),
                error: None,
            },
            Err(e) => FileInfo {
                file_path,
                exists: false,
                duration_seconds: None,
                sample_rate: None,
                format: None,
                error: Some(e.to_string()),
            },
        })
    }
}

/// Align two files with the default configuration
pub fn sync_audio_files(
    reference_file: &Path,
    target_file: &Path,
) -> Result<SyncOutcome, DecodeError> {
    SyncProcessor::default().sync_files(reference_file, target_file)
}

//! Decoded audio samples paired with their sample rate

use crate::error::SyncError;

/// An ordered run of mono samples at a fixed sample rate
///
/// Construction never fails; [`SampleSequence::validate`] is called by the
/// operations that consume a sequence so that bad input surfaces as a
/// [`SyncError`] instead of a panic.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSequence {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleSequence {
    /// Create a sequence from samples and their rate in Hz
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// The samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the sequence has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds, or 0.0 when the rate is invalid
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Check that the sequence is non-empty and has a positive rate
    ///
    /// `what` names the sequence in the error message ("reference", "target").
    pub fn validate(&self, what: &'static str) -> Result<(), SyncError> {
        if self.samples.is_empty() {
            return Err(SyncError::EmptyInput { what });
        }
        if self.sample_rate == 0 {
            return Err(SyncError::InvalidRate {
                rate: self.sample_rate,
            });
        }
        Ok(())
    }
}

//! Alignment orchestration
//!
//! Rate-matches the target to the reference, correlates the two, and turns
//! the correlation peak into a signed offset. Every error raised along the
//! way is folded into a [`SyncOutcome::Failure`]; nothing escapes as a panic.

use super::correlate::correlate_with;
use super::offset::{estimate_lag, estimate_offset};
use super::resample::resample_with;
use super::sequence::SampleSequence;
use crate::config::SyncConfig;
use crate::error::SyncError;

/// Result of a sync operation as seen by callers
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Offset of the target relative to the reference, in seconds at the reference rate
    Success { offset_seconds: f64 },
    /// Human-readable description of what went wrong
    Failure { message: String },
}

impl SyncOutcome {
    /// Whether the outcome is a success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The offset, if the sync succeeded
    pub fn offset_seconds(&self) -> Option<f64> {
        match self {
            Self::Success { offset_seconds } => Some(*offset_seconds),
            Self::Failure { .. } => None,
        }
    }
}

impl From<Result<Alignment, SyncError>> for SyncOutcome {
    fn from(result: Result<Alignment, SyncError>) -> Self {
        match result {
            Ok(alignment) => Self::Success {
                offset_seconds: alignment.offset_seconds,
            },
            Err(e) => Self::Failure {
                message: e.to_string(),
            },
        }
    }
}

/// Detailed alignment result
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Peak lag in samples at `sample_rate`
    pub lag_samples: i64,
    /// `lag_samples / sample_rate`
    pub offset_seconds: f64,
    /// Reference sample rate the lag is measured at
    pub sample_rate: u32,
}

/// Stateless aligner holding only its configuration
///
/// # Example
/// ```
/// use audiosync_core::audio::signal::sine;
/// use audiosync_core::{SampleSequence, SyncOutcome, Synchronizer};
///
/// let tone = sine(440.0, 8000, 1000, 0.5);
/// let reference = SampleSequence::new(tone.clone(), 8000);
/// let target = SampleSequence::new(tone[40..].to_vec(), 8000);
///
/// let outcome = Synchronizer::default().sync(&reference, &target);
/// assert_eq!(outcome, SyncOutcome::Success { offset_seconds: 0.005 });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Synchronizer {
    config: SyncConfig,
}

impl Synchronizer {
    /// Create a synchronizer with the given configuration
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Align `target` against `reference`, reporting failures as values
    pub fn sync(&self, reference: &SampleSequence, target: &SampleSequence) -> SyncOutcome {
        let outcome = SyncOutcome::from(self.try_sync(reference, target));
        if let SyncOutcome::Failure { message } = &outcome {
            tracing::warn!(error = %message, "sync_failed");
        }
        outcome
    }

    /// Align `target` against `reference`
    ///
    /// The reference is never resampled: when rates differ the target is
    /// brought onto the reference rate, and the lag is measured against the
    /// resampled target length.
    pub fn try_sync(
        &self,
        reference: &SampleSequence,
        target: &SampleSequence,
    ) -> Result<Alignment, SyncError> {
        reference.validate("reference")?;
        target.validate("target")?;

        let rate = reference.sample_rate();
        let resampled;
        let target = if target.sample_rate() != rate {
            resampled = resample_with(target, rate, &self.config.resample)?;
            &resampled
        } else {
            target
        };

        let method = self
            .config
            .correlation
            .resolve(reference.len(), target.len(), self.config.direct_max_product);
        let correlation = correlate_with(
            reference.samples(),
            target.samples(),
            method,
            self.config.direct_max_product,
        )?;

        let lag_samples = estimate_lag(&correlation, target.len())?;
        let offset_seconds = estimate_offset(&correlation, target.len(), rate)?;

        tracing::debug!(
            reference_len = reference.len(),
            target_len = target.len(),
            sample_rate = rate,
            %method,
            lag_samples,
            offset_seconds,
            "sync_completed"
        );

        Ok(Alignment {
            lag_samples,
            offset_seconds,
            sample_rate: rate,
        })
    }
}

/// Align with the default configuration
pub fn sync(reference: &SampleSequence, target: &SampleSequence) -> SyncOutcome {
    Synchronizer::default().sync(reference, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::correlate::CorrelationMethod;
    use crate::audio::signal::{chirp_burst, delayed, sine, NoiseGenerator};
    use approx::assert_abs_diff_eq;

    fn fft_only() -> Synchronizer {
        Synchronizer::new(SyncConfig {
            correlation: CorrelationMethod::Fft,
            ..SyncConfig::default()
        })
    }

    #[test]
    fn test_self_alignment_is_exact() {
        let noise = NoiseGenerator::new(3).samples(2000);
        let seq = SampleSequence::new(noise, 16000);
        assert_eq!(sync(&seq, &seq), SyncOutcome::Success { offset_seconds: 0.0 });
        assert_eq!(
            fft_only().sync(&seq, &seq),
            SyncOutcome::Success { offset_seconds: 0.0 }
        );
    }

    #[test]
    fn test_sine_scenario() {
        let tone = sine(440.0, 8000, 1000, 0.5);
        let reference = SampleSequence::new(tone.clone(), 8000);
        let target = SampleSequence::new(tone[40..].to_vec(), 8000);
        assert_eq!(target.len(), 960);

        for synchronizer in [Synchronizer::default(), fft_only()] {
            let offset = synchronizer
                .sync(&reference, &target)
                .offset_seconds()
                .unwrap();
            assert_abs_diff_eq!(offset, 0.005, epsilon = 1.0 / 8000.0);
        }
    }

    #[test]
    fn test_zero_filled_delay_is_negative() {
        let noise = NoiseGenerator::new(11).samples(4000);
        let reference = SampleSequence::new(noise.clone(), 8000);
        let target = SampleSequence::new(delayed(&noise, 100), 8000);

        let alignment = Synchronizer::default()
            .try_sync(&reference, &target)
            .unwrap();
        assert_eq!(alignment.lag_samples, -100);
        assert_eq!(alignment.sample_rate, 8000);
        assert_abs_diff_eq!(alignment.offset_seconds, -0.0125, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let noise = NoiseGenerator::new(5).samples(3000);
        let a = SampleSequence::new(noise[..2500].to_vec(), 8000);
        let b = SampleSequence::new(noise[300..].to_vec(), 8000);

        let ab = sync(&a, &b).offset_seconds().unwrap();
        let ba = sync(&b, &a).offset_seconds().unwrap();
        assert_abs_diff_eq!(ab, 300.0 / 8000.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ab, -ba, epsilon = 1e-12);
    }

    #[test]
    fn test_mismatched_rates_resample_target() {
        // Same burst rendered independently at each rate, 0.1 s apart
        let reference = SampleSequence::new(
            chirp_burst(16000, 16000, 0.1, 0.2, 300.0, 3000.0),
            16000,
        );
        let target = SampleSequence::new(chirp_burst(8000, 4000, 0.0, 0.2, 300.0, 3000.0), 8000);

        let alignment = Synchronizer::default()
            .try_sync(&reference, &target)
            .unwrap();
        assert_eq!(alignment.sample_rate, 16000);
        assert_abs_diff_eq!(alignment.offset_seconds, 0.1, epsilon = 1.0 / 16000.0);

        // Same-rate alignment of the same burst agrees
        let same_rate = SampleSequence::new(
            chirp_burst(16000, 8000, 0.0, 0.2, 300.0, 3000.0),
            16000,
        );
        assert_eq!(
            sync(&reference, &same_rate),
            SyncOutcome::Success { offset_seconds: 0.1 }
        );
    }

    #[test]
    fn test_offset_comes_from_estimator() {
        let noise = NoiseGenerator::new(8).samples(1500);
        let reference = SampleSequence::new(noise.clone(), 11025);
        let target = SampleSequence::new(noise[333..900].to_vec(), 11025);

        let alignment = Synchronizer::default()
            .try_sync(&reference, &target)
            .unwrap();
        let correlation = crate::audio::correlate::correlate(reference.samples(), target.samples())
            .unwrap();
        assert_eq!(alignment.lag_samples, 333);
        assert_eq!(
            Ok(alignment.offset_seconds),
            estimate_offset(&correlation, target.len(), 11025)
        );
    }

    #[test]
    fn test_downsampled_target() {
        let reference = SampleSequence::new(chirp_burst(8000, 8000, 0.25, 0.2, 300.0, 3000.0), 8000);
        let target = SampleSequence::new(
            chirp_burst(48000, 24000, 0.05, 0.2, 300.0, 3000.0),
            48000,
        );

        let alignment = Synchronizer::default()
            .try_sync(&reference, &target)
            .unwrap();
        assert_eq!(alignment.sample_rate, 8000);
        assert_abs_diff_eq!(alignment.offset_seconds, 0.2, epsilon = 1.0 / 8000.0);
    }

    #[test]
    fn test_empty_input_fails() {
        let seq = SampleSequence::new(vec![0.5; 10], 8000);
        let empty = SampleSequence::new(Vec::new(), 8000);

        assert_eq!(
            Synchronizer::default().try_sync(&seq, &empty),
            Err(SyncError::EmptyInput { what: "target" })
        );
        match sync(&empty, &seq) {
            SyncOutcome::Failure { message } => assert!(message.contains("reference")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_rate_fails() {
        let good = SampleSequence::new(vec![0.5; 10], 8000);
        let bad = SampleSequence::new(vec![0.5; 10], 0);
        assert_eq!(
            Synchronizer::default().try_sync(&good, &bad),
            Err(SyncError::InvalidRate { rate: 0 })
        );
        assert!(!sync(&bad, &good).is_success());
    }

    #[test]
    fn test_non_finite_fails() {
        let good = SampleSequence::new(vec![0.5; 10], 8000);
        let bad = SampleSequence::new(vec![0.5, f32::INFINITY], 8000);
        let outcome = sync(&good, &bad);
        assert!(matches!(outcome, SyncOutcome::Failure { .. }));
        assert_eq!(outcome.offset_seconds(), None);
    }
}

//! Band-limited sample rate conversion
//!
//! Wraps rubato's windowed-sinc resampler for whole, in-memory sequences.
//! `SincFixedIn` output is already time-aligned with its input, so output
//! sample `j` sits at time `j / target_rate`. The output length is always
//! `ceil(len * target_rate / native_rate)`.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use serde::{Deserialize, Serialize};

use super::sequence::SampleSequence;
use crate::error::SyncError;

/// Resampler quality parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Length of the windowed sinc kernel in samples
    pub sinc_len: usize,
    /// Cutoff relative to the Nyquist frequency of the lower rate
    pub f_cutoff: f32,
    /// Number of intermediate points between input samples
    pub oversampling_factor: usize,
    /// Input frames processed per resampler call
    pub chunk_size: usize,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            sinc_len: 256,
            f_cutoff: 0.95,
            oversampling_factor: 256,
            chunk_size: 1024,
        }
    }
}

/// Resample with default quality parameters
pub fn resample(samples: &SampleSequence, target_rate: u32) -> Result<SampleSequence, SyncError> {
    resample_with(samples, target_rate, &ResampleConfig::default())
}

/// Convert `samples` to `target_rate`
///
/// Returns the input unchanged when the rates already match; resampling is not
/// an exact identity, so it is skipped entirely in that case.
///
/// # Errors
/// * [`SyncError::EmptyInput`] for an empty sequence
/// * [`SyncError::InvalidRate`] for a zero native or target rate
/// * [`SyncError::NumericComputation`] for non-finite samples or resampler failures
pub fn resample_with(
    samples: &SampleSequence,
    target_rate: u32,
    config: &ResampleConfig,
) -> Result<SampleSequence, SyncError> {
    samples.validate("resampler input")?;
    if target_rate == 0 {
        return Err(SyncError::InvalidRate { rate: target_rate });
    }
    if samples.sample_rate() == target_rate {
        return Ok(samples.clone());
    }
    if let Some(i) = samples.samples().iter().position(|x| !x.is_finite()) {
        return Err(SyncError::NumericComputation(format!(
            "non-finite sample at index {} of resampler input",
            i
        )));
    }

    let ratio = target_rate as f64 / samples.sample_rate() as f64;
    let expected_len = (samples.len() as f64 * ratio).ceil() as usize;
    let input: Vec<f64> = samples.samples().iter().map(|&x| x as f64).collect();

    let params = SincInterpolationParameters {
        sinc_len: config.sinc_len,
        f_cutoff: config.f_cutoff,
        oversampling_factor: config.oversampling_factor,
        interpolation: SincInterpolationType::Cubic,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f64>::new(ratio, 1.1, params, config.chunk_size.max(1), 1)
        .map_err(|e| SyncError::NumericComputation(format!("resampler setup failed: {}", e)))?;

    let mut output: Vec<f64> = Vec::with_capacity(expected_len + config.chunk_size);
    let mut pos = 0;

    while pos + resampler.input_frames_next() <= input.len() {
        let next = resampler.input_frames_next();
        let chunk = [&input[pos..pos + next]];
        let frames = resampler.process(&chunk[..], None).map_err(process_error)?;
        output.extend_from_slice(&frames[0]);
        pos += next;
    }

    if pos < input.len() {
        let rest = [&input[pos..]];
        let frames = resampler
            .process_partial(Some(&rest[..]), None)
            .map_err(process_error)?;
        output.extend_from_slice(&frames[0]);
    }

    // Flush the filter tail with silence until the output is complete
    while output.len() < expected_len {
        let frames = resampler
            .process_partial(None::<&[&[f64]]>, None)
            .map_err(process_error)?;
        if frames[0].is_empty() {
            return Err(SyncError::NumericComputation(
                "resampler produced no output while flushing".to_string(),
            ));
        }
        output.extend_from_slice(&frames[0]);
    }

    let resampled: Vec<f32> = output[..expected_len].iter().map(|&x| x as f32).collect();

    tracing::debug!(
        from_rate = samples.sample_rate(),
        to_rate = target_rate,
        input_len = samples.len(),
        output_len = resampled.len(),
        "sequence_resampled"
    );

    Ok(SampleSequence::new(resampled, target_rate))
}

fn process_error(e: rubato::ResampleError) -> SyncError {
    SyncError::NumericComputation(format!("resampling failed: {}", e))
}

//! Full linear cross-correlation
//!
//! For every lag `k` in `-(len(b) - 1)..=len(a) - 1` the correlation is
//! `Σ a[i] · b[i - k]` over the index pairs where both sequences have a sample.
//! Position `p` of the output holds lag `p - (len(b) - 1)`.
//!
//! Two implementations are provided and must agree within floating-point
//! tolerance:
//! - [`correlate_direct`]: O(n·m) summation, exact up to f64 rounding
//! - [`correlate_fft`]: O((n+m) log(n+m)) via the correlation theorem
//!
//! Samples are stored as `f32` but every product and sum is taken in `f64`.

use std::fmt;
use std::str::FromStr;

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Largest `len(a) * len(b)` for which [`CorrelationMethod::Auto`] picks the
/// direct implementation
pub const DEFAULT_DIRECT_MAX_PRODUCT: usize = 1 << 16;

/// Which correlation implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Direct for small inputs, FFT otherwise
    #[default]
    Auto,
    /// O(n·m) summation
    Direct,
    /// Zero-padded FFT
    Fft,
}

impl CorrelationMethod {
    /// Resolve `Auto` into a concrete method for the given input lengths
    pub fn resolve(self, a_len: usize, b_len: usize, direct_max_product: usize) -> Self {
        match self {
            Self::Auto => {
                if a_len.saturating_mul(b_len) <= direct_max_product {
                    Self::Direct
                } else {
                    Self::Fft
                }
            }
            other => other,
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Direct => "direct",
            Self::Fft => "fft",
        };
        f.write_str(name)
    }
}

impl FromStr for CorrelationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "direct" => Ok(Self::Direct),
            "fft" => Ok(Self::Fft),
            other => Err(format!(
                "unknown correlation method '{}' (expected auto, direct or fft)",
                other
            )),
        }
    }
}

/// Raw, unnormalized full-mode correlation values
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationSequence {
    values: Vec<f64>,
}

impl CorrelationSequence {
    /// Wrap precomputed correlation values
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Correlation values, indexed by position
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of lags covered (`len(a) + len(b) - 1`)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no lags are covered
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Signed lag of `position` when the second input had `b_len` samples
    pub fn lag_at(position: usize, b_len: usize) -> i64 {
        position as i64 - (b_len as i64 - 1)
    }
}

/// Correlate with the default method selection
pub fn correlate(a: &[f32], b: &[f32]) -> Result<CorrelationSequence, SyncError> {
    correlate_with(a, b, CorrelationMethod::Auto, DEFAULT_DIRECT_MAX_PRODUCT)
}

/// Correlate with an explicit method
///
/// # Arguments
/// * `a` - Reference samples
/// * `b` - Target samples (same rate as `a`)
/// * `method` - Implementation to use; `Auto` is resolved with `direct_max_product`
/// * `direct_max_product` - Threshold on `len(a) * len(b)` for `Auto`
pub fn correlate_with(
    a: &[f32],
    b: &[f32],
    method: CorrelationMethod,
    direct_max_product: usize,
) -> Result<CorrelationSequence, SyncError> {
    match method.resolve(a.len(), b.len(), direct_max_product) {
        CorrelationMethod::Fft => correlate_fft(a, b),
        _ => correlate_direct(a, b),
    }
}

/// O(n·m) cross-correlation
pub fn correlate_direct(a: &[f32], b: &[f32]) -> Result<CorrelationSequence, SyncError> {
    check_inputs(a, b)?;

    let n = a.len() as isize;
    let m = b.len() as isize;
    let mut values = Vec::with_capacity((n + m - 1) as usize);

    for lag in -(m - 1)..n {
        // Valid i satisfies 0 <= i < n and 0 <= i - lag < m
        let start = lag.max(0);
        let end = n.min(m + lag);
        let b_start = (start - lag) as usize;
        let sum: f64 = a[start as usize..end as usize]
            .iter()
            .zip(&b[b_start..])
            .map(|(&x, &y)| x as f64 * y as f64)
            .sum();
        values.push(sum);
    }

    tracing::trace!(
        a_len = a.len(),
        b_len = b.len(),
        method = "direct",
        "correlation_computed"
    );
    finish(values)
}

/// FFT-based cross-correlation
///
/// Both inputs are zero-padded to the next power of two that holds the full
/// output, so the circular correlation computed in the frequency domain has no
/// wrap-around aliasing.
pub fn correlate_fft(a: &[f32], b: &[f32]) -> Result<CorrelationSequence, SyncError> {
    check_inputs(a, b)?;

    let m = b.len();
    let out_len = a.len() + m - 1;
    let fft_size = out_len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(fft_size);
    let inverse = planner.plan_fft_inverse(fft_size);

    let mut spectrum = zero_padded(a, fft_size);
    let mut target_spectrum = zero_padded(b, fft_size);
    forward.process(&mut spectrum);
    forward.process(&mut target_spectrum);

    // Multiply with the conjugate of the target spectrum for correlation
    for (x, y) in spectrum.iter_mut().zip(&target_spectrum) {
        *x *= y.conj();
    }
    inverse.process(&mut spectrum);

    // rustfft does not normalize the inverse transform.
    // Negative lags wrap to the end of the circular buffer.
    let norm = 1.0 / fft_size as f64;
    let values: Vec<f64> = (0..out_len)
        .map(|p| spectrum[(p + fft_size + 1 - m) % fft_size].re * norm)
        .collect();

    tracing::trace!(
        a_len = a.len(),
        b_len = b.len(),
        fft_size,
        method = "fft",
        "correlation_computed"
    );
    finish(values)
}

fn zero_padded(samples: &[f32], size: usize) -> Vec<Complex<f64>> {
    samples
        .iter()
        .map(|&x| Complex::new(x as f64, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(size)
        .collect()
}

fn check_inputs(a: &[f32], b: &[f32]) -> Result<(), SyncError> {
    if a.is_empty() {
        return Err(SyncError::EmptyInput {
            what: "reference correlation input",
        });
    }
    if b.is_empty() {
        return Err(SyncError::EmptyInput {
            what: "target correlation input",
        });
    }
    for (name, samples) in [("reference", a), ("target", b)] {
        if let Some(i) = samples.iter().position(|x| !x.is_finite()) {
            return Err(SyncError::NumericComputation(format!(
                "non-finite sample at index {} of {} correlation input",
                i, name
            )));
        }
    }
    Ok(())
}

fn finish(values: Vec<f64>) -> Result<CorrelationSequence, SyncError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(SyncError::NumericComputation(
            "correlation produced non-finite values".to_string(),
        ));
    }
    Ok(CorrelationSequence::from_values(values))
}

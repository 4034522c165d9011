//! Correlation peak to time offset
//!
//! The peak position `p` of a full-mode correlation maps to the lag
//! `p - (target_len - 1)`; dividing by the reference rate gives seconds.
//! A positive lag means the target's content begins that many samples into
//! the reference.

use super::correlate::CorrelationSequence;
use crate::error::SyncError;

/// Index of the largest value, ties resolved to the lowest index
///
/// Returns `None` for an empty slice. Values are expected to be finite.
pub fn peak_index(values: &[f64]) -> Option<usize> {
    let mut iter = values.iter().enumerate();
    let (mut best_idx, mut best_val) = match iter.next() {
        Some((i, &v)) => (i, v),
        None => return None,
    };
    for (i, &v) in iter {
        // Strict comparison keeps the first maximum
        if v > best_val {
            best_val = v;
            best_idx = i;
        }
    }
    Some(best_idx)
}

/// Signed lag in samples of the correlation peak
///
/// # Arguments
/// * `correlation` - Full-mode correlation of reference against target
/// * `target_len` - Length of the target that was correlated
pub fn estimate_lag(correlation: &CorrelationSequence, target_len: usize) -> Result<i64, SyncError> {
    if correlation.is_empty() {
        return Err(SyncError::EmptyInput {
            what: "correlation",
        });
    }
    if target_len == 0 {
        return Err(SyncError::EmptyInput { what: "target" });
    }
    if target_len > correlation.len() {
        return Err(SyncError::NumericComputation(format!(
            "target length {} exceeds correlation length {}",
            target_len,
            correlation.len()
        )));
    }
    if correlation.values().iter().any(|v| !v.is_finite()) {
        return Err(SyncError::NumericComputation(
            "correlation contains non-finite values".to_string(),
        ));
    }

    let peak = peak_index(correlation.values()).ok_or(SyncError::EmptyInput {
        what: "correlation",
    })?;
    Ok(CorrelationSequence::lag_at(peak, target_len))
}

/// Offset in seconds of the correlation peak, measured at `reference_rate`
///
/// No rounding is applied beyond the division.
pub fn estimate_offset(
    correlation: &CorrelationSequence,
    target_len: usize,
    reference_rate: u32,
) -> Result<f64, SyncError> {
    if reference_rate == 0 {
        return Err(SyncError::InvalidRate {
            rate: reference_rate,
        });
    }
    let lag = estimate_lag(correlation, target_len)?;
    Ok(lag as f64 / reference_rate as f64)
}

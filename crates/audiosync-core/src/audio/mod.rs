//! Alignment pipeline
//!
//! Leaves first:
//! - Sample sequences with their rate ([`sequence`])
//! - Band-limited rate conversion ([`resample`])
//! - Full linear cross-correlation, direct and FFT ([`correlate`])
//! - Peak location and lag-to-seconds conversion ([`offset`])
//! - The orchestrator that ties them together ([`sync`])
//! - Deterministic test signals ([`signal`])

pub mod correlate;
pub mod offset;
pub mod resample;
pub mod sequence;
pub mod signal;
pub mod sync;

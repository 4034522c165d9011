//! Deterministic test signals
//!
//! Reproducible sources for exercising the alignment pipeline: pure tones,
//! white noise from a fixed-seed LCG, and maximum length sequences whose
//! autocorrelation is a single sharp peak. [`write_wav`] stores them as
//! fixture files for the decoder.

use std::f64::consts::TAU;
use std::io::Write;
use std::path::Path;

/// Generate `len` samples of a sine tone
///
/// # Arguments
/// * `frequency` - Tone frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `len` - Number of samples
/// * `amplitude` - Peak amplitude
pub fn sine(frequency: f64, sample_rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
    let step = TAU * frequency / sample_rate as f64;
    (0..len)
        .map(|i| (step * i as f64).sin() as f32 * amplitude)
        .collect()
}

/// Delay `samples` by `delay` samples, zero-filling the start and keeping the length
pub fn delayed(samples: &[f32], delay: usize) -> Vec<f32> {
    let keep = samples.len().saturating_sub(delay);
    std::iter::repeat(0.0)
        .take(samples.len() - keep)
        .chain(samples[..keep].iter().copied())
        .collect()
}

/// Hann-windowed linear chirp sampled at `sample_rate`
///
/// The burst is defined in continuous time, so the same parameters give the
/// same waveform at any rate as long as `end_frequency` stays below Nyquist.
///
/// # Arguments
/// * `sample_rate` - Sample rate in Hz
/// * `len` - Number of samples; everything outside the burst is silence
/// * `start` - Burst start time in seconds
/// * `duration` - Burst length in seconds
/// * `start_frequency`, `end_frequency` - Sweep range in Hz
pub fn chirp_burst(
    sample_rate: u32,
    len: usize,
    start: f64,
    duration: f64,
    start_frequency: f64,
    end_frequency: f64,
) -> Vec<f32> {
    let sweep = (end_frequency - start_frequency) / duration;
    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate as f64 - start;
            if t <= 0.0 || t >= duration {
                return 0.0;
            }
            let window = 0.5 - 0.5 * (TAU * t / duration).cos();
            let phase = TAU * (start_frequency * t + 0.5 * sweep * t * t);
            (0.5 * window * phase.sin()) as f32
        })
        .collect()
}

/// White noise source
///
/// Uses a linear congruential generator so sequences are identical across
/// runs and platforms.
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    state: u32,
}

impl NoiseGenerator {
    /// Peak amplitude of generated samples
    pub const AMPLITUDE: f32 = 0.5;

    /// Create a generator with the given seed
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next sample in `-AMPLITUDE..AMPLITUDE`
    pub fn next_sample(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(1103515245).wrapping_add(12345);
        let bits = (self.state >> 16) & 0x7FFF;
        (bits as f32 / 16384.0 - 1.0) * Self::AMPLITUDE
    }

    /// Collect `len` samples
    pub fn samples(&mut self, len: usize) -> Vec<f32> {
        (0..len).map(|_| self.next_sample()).collect()
    }
}

/// Maximum length sequence of `2^order - 1` bipolar samples (±1.0)
///
/// Returns `None` for orders outside 2..=16.
pub fn mls(order: u32) -> Option<Vec<f32>> {
    // Galois LFSR feedback masks for maximal-length polynomials
    let mask: u32 = match order {
        2 => 0x3,
        3 => 0x6,
        4 => 0xC,
        5 => 0x14,
        6 => 0x30,
        7 => 0x60,
        8 => 0xB8,
        9 => 0x110,
        10 => 0x240,
        11 => 0x500,
        12 => 0xE08,
        13 => 0x1C80,
        14 => 0x3802,
        15 => 0x6000,
        16 => 0xB400,
        _ => return None,
    };

    let length = (1usize << order) - 1;
    let mut lfsr: u32 = 1;
    let sequence = (0..length)
        .map(|_| {
            let bit = lfsr & 1;
            lfsr >>= 1;
            if bit == 1 {
                lfsr ^= mask;
                1.0
            } else {
                -1.0
            }
        })
        .collect();
    Some(sequence)
}

/// Write interleaved samples as a 16-bit PCM WAV file
///
/// Samples are clamped to -1.0..=1.0 before quantization.
pub fn write_wav(
    path: &Path,
    interleaved: &[f32],
    channels: u16,
    sample_rate: u32,
) -> std::io::Result<()> {
    let block_align = channels as u32 * 2;
    let data_len = interleaved.len() as u32 * 2;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * block_align).to_le_bytes());
    bytes.extend_from_slice(&(block_align as u16).to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for &sample in interleaved {
        let quantized = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
        bytes.extend_from_slice(&quantized.to_le_bytes());
    }

    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    file.flush()
}

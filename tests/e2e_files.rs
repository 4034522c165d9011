//! E2E tests for file decoding and file-level synchronization
//!
//! Fixtures are written as 16-bit PCM WAV files into a temporary directory.

use approx::assert_abs_diff_eq;
use audiosync::audio::signal::{chirp_burst, write_wav, NoiseGenerator};
use audiosync::decode::decode_file;
use audiosync::{sync_audio_files, DecodeError, SyncConfig, SyncOutcome, SyncProcessor};
use std::path::PathBuf;

fn fixture(
    dir: &tempfile::TempDir,
    name: &str,
    samples: &[f32],
    channels: u16,
    rate: u32,
) -> PathBuf {
    let path = dir.path().join(name);
    write_wav(&path, samples, channels, rate).unwrap();
    path
}

/// Test that stereo files are averaged down to one channel
#[test]
fn test_decode_downmixes_stereo() {
    let dir = tempfile::tempdir().unwrap();
    let left = NoiseGenerator::new(3).samples(500);
    let interleaved: Vec<f32> = left.iter().flat_map(|&x| [x, x * 0.5]).collect();
    let path = fixture(&dir, "stereo.wav", &interleaved, 2, 22050);

    let decoded = decode_file(&path).unwrap();
    assert_eq!(decoded.sample_rate(), 22050);
    assert_eq!(decoded.len(), 500);
    for (got, x) in decoded.samples().iter().zip(&left) {
        assert_abs_diff_eq!(*got, x * 0.75, epsilon = 1e-3);
    }
}

/// Test that files at the same rate align to the exact sample
#[test]
fn test_sync_wav_pair() {
    let dir = tempfile::tempdir().unwrap();
    let noise = NoiseGenerator::new(5).samples(16000);
    let reference = fixture(&dir, "reference.wav", &noise, 1, 16000);
    let target = fixture(&dir, "target.WAV", &noise[4000..12000], 1, 16000);

    let outcome = sync_audio_files(&reference, &target).unwrap();
    assert_eq!(outcome, SyncOutcome::Success { offset_seconds: 0.25 });
}

/// Test that a target stored at a lower rate is measured at the reference rate
#[test]
fn test_sync_wav_pair_mixed_rates() {
    let dir = tempfile::tempdir().unwrap();
    let reference = fixture(
        &dir,
        "reference.wav",
        &chirp_burst(16000, 16000, 0.3, 0.2, 300.0, 3000.0),
        1,
        16000,
    );
    let target = fixture(
        &dir,
        "target.wav",
        &chirp_burst(8000, 4000, 0.05, 0.2, 300.0, 3000.0),
        1,
        8000,
    );

    let outcome = SyncProcessor::default()
        .sync_files(&reference, &target)
        .unwrap();
    assert_abs_diff_eq!(outcome.offset_seconds().unwrap(), 0.25, epsilon = 1.0 / 16000.0);
}

/// Test that a configured processor gives the same answer
#[test]
fn test_sync_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("sync.json");
    std::fs::write(&config_path, r#"{"correlation": "direct"}"#).unwrap();
    let config = SyncConfig::load(&config_path);

    let noise = NoiseGenerator::new(13).samples(600);
    let reference = fixture(&dir, "a.wav", &noise, 1, 8000);
    let target = fixture(&dir, "b.wav", &noise[80..], 1, 8000);

    let outcome = SyncProcessor::new(config)
        .sync_files(&reference, &target)
        .unwrap();
    assert_eq!(outcome, SyncOutcome::Success { offset_seconds: 0.01 });
}

/// Test that validation errors surface before any decoding
#[test]
fn test_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let good = fixture(&dir, "good.wav", &[0.1; 100], 1, 8000);
    let text = dir.path().join("notes.ogg");
    std::fs::write(&text, b"OggS").unwrap();

    let missing = sync_audio_files(&good, &dir.path().join("absent.mp3")).unwrap_err();
    assert!(matches!(missing, DecodeError::NotFound(_)));

    let unsupported = sync_audio_files(&text, &good).unwrap_err();
    assert!(matches!(unsupported, DecodeError::UnsupportedFormat { .. }));
}

/// Test that a file with no samples becomes a failure outcome
#[test]
fn test_empty_wav_is_failure() {
    let dir = tempfile::tempdir().unwrap();
    let good = fixture(&dir, "good.wav", &NoiseGenerator::new(1).samples(100), 1, 8000);
    let empty = fixture(&dir, "empty.wav", &[], 1, 8000);

    let outcome = sync_audio_files(&good, &empty).unwrap();
    assert!(!outcome.is_success());
}

/// Test the file information report
#[test]
fn test_file_info_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "clip.wav", &vec![0.0; 44100], 2, 44100);

    let info = SyncProcessor::default().file_info(&path).unwrap();
    assert!(info.exists);
    assert_eq!(info.sample_rate, Some(44100));
    assert_abs_diff_eq!(info.duration_seconds.unwrap(), 0.5, epsilon = 1e-9);

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["format"], ".wav");
    assert!(json.get("error").is_none());
}

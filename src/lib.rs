//! Audiosync - cross-correlation alignment of audio recordings
//!
//! This library re-exports the alignment core from `audiosync-core` and the
//! HTTP service from `audiosync-server`.

pub use audiosync_core::{audio, config, decode, error, processor};
pub use audiosync_server as server;

pub use audiosync_core::{sync, sync_audio_files, Alignment, SampleSequence, SyncOutcome};
pub use audiosync_core::{DecodeError, FileInfo, SyncConfig, SyncError, SyncProcessor, Synchronizer};
pub use audiosync_core::{BUILD_DATE, SERVICE_NAME, VERSION};

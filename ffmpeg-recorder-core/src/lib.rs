//! # ffmpeg-recorder-core
//!
//! Frame-paced recording engine that streams raw video frames or PCM audio
//! into an external ffmpeg process over its stdin.
//!
//! Provides pacing, a single-producer/single-consumer sample queue, encoder
//! process management, thumbnail extraction and session orchestration. The
//! encoder binary and the capture device list plug in through the
//! `EncoderLauncher` and `DeviceEnumerator` traits.
//!
//! ## Architecture
//!
//! ```text
//! ffmpeg-recorder-core (this crate)
//! ├── traits/       ← EncoderLauncher, EncoderProcess, DeviceEnumerator, RecorderDelegate
//! ├── models/       ← RecorderError, SessionState, RecordingConfig, Sample, devices
//! ├── processing/   ← PacingController, AudioLedger, SampleQueue
//! ├── encoder/      ← EncoderCommand, EncoderPipe, ProcessLauncher, ThumbnailExtractor
//! ├── session/      ← RecordingSession (orchestrator)
//! └── storage/      ← checksum, metadata sidecar
//! ```

pub mod encoder;
pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use encoder::command::EncoderCommand;
pub use encoder::pipe::{EncoderPipe, PipeWriter};
pub use encoder::process::ProcessLauncher;
pub use encoder::thumbnail::{Crop, ThumbnailExtractor, ThumbnailRequest};
pub use models::config::RecordingConfig;
pub use models::device::{AudioDevice, VideoDevice};
pub use models::error::RecorderError;
pub use models::recording_result::{RecordingMetadata, RecordingResult};
pub use models::sample::{AudioFormat, PixelFormat, Sample, SampleKind};
pub use models::state::{RecordingMode, SessionDiagnostics, SessionState};
pub use processing::pacing::{AudioLedger, PacingController};
pub use processing::sample_queue::{SampleConsumer, SampleProducer};
pub use session::recorder::RecordingSession;
pub use traits::device_enumerator::DeviceEnumerator;
pub use traits::encoder_launcher::{EncoderInput, EncoderLauncher, EncoderProcess};
pub use traits::recorder_delegate::RecorderDelegate;

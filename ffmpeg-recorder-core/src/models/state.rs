use serde::{Deserialize, Serialize};

/// Which kind of recording a session is running.
///
/// The capability flags replace separate recorder variants: pause and the
/// frame/buffer ingestion API only exist for the pipe modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingMode {
    /// The encoder captures straight from the default camera/microphone.
    DefaultDevice,
    /// Raw video frames are piped through stdin.
    CustomVideo,
    /// Raw PCM buffers are piped through stdin.
    CustomAudio,
}

impl RecordingMode {
    pub fn is_custom(&self) -> bool {
        !matches!(self, Self::DefaultDevice)
    }

    pub fn supports_pause(&self) -> bool {
        self.is_custom()
    }

    pub fn supports_audio(&self) -> bool {
        matches!(self, Self::CustomAudio)
    }

    pub fn accepts_frames(&self) -> bool {
        matches!(self, Self::CustomVideo)
    }
}

/// Recording session state machine.
///
/// State transitions:
/// ```text
/// idle → recording ⇄ paused
///           ↓          ↓
///      stopped / cancelled → idle
/// ```
///
/// `Stopped` and `Cancelled` are reported to the delegate once; the session
/// then returns to `Idle` and can be started again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "mode")]
pub enum SessionState {
    Idle,
    Recording(RecordingMode),
    Paused(RecordingMode),
    Stopped,
    Cancelled,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle | Self::Stopped | Self::Cancelled)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording(_))
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused(_))
    }

    /// True while an encoder process belongs to the session.
    pub fn is_active(&self) -> bool {
        self.mode().is_some()
    }

    pub fn mode(&self) -> Option<RecordingMode> {
        match self {
            Self::Recording(mode) | Self::Paused(mode) => Some(*mode),
            _ => None,
        }
    }
}

/// Counters for debugging a session's consumer side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDiagnostics {
    /// Slots written to the encoder.
    pub slots_written: u64,
    pub bytes_written: u64,
    pub write_failures: u64,
    /// Samples dropped by the consumer after a cancel.
    pub samples_discarded: u64,
    /// Samples queued but not yet written.
    pub backlog: usize,
}

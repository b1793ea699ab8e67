use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::state::RecordingMode;

/// Result returned when a session is stopped gracefully.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingResult {
    pub file_path: PathBuf,
    pub mode: RecordingMode,
    /// Encoder-visible video duration (`slots / fps`).
    pub recorded_duration_secs: f64,
    pub recorded_audio_duration_secs: f64,
    pub frames_accounted: u64,
    /// SHA-256 of the finished file, when metadata was requested.
    pub checksum: Option<String>,
}

/// Sidecar metadata describing a finished recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub mode: RecordingMode,
    pub file_path: String,
    pub recorded_duration_secs: f64,
    pub recorded_audio_duration_secs: f64,
    pub frames: u64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub video_codec: String,
    pub checksum: String,
    pub created_at: String,
}

impl RecordingMetadata {
    pub fn new(result: &RecordingResult, fps: f64, width: u32, height: u32, video_codec: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mode: result.mode,
            file_path: result.file_path.to_string_lossy().into_owned(),
            recorded_duration_secs: result.recorded_duration_secs,
            recorded_audio_duration_secs: result.recorded_audio_duration_secs,
            frames: result.frames_accounted,
            fps,
            width,
            height,
            video_codec: video_codec.to_string(),
            checksum: result.checksum.clone().unwrap_or_default(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

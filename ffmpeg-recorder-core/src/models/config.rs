use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::device::{AudioDevice, VideoDevice};
use super::sample::{AudioFormat, PixelFormat};
use super::state::RecordingMode;

/// Configuration for a recording session.
///
/// A session snapshots this when it starts; changes made while recording only
/// apply to the next session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Encoder binary, resolved through `PATH` when relative (default: `ffmpeg`).
    pub encoder_path: PathBuf,

    /// File the encoder writes.
    pub output_path: PathBuf,

    /// Replace an existing output file instead of refusing to start (default: false).
    pub overwrite: bool,

    /// Target encoder frame rate (default: 30).
    pub fps: f64,

    /// Video bit rate in kbit/s (default: 2000).
    pub bit_rate_kbps: u32,

    /// Output video codec (default: `mpeg4`).
    pub video_codec: String,

    pub width: u32,
    pub height: u32,

    /// Layout of frames passed to `add_frame` (default: packed RGB).
    pub pixel_format: PixelFormat,

    /// Audio sample rate in Hz (default: 44100).
    pub audio_sample_rate: u32,

    /// PCM frames per buffer delivered by the capture callback (default: 1024).
    pub audio_buffer_size: u32,

    pub audio_channels: u16,
    pub audio_format: AudioFormat,

    /// Output audio codec; the encoder picks one from the extension when unset.
    pub audio_codec: Option<String>,

    /// Default-device mode: capture the camera.
    pub record_video: bool,

    /// Default-device mode: capture the microphone.
    pub record_audio: bool,

    /// Default-device mode: stop after this many seconds (None = until stopped).
    pub capture_duration_secs: Option<f64>,

    /// Camera used by default-device mode; resolved on first use when unset.
    pub video_device: VideoDevice,

    /// Microphone used by default-device mode; resolved on first use when unset.
    pub audio_device: AudioDevice,

    /// Extra arguments placed before the input source.
    pub additional_input_args: Vec<String>,

    /// Extra arguments placed before the output path.
    pub additional_output_args: Vec<String>,

    /// Hash the finished file and write a `.metadata.json` sidecar on stop.
    pub write_metadata: bool,
}

impl RecordingConfig {
    /// Config for piping `width`x`height` frames at `fps`.
    pub fn video(output_path: impl Into<PathBuf>, width: u32, height: u32, fps: f64) -> Self {
        Self {
            output_path: output_path.into(),
            width,
            height,
            fps,
            ..Default::default()
        }
    }

    /// Bytes of one packed video frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * self.pixel_format.bytes_per_pixel()
    }

    /// Capture buffers delivered per second at the configured audio settings.
    pub fn audio_buffers_per_second(&self) -> f64 {
        if self.audio_buffer_size == 0 {
            return 0.0;
        }
        self.audio_sample_rate as f64 / self.audio_buffer_size as f64
    }

    pub fn validate(&self, mode: RecordingMode) -> Result<(), String> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(format!("frame rate must be positive, got {}", self.fps));
        }
        if self.encoder_path.as_os_str().is_empty() {
            return Err("encoder path is empty".into());
        }
        match mode {
            RecordingMode::CustomVideo => {
                if self.width == 0 || self.height == 0 {
                    return Err(format!("invalid video size {}x{}", self.width, self.height));
                }
                if self.video_codec.is_empty() {
                    return Err("video codec is empty".into());
                }
            }
            RecordingMode::CustomAudio => {
                if self.audio_sample_rate == 0 {
                    return Err("audio sample rate must be positive".into());
                }
                if self.audio_channels == 0 {
                    return Err("audio channel count must be positive".into());
                }
            }
            RecordingMode::DefaultDevice => {
                if !self.record_video && !self.record_audio {
                    return Err("nothing to record: enable video or audio".into());
                }
                if let Some(secs) = self.capture_duration_secs {
                    if !secs.is_finite() || secs < 0.0 {
                        return Err(format!("invalid capture duration {}", secs));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            encoder_path: PathBuf::from("ffmpeg"),
            output_path: PathBuf::new(),
            overwrite: false,
            fps: 30.0,
            bit_rate_kbps: 2000,
            video_codec: "mpeg4".into(),
            width: 0,
            height: 0,
            pixel_format: PixelFormat::Rgb24,
            audio_sample_rate: 44100,
            audio_buffer_size: 1024,
            audio_channels: 1,
            audio_format: AudioFormat::F32le,
            audio_codec: None,
            record_video: true,
            record_audio: false,
            capture_duration_secs: None,
            video_device: VideoDevice::default(),
            audio_device: AudioDevice::default(),
            additional_input_args: Vec::new(),
            additional_output_args: Vec::new(),
            write_metadata: false,
        }
    }
}

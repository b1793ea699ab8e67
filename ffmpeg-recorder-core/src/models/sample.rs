use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Packed pixel layout of a raw video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    #[default]
    Rgb24,
    Rgba,
    Bgr24,
    Bgra,
    Gray,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgb24 | Self::Bgr24 => 3,
            Self::Rgba | Self::Bgra => 4,
            Self::Gray => 1,
        }
    }

    /// Name passed to the encoder's `-pix_fmt`.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            Self::Rgb24 => "rgb24",
            Self::Rgba => "rgba",
            Self::Bgr24 => "bgr24",
            Self::Bgra => "bgra",
            Self::Gray => "gray",
        }
    }
}

/// Sample encoding of raw PCM audio buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    F32le,
    S16le,
}

impl AudioFormat {
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            Self::F32le => 4,
            Self::S16le => 2,
        }
    }

    /// Name passed to the encoder's input `-f`.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            Self::F32le => "f32le",
            Self::S16le => "s16le",
        }
    }
}

/// What a sample carries, with the dimensions needed to size it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    VideoFrame {
        width: u32,
        height: u32,
        format: PixelFormat,
    },
    AudioChunk {
        channels: u16,
        format: AudioFormat,
    },
}

/// One unit of captured data queued for encoding.
///
/// The bytes live behind an `Arc` so a frame duplicated across several slots
/// shares one allocation; it is released once the last slot is written.
#[derive(Debug, Clone)]
pub struct Sample {
    kind: SampleKind,
    data: Arc<[u8]>,
}

impl Sample {
    /// Wrap a packed video frame.
    pub fn video(width: u32, height: u32, format: PixelFormat, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            kind: SampleKind::VideoFrame { width, height, format },
            data: data.into(),
        }
    }

    /// Wrap an interleaved PCM buffer.
    pub fn audio(channels: u16, format: AudioFormat, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            kind: SampleKind::AudioChunk { channels, format },
            data: data.into(),
        }
    }

    /// Interleaved f32 samples as little-endian PCM bytes.
    pub fn audio_from_f32(channels: u16, samples: &[f32]) -> Self {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self::audio(channels, AudioFormat::F32le, bytes)
    }

    pub fn kind(&self) -> SampleKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_video(&self) -> bool {
        matches!(self.kind, SampleKind::VideoFrame { .. })
    }

    /// Byte length a video frame of this kind must have.
    pub fn expected_frame_len(&self) -> Option<usize> {
        match self.kind {
            SampleKind::VideoFrame { width, height, format } => {
                Some(width as usize * height as usize * format.bytes_per_pixel())
            }
            SampleKind::AudioChunk { .. } => None,
        }
    }

    /// Number of PCM frames (samples per channel) in an audio chunk.
    pub fn audio_frames(&self) -> Option<usize> {
        match self.kind {
            SampleKind::AudioChunk { channels, format } => {
                let frame_bytes = channels.max(1) as usize * format.bytes_per_sample();
                Some(self.data.len() / frame_bytes)
            }
            SampleKind::VideoFrame { .. } => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn share_count(&self) -> usize {
        Arc::strong_count(&self.data)
    }
}

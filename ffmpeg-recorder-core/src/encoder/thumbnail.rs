//! Single-frame extraction from a finished recording.

use std::path::{Path, PathBuf};
use std::thread;

use serde::{Deserialize, Serialize};

use crate::encoder::command::EncoderCommand;
use crate::models::error::RecorderError;
use crate::traits::encoder_launcher::{EncoderLauncher, EncoderProcess};

/// Crop rectangle in source pixels. A zero-sized rectangle means no crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Crop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Crop {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_zero(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Which frame to grab and where to put it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThumbnailRequest {
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
    pub output_path: PathBuf,
    /// Scale to this size; `(0, 0)` keeps the source size.
    pub size: (u32, u32),
    pub crop: Crop,
    /// Video to read; the session's output file when `None`.
    pub source_path: Option<PathBuf>,
}

impl ThumbnailRequest {
    pub fn new(hour: u32, minute: u32, second: f64, output_path: impl Into<PathBuf>) -> Self {
        Self {
            hour,
            minute,
            second,
            output_path: output_path.into(),
            ..Default::default()
        }
    }

    /// Seek position in `HH:MM:SS.mmm` form.
    pub fn timestamp(&self) -> String {
        format!("{:02}:{:02}:{:06.3}", self.hour, self.minute, self.second)
    }

    /// The `-vf` filter chain, if any scaling or cropping was asked for.
    pub fn filter(&self) -> Option<String> {
        let mut filters = Vec::new();
        if self.size.0 > 0 && self.size.1 > 0 {
            filters.push(format!("scale={}:{}", self.size.0, self.size.1));
        }
        if !self.crop.is_zero() {
            let mut crop = format!("crop={}:{}", self.crop.width, self.crop.height);
            if self.crop.x > 0 || self.crop.y > 0 {
                crop.push_str(&format!(":{}:{}", self.crop.x, self.crop.y));
            }
            filters.push(crop);
        }
        if filters.is_empty() {
            None
        } else {
            Some(filters.join(","))
        }
    }
}

/// Spawns short-lived encoder invocations that write one frame to disk.
///
/// Stateless apart from the encoder binary; never touches a recording
/// session.
#[derive(Debug, Clone)]
pub struct ThumbnailExtractor {
    encoder_path: PathBuf,
}

impl ThumbnailExtractor {
    pub fn new(encoder_path: impl Into<PathBuf>) -> Self {
        Self {
            encoder_path: encoder_path.into(),
        }
    }

    pub fn command(&self, source: &Path, request: &ThumbnailRequest) -> EncoderCommand {
        let mut command = EncoderCommand::new(&self.encoder_path)
            .arg("-y")
            .pair("-ss", request.timestamp())
            .pair("-i", source.to_string_lossy())
            .pair("-frames:v", "1");
        if let Some(filter) = request.filter() {
            command = command.pair("-vf", filter);
        }
        command.path(&request.output_path)
    }

    /// Start the extraction and return immediately.
    ///
    /// A detached reaper thread waits for the encoder and logs how it exited.
    pub fn extract(
        &self,
        launcher: &dyn EncoderLauncher,
        source: &Path,
        request: &ThumbnailRequest,
    ) -> Result<(), RecorderError> {
        let mut process = self.launch(launcher, source, request)?;
        let output = request.output_path.clone();
        thread::Builder::new()
            .name("thumbnail-reaper".into())
            .spawn(move || match process.wait() {
                Ok(Some(0)) => log::info!("Saved thumbnail {}", output.display()),
                Ok(code) => log::error!("Thumbnail encoder for {} exited with {:?}", output.display(), code),
                Err(e) => log::error!("Failed to wait for thumbnail encoder: {}", e),
            })
            .map_err(|e| RecorderError::SpawnFailed(format!("failed to spawn thumbnail reaper: {}", e)))?;
        Ok(())
    }

    /// Run the extraction to completion.
    pub fn extract_blocking(
        &self,
        launcher: &dyn EncoderLauncher,
        source: &Path,
        request: &ThumbnailRequest,
    ) -> Result<(), RecorderError> {
        let mut process = self.launch(launcher, source, request)?;
        match process.wait() {
            Ok(Some(0)) => Ok(()),
            Ok(code) => Err(RecorderError::ThumbnailFailed(format!("encoder exited with {:?}", code))),
            Err(e) => Err(RecorderError::ThumbnailFailed(e.to_string())),
        }
    }

    fn launch(
        &self,
        launcher: &dyn EncoderLauncher,
        source: &Path,
        request: &ThumbnailRequest,
    ) -> Result<Box<dyn EncoderProcess>, RecorderError> {
        if !source.exists() {
            return Err(RecorderError::SourceMissing(source.to_path_buf()));
        }
        let command = self.command(source, request);
        log::debug!("Thumbnail command: {}", command);
        let mut process = launcher.launch(command.program(), command.args())?;
        // Nothing is piped in; close stdin so the encoder cannot wait on it.
        drop(process.take_input());
        Ok(process)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::encoder::pipe::mock::MockLauncher;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ffmpeg_recorder_thumb_{}_{}", std::process::id(), name))
    }

    #[test]
    fn timestamp_is_zero_padded() {
        let request = ThumbnailRequest::new(0, 1, 2.5, "thumb.png");
        assert_eq!(request.timestamp(), "00:01:02.500");
    }

    #[test]
    fn no_filter_by_default() {
        let request = ThumbnailRequest::new(0, 0, 2.0, "thumb.png");
        assert_eq!(request.filter(), None);
    }

    #[test]
    fn scale_then_crop() {
        let request = ThumbnailRequest {
            size: (320, 240),
            crop: Crop::new(10, 20, 200, 100),
            ..ThumbnailRequest::new(0, 0, 2.0, "thumb.png")
        };
        assert_eq!(request.filter().unwrap(), "scale=320:240,crop=200:100:10:20");
    }

    #[test]
    fn crop_at_origin_omits_offset() {
        let request = ThumbnailRequest {
            crop: Crop::new(0, 0, 500, 400),
            ..ThumbnailRequest::new(0, 0, 2.0, "thumb.png")
        };
        assert_eq!(request.filter().unwrap(), "crop=500:400");
    }

    #[test]
    fn command_layout() {
        let extractor = ThumbnailExtractor::new("ffmpeg");
        let request = ThumbnailRequest {
            size: (64, 64),
            ..ThumbnailRequest::new(0, 0, 1.0, "/tmp/thumb.png")
        };
        let command = extractor.command(Path::new("/tmp/video.mp4"), &request);

        assert_eq!(
            command.args(),
            &["-y", "-ss", "00:00:01.000", "-i", "/tmp/video.mp4", "-frames:v", "1", "-vf", "scale=64:64", "/tmp/thumb.png"]
        );
    }

    #[test]
    fn missing_source_is_reported() {
        let launcher = MockLauncher::default();
        let extractor = ThumbnailExtractor::new("ffmpeg");
        let source = temp_file_path("missing.mp4");
        let request = ThumbnailRequest::new(0, 0, 1.0, temp_file_path("missing.png"));

        let err = extractor.extract(&launcher, &source, &request).unwrap_err();

        assert_eq!(err, RecorderError::SourceMissing(source));
        assert_eq!(launcher.record.launches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn blocking_extraction_waits_for_encoder() {
        let launcher = MockLauncher::default();
        let extractor = ThumbnailExtractor::new("ffmpeg");
        let source = temp_file_path("source.mp4");
        fs::write(&source, b"video").unwrap();
        let output = temp_file_path("out.png");
        let request = ThumbnailRequest::new(0, 0, 1.0, &output);

        extractor.extract_blocking(&launcher, &source, &request).unwrap();

        assert_eq!(launcher.record.launches.load(Ordering::SeqCst), 1);
        assert!(launcher.record.input_closed.load(Ordering::SeqCst));
        assert!(output.exists());
        fs::remove_file(&source).ok();
        fs::remove_file(&output).ok();
    }

    #[cfg(unix)]
    #[test]
    fn failing_encoder_is_reported() {
        use crate::encoder::process::ProcessLauncher;

        let extractor = ThumbnailExtractor::new("false");
        let source = temp_file_path("false_src.mp4");
        fs::write(&source, b"video").unwrap();
        let request = ThumbnailRequest::new(0, 0, 1.0, temp_file_path("false.png"));

        let err = extractor.extract_blocking(&ProcessLauncher, &source, &request).unwrap_err();

        assert!(matches!(err, RecorderError::ThumbnailFailed(_)));
        fs::remove_file(&source).ok();
    }
}

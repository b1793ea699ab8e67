//! Encoder command lines.
//!
//! Every mode lays its arguments out in the same order, which matters because
//! ffmpeg options are positional (they apply to the next input or output):
//!
//! ```text
//! [mandatory input args] [extra input args] -i <source>
//! [mandatory output args] [extra output args] <output path>
//! ```

use std::path::{Path, PathBuf};

use crate::models::config::RecordingConfig;
use crate::models::state::RecordingMode;

/// Input source tag for reading raw samples from stdin.
pub const STDIN_SOURCE: &str = "-";

/// Program plus ordered argument list for one encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl EncoderCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn for_mode(mode: RecordingMode, config: &RecordingConfig) -> Self {
        match mode {
            RecordingMode::CustomVideo => Self::custom_video(config),
            RecordingMode::CustomAudio => Self::custom_audio(config),
            RecordingMode::DefaultDevice => Self::default_device(config),
        }
    }

    /// Raw frames on stdin, re-encoded at the target rate.
    pub fn custom_video(config: &RecordingConfig) -> Self {
        let rate = format_rate(config.fps);
        Self::new(&config.encoder_path)
            .arg("-y")
            .arg("-an")
            .pair("-f", "rawvideo")
            .pair("-pix_fmt", config.pixel_format.ffmpeg_name())
            .pair("-s", format!("{}x{}", config.width, config.height))
            .pair("-framerate", &rate)
            .extend(split_arguments(&config.additional_input_args))
            .pair("-i", STDIN_SOURCE)
            .pair("-c:v", &config.video_codec)
            .pair("-b:v", format!("{}k", config.bit_rate_kbps))
            .pair("-r", &rate)
            .extend(split_arguments(&config.additional_output_args))
            .path(&config.output_path)
    }

    /// Raw PCM on stdin.
    pub fn custom_audio(config: &RecordingConfig) -> Self {
        let mut command = Self::new(&config.encoder_path)
            .arg("-y")
            .arg("-vn")
            .pair("-f", config.audio_format.ffmpeg_name())
            .pair("-ar", config.audio_sample_rate.to_string())
            .pair("-ac", config.audio_channels.to_string())
            .extend(split_arguments(&config.additional_input_args))
            .pair("-i", STDIN_SOURCE);
        if let Some(codec) = &config.audio_codec {
            command = command.pair("-c:a", codec);
        }
        command
            .extend(split_arguments(&config.additional_output_args))
            .path(&config.output_path)
    }

    /// The encoder captures from the camera/microphone itself.
    pub fn default_device(config: &RecordingConfig) -> Self {
        let mut command = Self::new(&config.encoder_path)
            .arg("-y")
            .pair("-f", capture_format());
        if let Some(secs) = config.capture_duration_secs.filter(|secs| *secs > 0.0) {
            command = command.pair("-t", secs.to_string());
        }

        let video = config.record_video.then_some(config.video_device.name.as_str());
        let audio = config.record_audio.then_some(config.audio_device.name.as_str());

        command
            .extend(split_arguments(&config.additional_input_args))
            .pair("-i", capture_input(video, audio))
            .pair("-b:v", format!("{}k", config.bit_rate_kbps))
            .extend(split_arguments(&config.additional_output_args))
            .path(&config.output_path)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub(crate) fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub(crate) fn pair(self, flag: &str, value: impl AsRef<str>) -> Self {
        self.arg(flag).arg(value.as_ref())
    }

    pub(crate) fn extend(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    pub(crate) fn path(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }
}

impl std::fmt::Display for EncoderCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Frame rate without a trailing `.0` for whole rates.
pub fn format_rate(fps: f64) -> String {
    if fps.fract() == 0.0 {
        format!("{}", fps as u64)
    } else {
        format!("{}", fps)
    }
}

/// Split user-supplied argument entries into individual tokens.
///
/// An entry such as `-map_channel 0.0.1` or `-vf "crop=300:300:0:0"` holds
/// several tokens. Entries are split on whitespace outside double quotes and
/// the quotes are removed, since no shell sits between us and the encoder.
pub fn split_arguments(entries: &[String]) -> Vec<String> {
    let mut tokens = Vec::new();
    for entry in entries {
        let mut current = String::new();
        let mut in_quotes = false;
        let mut has_token = false;
        for c in entry.chars() {
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    has_token = true;
                }
                c if c.is_whitespace() && !in_quotes => {
                    if has_token {
                        tokens.push(std::mem::take(&mut current));
                        has_token = false;
                    }
                }
                c => {
                    current.push(c);
                    has_token = true;
                }
            }
        }
        if has_token {
            tokens.push(current);
        }
    }
    tokens
}

/// Platform capture demuxer for default-device recording.
pub fn capture_format() -> &'static str {
    if cfg!(target_os = "windows") {
        "dshow"
    } else if cfg!(target_os = "macos") {
        "avfoundation"
    } else {
        "v4l2"
    }
}

/// Input source naming the capture devices, in the capture demuxer's syntax.
pub fn capture_input(video: Option<&str>, audio: Option<&str>) -> String {
    if cfg!(target_os = "windows") {
        let mut input = String::new();
        if let Some(video) = video {
            input.push_str(&format!("video={}", video));
        }
        if let Some(audio) = audio {
            if !input.is_empty() {
                input.push(':');
            }
            input.push_str(&format!("audio={}", audio));
        }
        input
    } else if cfg!(target_os = "macos") {
        format!("{}:{}", video.unwrap_or(""), audio.unwrap_or("none"))
    } else {
        // v4l2 only captures video; audio devices need a separate demuxer.
        video.or(audio).unwrap_or_default().to_string()
    }
}

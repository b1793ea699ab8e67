//! Records a few seconds of generated frames through ffmpeg, then grabs a
//! thumbnail from the result.
//!
//! ```text
//! ffmpeg-recorder-demo [config.json]
//! ```
//!
//! The optional JSON file is a partial `RecordingConfig`; unset fields keep
//! their defaults. Set `RUST_LOG=debug` to see the encoder command line and
//! its stderr.

use std::error::Error;
use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ffmpeg_recorder_core::{
    PixelFormat, RecorderDelegate, RecorderError, RecordingConfig, RecordingResult, RecordingSession, Sample,
    SessionState, ThumbnailExtractor, ThumbnailRequest,
};

const DEMO_SECONDS: u64 = 3;

/// Producer rate; deliberately below the encoder rate so pacing has to
/// duplicate frames.
const PRODUCER_FPS: u64 = 20;

struct LogDelegate;

impl RecorderDelegate for LogDelegate {
    fn on_state_changed(&self, state: &SessionState) {
        log::info!("state: {:?}", state);
    }

    fn on_write_error(&self, error: &RecorderError) {
        log::warn!("write error: {}", error);
    }

    fn on_recording_finished(&self, result: &RecordingResult) {
        log::info!(
            "finished {}: {} frames, {:.2}s",
            result.file_path.display(),
            result.frames_accounted,
            result.recorded_duration_secs
        );
    }
}

fn load_config() -> Result<RecordingConfig, Box<dyn Error>> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => RecordingConfig::default(),
    };
    if config.output_path.as_os_str().is_empty() {
        config.output_path = std::env::temp_dir().join("ffmpeg-recorder-demo.mp4");
        config.overwrite = true;
    }
    if config.width == 0 || config.height == 0 {
        config.width = 320;
        config.height = 240;
    }
    config.pixel_format = PixelFormat::Rgb24;
    Ok(config)
}

/// Diagonal RGB gradient shifted by `tick`.
fn gradient(width: u32, height: u32, tick: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            data.push(((x + tick) % 256) as u8);
            data.push(((y + tick) % 256) as u8);
            data.push(((x + y) / 2 % 256) as u8);
        }
    }
    data
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = load_config()?;
    let (width, height) = (config.width, config.height);
    let encoder_path = config.encoder_path.clone();
    let output = config.output_path.clone();

    let mut session = RecordingSession::new(config);
    session.set_delegate(Arc::new(LogDelegate));
    session.start()?;

    let interval = Duration::from_millis(1000 / PRODUCER_FPS);
    let started = Instant::now();
    let mut tick = 0;
    while started.elapsed() < Duration::from_secs(DEMO_SECONDS) {
        let frame = Sample::video(width, height, PixelFormat::Rgb24, gradient(width, height, tick));
        let slots = session.add_frame(frame)?;
        log::debug!("frame {} filled {} slot(s), backlog {}", tick, slots, session.backlog());
        tick += 1;
        thread::sleep(interval);
    }

    let result = session.stop()?;
    println!(
        "Recorded {} ({} frames, {:.2}s, {} write failures)",
        result.file_path.display(),
        result.frames_accounted,
        result.recorded_duration_secs,
        session.diagnostics().write_failures
    );

    let thumbnail = output.with_extension("png");
    let request = ThumbnailRequest {
        size: (160, 120),
        ..ThumbnailRequest::new(0, 0, 1.0, &thumbnail)
    };
    ThumbnailExtractor::new(encoder_path).extract_blocking(&ffmpeg_recorder_core::ProcessLauncher, &output, &request)?;
    println!("Thumbnail {}", thumbnail.display());

    Ok(())
}

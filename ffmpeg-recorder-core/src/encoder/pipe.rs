use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::encoder::command::EncoderCommand;
use crate::models::config::RecordingConfig;
use crate::models::error::RecorderError;
use crate::models::state::RecordingMode;
use crate::traits::encoder_launcher::{EncoderInput, EncoderLauncher, EncoderProcess};

/// Byte sent to an interactive ffmpeg to request a clean shutdown.
pub const QUIT_TOKEN: &[u8] = b"q";

/// Writable end of the encoder's stdin.
///
/// Owned by exactly one thread at a time: the pipe while no consumer is
/// running, the consumer thread afterwards. Dropping it closes the stream.
pub struct PipeWriter {
    inner: EncoderInput,
    bytes_written: u64,
}

impl PipeWriter {
    pub fn new(inner: EncoderInput) -> Self {
        Self { inner, bytes_written: 0 }
    }

    /// Forward raw bytes to the encoder. Returns the number of bytes written.
    ///
    /// A broken pipe or short write usually means the encoder exited.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, RecorderError> {
        self.inner.write_all(bytes).map_err(|e| match e.kind() {
            ErrorKind::BrokenPipe => RecorderError::WriteFailed("encoder closed its input".into()),
            ErrorKind::WriteZero => RecorderError::WriteFailed("short write".into()),
            _ => RecorderError::WriteFailed(e.to_string()),
        })?;
        self.bytes_written += bytes.len() as u64;
        Ok(bytes.len())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl std::fmt::Debug for PipeWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeWriter")
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}

/// Owns one encoder process at a time and its input stream.
pub struct EncoderPipe {
    mode: RecordingMode,
    output_path: PathBuf,
    process: Option<Box<dyn EncoderProcess>>,
    input: Option<PipeWriter>,
}

impl Default for EncoderPipe {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderPipe {
    pub fn new() -> Self {
        Self {
            mode: RecordingMode::CustomVideo,
            output_path: PathBuf::new(),
            process: None,
            input: None,
        }
    }

    /// Start an encoder for `mode` with the arguments built from `config`.
    pub fn spawn(
        &mut self,
        launcher: &dyn EncoderLauncher,
        mode: RecordingMode,
        config: &RecordingConfig,
    ) -> Result<(), RecorderError> {
        if self.process.is_some() {
            return Err(RecorderError::AlreadyRecording);
        }
        if config.output_path.as_os_str().is_empty() {
            return Err(RecorderError::EmptyOutputPath);
        }
        if config.output_path.exists() && !config.overwrite {
            return Err(RecorderError::OutputExists(config.output_path.clone()));
        }

        let command = EncoderCommand::for_mode(mode, config);
        log::debug!("Encoder command: {}", command);

        let mut process = launcher.launch(command.program(), command.args())?;
        self.input = process.take_input().map(PipeWriter::new);
        if self.input.is_none() {
            log::warn!("Encoder was spawned without a writable input stream");
        }
        self.process = Some(process);
        self.mode = mode;
        self.output_path = config.output_path.clone();
        Ok(())
    }

    /// Write through the pipe's own input stream.
    ///
    /// Only valid until the stream is handed to a consumer thread with
    /// [`take_writer`](Self::take_writer).
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, RecorderError> {
        match self.input.as_mut() {
            Some(input) => input.write(bytes),
            None => Err(RecorderError::WriteFailed("encoder input is not available".into())),
        }
    }

    /// Hand the input stream to the consumer thread.
    pub fn take_writer(&mut self) -> Option<PipeWriter> {
        self.input.take()
    }

    /// Ask the encoder to finish: default-device encoders get a `q`, then the
    /// input stream is closed. For pipe modes closing stdin is the signal.
    pub fn signal_stop(&mut self) {
        let Some(mut input) = self.input.take() else {
            return;
        };
        if self.mode == RecordingMode::DefaultDevice {
            if let Err(e) = input.write(QUIT_TOKEN) {
                log::warn!("Failed to send quit to encoder: {}", e);
            }
        }
        drop(input);
    }

    /// Block until the encoder exits and release it.
    pub fn wait_for_exit(&mut self) -> Result<Option<i32>, RecorderError> {
        let Some(mut process) = self.process.take() else {
            return Ok(None);
        };
        drop(self.input.take());
        let code = process
            .wait()
            .map_err(|e| RecorderError::ProcessFailed(format!("failed to wait for encoder: {}", e)))?;
        match code {
            Some(0) | None => log::info!("Encoder exited ({:?})", code),
            Some(code) => log::warn!("Encoder exited with status {}", code),
        }
        Ok(code)
    }

    /// Force-terminate the encoder and delete its partial output.
    pub fn kill_and_discard(&mut self, output_path: &Path) -> Result<(), RecorderError> {
        drop(self.input.take());
        if let Some(mut process) = self.process.take() {
            if let Err(e) = process.kill() {
                log::warn!("Failed to kill encoder: {}", e);
            }
            if let Err(e) = process.wait() {
                log::warn!("Failed to reap encoder: {}", e);
            }
        }
        match fs::remove_file(output_path) {
            Ok(()) => {
                log::info!("Removed {}", output_path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RecorderError::StorageError(format!(
                "failed to remove {}: {}",
                output_path.display(),
                e
            ))),
        }
    }

    pub fn is_running(&mut self) -> bool {
        self.process.as_mut().map(|p| p.is_running()).unwrap_or(false)
    }

    /// Whether a process is owned, running or not.
    pub fn has_process(&self) -> bool {
        self.process.is_some()
    }

    pub fn mode(&self) -> RecordingMode {
        self.mode
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::mock::MockLauncher;
    use super::*;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ffmpeg_recorder_pipe_{}_{}", std::process::id(), name))
    }

    fn config(name: &str) -> RecordingConfig {
        RecordingConfig {
            overwrite: true,
            ..RecordingConfig::video(temp_file_path(name), 2, 2, 30.0)
        }
    }

    #[test]
    fn spawn_twice_is_rejected() {
        let launcher = MockLauncher::default();
        let mut pipe = EncoderPipe::new();
        let config = config("twice.raw");

        pipe.spawn(&launcher, RecordingMode::CustomVideo, &config).unwrap();
        let err = pipe.spawn(&launcher, RecordingMode::CustomVideo, &config).unwrap_err();

        assert_eq!(err, RecorderError::AlreadyRecording);
        assert_eq!(launcher.record.launches.load(Ordering::SeqCst), 1);
        pipe.kill_and_discard(&config.output_path).unwrap();
    }

    #[test]
    fn existing_output_without_overwrite() {
        let launcher = MockLauncher::default();
        let mut pipe = EncoderPipe::new();
        let mut config = config("exists.raw");
        fs::write(&config.output_path, b"old").unwrap();
        config.overwrite = false;

        let err = pipe.spawn(&launcher, RecordingMode::CustomVideo, &config).unwrap_err();

        assert_eq!(err, RecorderError::OutputExists(config.output_path.clone()));
        assert_eq!(launcher.record.launches.load(Ordering::SeqCst), 0);
        assert!(!pipe.has_process());
        fs::remove_file(&config.output_path).ok();
    }

    #[test]
    fn write_forwards_bytes() {
        let launcher = MockLauncher::default();
        let mut pipe = EncoderPipe::new();
        let config = config("write.raw");

        pipe.spawn(&launcher, RecordingMode::CustomVideo, &config).unwrap();
        assert_eq!(pipe.write(&[1, 2, 3]).unwrap(), 3);
        assert!(pipe.is_running());

        pipe.signal_stop();
        assert!(launcher.record.input_closed.load(Ordering::SeqCst));
        pipe.wait_for_exit().unwrap();

        assert_eq!(fs::read(&config.output_path).unwrap(), vec![1, 2, 3]);
        assert!(!pipe.has_process());
        fs::remove_file(&config.output_path).ok();
    }

    #[test]
    fn broken_pipe_is_write_failure() {
        let launcher = MockLauncher::default();
        let mut pipe = EncoderPipe::new();
        let config = config("broken.raw");

        pipe.spawn(&launcher, RecordingMode::CustomVideo, &config).unwrap();
        launcher.record.broken.store(true, Ordering::SeqCst);

        assert!(matches!(pipe.write(&[0; 12]), Err(RecorderError::WriteFailed(_))));
        pipe.kill_and_discard(&config.output_path).unwrap();
    }

    #[test]
    fn default_device_stop_sends_quit() {
        let launcher = MockLauncher::default();
        let mut pipe = EncoderPipe::new();
        let config = config("quit.mp4");

        pipe.spawn(&launcher, RecordingMode::DefaultDevice, &config).unwrap();
        pipe.signal_stop();

        assert_eq!(&*launcher.record.bytes.lock(), QUIT_TOKEN);
        assert!(launcher.record.input_closed.load(Ordering::SeqCst));
        pipe.wait_for_exit().unwrap();
        fs::remove_file(&config.output_path).ok();
    }

    #[test]
    fn writer_can_move_to_another_thread() {
        let launcher = MockLauncher::default();
        let mut pipe = EncoderPipe::new();
        let config = config("moved.raw");

        pipe.spawn(&launcher, RecordingMode::CustomVideo, &config).unwrap();
        let mut writer = pipe.take_writer().unwrap();
        let handle = std::thread::spawn(move || {
            writer.write(&[9; 4]).unwrap();
            writer.bytes_written()
        });

        assert_eq!(handle.join().unwrap(), 4);
        assert!(matches!(pipe.write(&[1]), Err(RecorderError::WriteFailed(_))));
        pipe.wait_for_exit().unwrap();
        fs::remove_file(&config.output_path).ok();
    }

    #[test]
    fn failed_wait_is_a_process_error() {
        let launcher = MockLauncher::default();
        let mut pipe = EncoderPipe::new();
        let config = config("wait.raw");

        pipe.spawn(&launcher, RecordingMode::CustomVideo, &config).unwrap();
        launcher.record.wait_fails.store(true, Ordering::SeqCst);
        pipe.signal_stop();

        assert!(matches!(pipe.wait_for_exit(), Err(RecorderError::ProcessFailed(_))));
        assert!(!pipe.has_process());
        fs::remove_file(&config.output_path).ok();
    }

    #[test]
    fn kill_and_discard_removes_output() {
        let launcher = MockLauncher::default();
        let mut pipe = EncoderPipe::new();
        let config = config("cancel.raw");

        pipe.spawn(&launcher, RecordingMode::CustomVideo, &config).unwrap();
        pipe.write(&[1, 2, 3]).unwrap();
        assert!(config.output_path.exists());

        pipe.kill_and_discard(&config.output_path).unwrap();

        assert!(launcher.record.killed.load(Ordering::SeqCst));
        assert!(!config.output_path.exists());
        assert!(!pipe.is_running());
    }
}

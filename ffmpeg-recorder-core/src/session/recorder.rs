use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::encoder::pipe::{EncoderPipe, PipeWriter};
use crate::encoder::process::ProcessLauncher;
use crate::encoder::thumbnail::{ThumbnailExtractor, ThumbnailRequest};
use crate::models::config::RecordingConfig;
use crate::models::device::{AudioDevice, VideoDevice};
use crate::models::error::RecorderError;
use crate::models::recording_result::{RecordingMetadata, RecordingResult};
use crate::models::sample::{PixelFormat, Sample, SampleKind};
use crate::models::state::{RecordingMode, SessionDiagnostics, SessionState};
use crate::processing::pacing::{AudioLedger, PacingController};
use crate::processing::sample_queue::{self, SampleConsumer, SampleProducer};
use crate::storage::metadata;
use crate::traits::device_enumerator::DeviceEnumerator;
use crate::traits::encoder_launcher::EncoderLauncher;
use crate::traits::recorder_delegate::RecorderDelegate;

/// Recording session orchestrator.
///
/// Owns one encoder pipe, the pacing ledger and the sample queue. The caller's
/// thread is the producer; a dedicated writer thread, started on the first
/// accepted sample, is the consumer:
///
/// ```text
/// add_frame → [PacingController] → n × [SampleQueue] → writer thread → [EncoderPipe] → encoder stdin
/// ```
///
/// All methods take `&mut self`, so pause/resume and ingestion are serialized
/// by the caller. Only the queue and the diagnostics are shared with the
/// writer thread.
pub struct RecordingSession<L: EncoderLauncher = ProcessLauncher> {
    launcher: L,
    /// Applied to the next session.
    config: RecordingConfig,
    /// Snapshot used by the session in progress.
    active_config: Option<RecordingConfig>,
    state: SessionState,
    pipe: EncoderPipe,
    pacing: PacingController,
    audio: AudioLedger,

    producer: Option<SampleProducer>,
    // Parked here until the writer thread starts.
    consumer: Option<SampleConsumer>,
    writer_handle: Option<thread::JoinHandle<()>>,
    cancelled: Arc<AtomicBool>,
    diagnostics: Arc<Mutex<SessionDiagnostics>>,

    /// Latest sample offered while paused.
    held_sample: Option<Sample>,

    devices: Option<Arc<dyn DeviceEnumerator>>,
    delegate: Option<Arc<dyn RecorderDelegate>>,
}

impl RecordingSession<ProcessLauncher> {
    /// Session driving real encoder child processes.
    pub fn new(config: RecordingConfig) -> Self {
        Self::with_launcher(ProcessLauncher, config)
    }
}

impl<L: EncoderLauncher> RecordingSession<L> {
    pub fn with_launcher(launcher: L, config: RecordingConfig) -> Self {
        let fps = config.fps;
        let sample_rate = config.audio_sample_rate;
        Self {
            launcher,
            config,
            active_config: None,
            state: SessionState::Idle,
            pipe: EncoderPipe::new(),
            pacing: PacingController::new(fps),
            audio: AudioLedger::new(sample_rate),
            producer: None,
            consumer: None,
            writer_handle: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            diagnostics: Arc::new(Mutex::new(SessionDiagnostics::default())),
            held_sample: None,
            devices: None,
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecorderDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn set_device_enumerator(&mut self, devices: Arc<dyn DeviceEnumerator>) {
        self.devices = Some(devices);
    }

    // --- State ---

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while any kind of recording is in progress, paused or not.
    pub fn is_recording(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_recording_custom(&self) -> bool {
        self.state.mode().is_some_and(|mode| mode.is_custom())
    }

    pub fn is_recording_default(&self) -> bool {
        self.state.mode() == Some(RecordingMode::DefaultDevice)
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Encoder-visible video duration of the session in progress, in seconds.
    ///
    /// Always 0 for default-device recordings, which are not paced here.
    pub fn recorded_duration(&self) -> f64 {
        self.pacing.recorded_duration()
    }

    /// Recorded PCM duration of the audio session in progress, in seconds.
    pub fn recorded_audio_duration(&self) -> f64 {
        self.audio.recorded_duration()
    }

    pub fn frames_accounted(&self) -> u64 {
        self.pacing.frames_accounted()
    }

    pub fn total_paused(&self) -> Duration {
        self.pacing.total_paused()
    }

    /// Samples queued for the encoder but not yet written.
    pub fn backlog(&self) -> usize {
        self.producer.as_ref().map(|p| p.len()).unwrap_or(0)
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        let mut diagnostics = self.diagnostics.lock().clone();
        diagnostics.backlog = self.backlog();
        diagnostics
    }

    /// Latest sample offered while paused, dropped on resume.
    pub fn held_sample(&self) -> Option<&Sample> {
        self.held_sample.as_ref()
    }

    /// Whether the encoder writer thread has been started for this session.
    pub fn has_writer_thread(&self) -> bool {
        self.writer_handle.is_some()
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    // --- Starting ---

    /// Start a custom video recording fed by [`add_frame`](Self::add_frame).
    pub fn start(&mut self) -> Result<(), RecorderError> {
        let config = self.config.clone();
        self.begin(RecordingMode::CustomVideo, config)
    }

    /// Start a custom audio recording fed by [`add_buffer`](Self::add_buffer).
    pub fn start_custom_audio_record(&mut self) -> Result<(), RecorderError> {
        let config = self.config.clone();
        self.begin(RecordingMode::CustomAudio, config)
    }

    /// Let the encoder record from the default camera/microphone.
    ///
    /// `duration` limits this recording only; with `None` the configured
    /// capture duration applies. Devices that were not chosen explicitly are
    /// looked up through the device enumerator on first use and kept for
    /// later sessions.
    pub fn record(&mut self, duration: Option<Duration>) -> Result<(), RecorderError> {
        let mut config = self.config.clone();
        if let Some(duration) = duration {
            config.capture_duration_secs = Some(duration.as_secs_f64());
        }
        self.begin(RecordingMode::DefaultDevice, config)
    }

    /// Check `config` and start the encoder with it as the session snapshot.
    fn begin(&mut self, mode: RecordingMode, mut config: RecordingConfig) -> Result<(), RecorderError> {
        if self.state.is_active() {
            log::error!("A recording is already in progress.");
            return Err(RecorderError::AlreadyRecording);
        }
        if config.output_path.as_os_str().is_empty() {
            log::error!("Output path is empty. Cannot record.");
            return Err(RecorderError::EmptyOutputPath);
        }
        if config.output_path.exists() && !config.overwrite {
            log::error!(
                "{} already exists and overwriting is disabled. Cannot record.",
                config.output_path.display()
            );
            return Err(RecorderError::OutputExists(config.output_path.clone()));
        }
        config.validate(mode).map_err(RecorderError::InvalidConfig)?;

        if mode == RecordingMode::DefaultDevice {
            self.resolve_default_devices(&mut config)?;
        }

        self.pipe.spawn(&self.launcher, mode, &config)?;

        self.pacing.reset(config.fps);
        self.audio.reset(config.audio_sample_rate);
        self.held_sample = None;
        self.cancelled.store(false, Ordering::SeqCst);
        *self.diagnostics.lock() = SessionDiagnostics::default();

        if mode.is_custom() {
            let (producer, consumer) = sample_queue::channel();
            self.producer = Some(producer);
            self.consumer = Some(consumer);
        }

        log::info!("Started {:?} recording to {}", mode, config.output_path.display());
        self.active_config = Some(config);
        self.set_state(SessionState::Recording(mode));
        Ok(())
    }

    /// Fill in the devices missing from `config`. Devices found here are also
    /// stored in the session config so later recordings reuse them.
    fn resolve_default_devices(&mut self, config: &mut RecordingConfig) -> Result<(), RecorderError> {
        let needs_video = config.record_video && !config.video_device.is_set();
        let needs_audio = config.record_audio && config.audio_device.name.is_empty();
        if !needs_video && !needs_audio {
            return Ok(());
        }

        let Some(devices) = self.devices.as_ref() else {
            return Err(RecorderError::DeviceNotAvailable(
                "no capture device chosen and no device enumerator set".into(),
            ));
        };

        if needs_video {
            let device = devices
                .video_devices()
                .into_iter()
                .find(|d| d.is_available)
                .ok_or_else(|| RecorderError::DeviceNotAvailable("no available video device".into()))?;
            log::info!("Using video device \"{}\"", device.name);
            config.video_device = device.clone();
            self.config.video_device = device;
        }

        if needs_audio {
            let device = devices
                .audio_devices()
                .into_iter()
                .find(|d| d.is_default_input)
                .ok_or_else(|| RecorderError::DeviceNotAvailable("no default audio input".into()))?;
            log::info!("Using audio device \"{}\"", device.name);
            config.audio_device = device.clone();
            self.config.audio_device = device;
        }

        Ok(())
    }

    // --- Ingestion ---

    /// Offer a video frame to a custom video recording.
    ///
    /// Returns the number of slots the frame filled: 0 when the producer is
    /// ahead of the target rate or the session is paused, more than 1 when it
    /// fell behind and the frame was duplicated.
    pub fn add_frame(&mut self, frame: Sample) -> Result<usize, RecorderError> {
        let mode = self.ingesting_mode()?;
        if mode != RecordingMode::CustomVideo {
            log::error!("Custom video recording is not in progress. Cannot add the frame.");
            return Err(RecorderError::NotRecording);
        }
        self.check_frame(&frame)?;

        if self.state.is_paused() {
            self.held_sample = Some(frame);
            return Ok(0);
        }

        let slots = self.pacing.on_arrival(Instant::now());
        self.enqueue(frame, slots)?;
        Ok(slots as usize)
    }

    /// Offer a PCM buffer to a custom audio recording.
    ///
    /// Audio is written once per buffer, never duplicated.
    pub fn add_buffer(&mut self, buffer: Sample) -> Result<usize, RecorderError> {
        let mode = self.ingesting_mode()?;
        if mode != RecordingMode::CustomAudio {
            log::error!("Custom audio recording is not in progress. Cannot add the buffer.");
            return Err(RecorderError::NotRecording);
        }
        let pcm_frames = self.check_buffer(&buffer)?;

        if self.state.is_paused() {
            self.held_sample = Some(buffer);
            return Ok(0);
        }

        self.audio.on_buffer(Instant::now(), pcm_frames);
        self.enqueue(buffer, 1)?;
        Ok(1)
    }

    fn ingesting_mode(&self) -> Result<RecordingMode, RecorderError> {
        self.state.mode().ok_or(RecorderError::NotRecording)
    }

    fn active_config(&self) -> &RecordingConfig {
        self.active_config.as_ref().unwrap_or(&self.config)
    }

    fn check_frame(&self, frame: &Sample) -> Result<(), RecorderError> {
        let config = self.active_config();
        let SampleKind::VideoFrame { width, height, format } = frame.kind() else {
            return Err(RecorderError::InvalidSample("expected a video frame".into()));
        };
        if (width, height) != (config.width, config.height) {
            return Err(RecorderError::InvalidSample(format!(
                "frame is {}x{}, recording is {}x{}",
                width, height, config.width, config.height
            )));
        }
        if format != config.pixel_format {
            return Err(RecorderError::InvalidSample(format!(
                "frame is {}, recording expects {}",
                format.ffmpeg_name(),
                config.pixel_format.ffmpeg_name()
            )));
        }
        if frame.len() != config.frame_len() {
            return Err(RecorderError::InvalidSample(format!(
                "frame has {} bytes, expected {}",
                frame.len(),
                config.frame_len()
            )));
        }
        Ok(())
    }

    fn check_buffer(&self, buffer: &Sample) -> Result<usize, RecorderError> {
        let config = self.active_config();
        let SampleKind::AudioChunk { channels, format } = buffer.kind() else {
            return Err(RecorderError::InvalidSample("expected an audio buffer".into()));
        };
        if channels != config.audio_channels || format != config.audio_format {
            return Err(RecorderError::InvalidSample(format!(
                "buffer is {} channel(s) {}, recording expects {} channel(s) {}",
                channels,
                format.ffmpeg_name(),
                config.audio_channels,
                config.audio_format.ffmpeg_name()
            )));
        }
        let frame_bytes = channels as usize * format.bytes_per_sample();
        if buffer.len() % frame_bytes != 0 {
            return Err(RecorderError::InvalidSample(format!(
                "buffer of {} bytes is not a whole number of {}-byte frames",
                buffer.len(),
                frame_bytes
            )));
        }
        Ok(buffer.audio_frames().unwrap_or(0))
    }

    fn enqueue(&mut self, sample: Sample, slots: u64) -> Result<(), RecorderError> {
        if slots == 0 {
            return Ok(());
        }
        self.ensure_writer_thread()?;

        let producer = self.producer.as_ref().ok_or(RecorderError::NotRecording)?;
        for _ in 1..slots {
            producer.push(sample.clone());
        }
        producer.push(sample);
        Ok(())
    }

    fn ensure_writer_thread(&mut self) -> Result<(), RecorderError> {
        if self.writer_handle.is_some() {
            return Ok(());
        }
        let Some(consumer) = self.consumer.take() else {
            return Err(RecorderError::NotRecording);
        };
        let Some(writer) = self.pipe.take_writer() else {
            self.consumer = Some(consumer);
            return Err(RecorderError::WriteFailed("encoder input is not available".into()));
        };

        let cancelled = Arc::clone(&self.cancelled);
        let diagnostics = Arc::clone(&self.diagnostics);
        let delegate = self.delegate.clone();

        let handle = thread::Builder::new()
            .name("encoder-writer".into())
            .spawn(move || run_writer(consumer, writer, cancelled, diagnostics, delegate))
            .map_err(|e| RecorderError::SpawnFailed(format!("failed to spawn writer thread: {}", e)))?;

        self.writer_handle = Some(handle);
        Ok(())
    }

    // --- Pause / resume ---

    /// Pause a custom recording. Arrivals while paused are not recorded.
    pub fn pause(&mut self) -> Result<(), RecorderError> {
        match self.state {
            SessionState::Recording(mode) if !mode.supports_pause() => {
                log::warn!("Cannot pause a default device recording.");
                Err(RecorderError::PauseUnsupported)
            }
            SessionState::Recording(mode) => {
                self.pacing.pause(Instant::now());
                self.set_state(SessionState::Paused(mode));
                Ok(())
            }
            SessionState::Paused(_) => Ok(()),
            _ => Err(RecorderError::NotRecording),
        }
    }

    /// Resume a paused recording. Pacing restarts from the current time; the
    /// held sample is dropped.
    pub fn resume(&mut self) -> Result<(), RecorderError> {
        match self.state {
            SessionState::Paused(mode) => {
                let paused = self.pacing.resume(Instant::now());
                self.held_sample = None;
                log::debug!("Resumed after {:?} (total paused {:?})", paused, self.pacing.total_paused());
                self.set_state(SessionState::Recording(mode));
                Ok(())
            }
            SessionState::Recording(_) => Ok(()),
            _ => Err(RecorderError::NotRecording),
        }
    }

    pub fn set_paused(&mut self, paused: bool) -> Result<(), RecorderError> {
        if paused {
            self.pause()
        } else {
            self.resume()
        }
    }

    // --- Stopping ---

    /// Finish the recording.
    ///
    /// Blocks until every queued sample has been written, the encoder input
    /// is closed (after a `q` for default-device recordings) and the encoder
    /// has exited.
    pub fn stop(&mut self) -> Result<RecordingResult, RecorderError> {
        let Some(mode) = self.state.mode() else {
            return Err(RecorderError::NotRecording);
        };
        log::info!("Stopping {:?} recording", mode);

        // With the producer gone the writer drains the backlog and exits.
        drop(self.producer.take());
        self.join_writer();
        drop(self.consumer.take());

        self.pipe.signal_stop();
        let exited = self.pipe.wait_for_exit();

        let config = self.active_config.take().unwrap_or_else(|| self.config.clone());
        let mut result = RecordingResult {
            file_path: config.output_path.clone(),
            mode,
            recorded_duration_secs: self.pacing.recorded_duration(),
            recorded_audio_duration_secs: self.audio.recorded_duration(),
            frames_accounted: self.pacing.frames_accounted(),
            checksum: None,
        };
        self.reset_ledgers(&config);
        self.set_state(SessionState::Stopped);

        if let Err(e) = exited {
            self.set_state(SessionState::Idle);
            return Err(e);
        }

        if config.write_metadata {
            if let Err(e) = write_sidecar(&config, &mut result) {
                log::error!("Failed to write recording metadata: {}", e);
            }
        }

        if let Some(ref delegate) = self.delegate {
            delegate.on_recording_finished(&result);
        }
        self.set_state(SessionState::Idle);
        Ok(result)
    }

    /// Abort the recording and delete its output.
    ///
    /// Does not wait for the backlog: the encoder is killed first and the
    /// writer thread discards whatever is still queued.
    pub fn cancel(&mut self) -> Result<(), RecorderError> {
        let Some(mode) = self.state.mode() else {
            return Err(RecorderError::NotRecording);
        };
        log::info!("Cancelling {:?} recording", mode);

        self.cancelled.store(true, Ordering::SeqCst);
        let output_path = self.active_config().output_path.clone();
        let discarded = self.pipe.kill_and_discard(&output_path);

        drop(self.producer.take());
        self.join_writer();
        drop(self.consumer.take());

        let config = self.active_config.take().unwrap_or_else(|| self.config.clone());
        self.reset_ledgers(&config);
        self.set_state(SessionState::Cancelled);
        self.set_state(SessionState::Idle);
        discarded
    }

    fn join_writer(&mut self) {
        if let Some(handle) = self.writer_handle.take() {
            if handle.join().is_err() {
                log::error!("Encoder writer thread panicked");
            }
        }
    }

    fn reset_ledgers(&mut self, config: &RecordingConfig) {
        self.pacing.reset(config.fps);
        self.audio.reset(config.audio_sample_rate);
        self.held_sample = None;
    }

    fn set_state(&mut self, state: SessionState) {
        self.state = state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&state);
        }
    }

    // --- Thumbnails ---

    /// Extract one frame into `request.output_path` without waiting for it.
    ///
    /// With no explicit source the session's output file is used, which is
    /// refused while a recording is still writing it.
    pub fn save_thumbnail(&self, request: &ThumbnailRequest) -> Result<(), RecorderError> {
        let source = request
            .source_path
            .clone()
            .unwrap_or_else(|| self.config.output_path.clone());

        if let Some(active) = &self.active_config {
            if same_file(&source, &active.output_path) {
                log::error!("Cannot read {} while it is being recorded.", source.display());
                return Err(RecorderError::ConflictingUse(source));
            }
        }

        ThumbnailExtractor::new(&self.config.encoder_path).extract(&self.launcher, &source, request)
    }

    // --- Configuration ---

    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RecordingConfig) {
        self.update_config(|c| *c = config);
    }

    pub fn set_encoder_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.update_config(|c| c.encoder_path = path);
    }

    pub fn set_output_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.update_config(|c| c.output_path = path);
    }

    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.update_config(|c| c.overwrite = overwrite);
    }

    pub fn set_fps(&mut self, fps: f64) {
        self.update_config(|c| c.fps = fps);
    }

    pub fn set_bit_rate(&mut self, kbps: u32) {
        self.update_config(|c| c.bit_rate_kbps = kbps);
    }

    pub fn set_video_codec(&mut self, codec: impl Into<String>) {
        let codec = codec.into();
        self.update_config(|c| c.video_codec = codec);
    }

    pub fn set_video_size(&mut self, width: u32, height: u32) {
        self.update_config(|c| {
            c.width = width;
            c.height = height;
        });
    }

    pub fn set_pixel_format(&mut self, format: PixelFormat) {
        self.update_config(|c| c.pixel_format = format);
    }

    pub fn set_audio_config(&mut self, buffer_size: u32, sample_rate: u32) {
        self.update_config(|c| {
            c.audio_buffer_size = buffer_size;
            c.audio_sample_rate = sample_rate;
        });
    }

    pub fn set_record_video(&mut self, record: bool) {
        self.update_config(|c| c.record_video = record);
    }

    pub fn set_record_audio(&mut self, record: bool) {
        self.update_config(|c| c.record_audio = record);
    }

    pub fn set_capture_duration(&mut self, duration: Option<Duration>) {
        self.update_config(|c| c.capture_duration_secs = duration.map(|d| d.as_secs_f64()));
    }

    pub fn set_default_video_device(&mut self, device: VideoDevice) {
        self.update_config(|c| c.video_device = device);
    }

    pub fn set_default_audio_device(&mut self, device: AudioDevice) {
        self.update_config(|c| c.audio_device = device);
    }

    /// Forget the chosen devices so the next default-device recording looks
    /// them up again.
    pub fn clear_default_devices(&mut self) {
        self.update_config(|c| {
            c.video_device = VideoDevice::default();
            c.audio_device = AudioDevice::default();
        });
    }

    pub fn additional_input_arguments(&self) -> &[String] {
        &self.config.additional_input_args
    }

    pub fn set_additional_input_arguments(&mut self, args: Vec<String>) {
        self.update_config(|c| c.additional_input_args = args);
    }

    pub fn add_additional_input_argument(&mut self, arg: impl Into<String>) {
        let arg = arg.into();
        self.update_config(|c| c.additional_input_args.push(arg));
    }

    pub fn clear_additional_input_arguments(&mut self) {
        self.update_config(|c| c.additional_input_args.clear());
    }

    pub fn additional_output_arguments(&self) -> &[String] {
        &self.config.additional_output_args
    }

    pub fn set_additional_output_arguments(&mut self, args: Vec<String>) {
        self.update_config(|c| c.additional_output_args = args);
    }

    pub fn add_additional_output_argument(&mut self, arg: impl Into<String>) {
        let arg = arg.into();
        self.update_config(|c| c.additional_output_args.push(arg));
    }

    pub fn clear_additional_output_arguments(&mut self) {
        self.update_config(|c| c.additional_output_args.clear());
    }

    pub fn clear_additional_arguments(&mut self) {
        self.update_config(|c| {
            c.additional_input_args.clear();
            c.additional_output_args.clear();
        });
    }

    fn update_config(&mut self, apply: impl FnOnce(&mut RecordingConfig)) {
        if self.state.is_active() {
            log::info!("A recording is in progress. The change will take effect for the next recording session.");
        }
        apply(&mut self.config);
    }
}

impl<L: EncoderLauncher> Drop for RecordingSession<L> {
    fn drop(&mut self) {
        if self.state.is_active() {
            if let Err(e) = self.stop() {
                log::error!("Failed to stop recording on drop: {}", e);
            }
        }
    }
}

/// Writer thread body: drain the queue into the encoder until the producer
/// is dropped.
fn run_writer(
    consumer: SampleConsumer,
    mut writer: PipeWriter,
    cancelled: Arc<AtomicBool>,
    diagnostics: Arc<Mutex<SessionDiagnostics>>,
    delegate: Option<Arc<dyn RecorderDelegate>>,
) {
    let mut failing = false;

    while let Some(sample) = consumer.recv() {
        if cancelled.load(Ordering::SeqCst) {
            diagnostics.lock().samples_discarded += 1;
            continue;
        }

        match writer.write(sample.bytes()) {
            Ok(written) => {
                let mut d = diagnostics.lock();
                d.slots_written += 1;
                d.bytes_written += written as u64;
                failing = false;
            }
            Err(e) => {
                diagnostics.lock().write_failures += 1;
                if failing {
                    log::debug!("Cannot write sample: {}", e);
                } else {
                    log::warn!("Cannot write sample: {}", e);
                    failing = true;
                }
                if let Some(ref d) = delegate {
                    d.on_write_error(&e);
                }
            }
        }
    }

    log::debug!("Encoder writer finished after {} bytes", writer.bytes_written());
}

fn write_sidecar(config: &RecordingConfig, result: &mut RecordingResult) -> Result<(), RecorderError> {
    result.checksum = Some(metadata::sha256_file(&result.file_path)?);
    let meta = RecordingMetadata::new(result, config.fps, config.width, config.height, &config.video_codec);
    let path = metadata::write_metadata(&meta, &result.file_path)?;
    log::info!("Wrote recording metadata to {}", path.display());
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

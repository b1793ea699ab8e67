//! Frame pacing.
//!
//! Keeps the encoder-visible duration (`frames / fps`) in step with the wall
//! clock by duplicating the latest frame when the producer falls behind the
//! target rate, and by emitting nothing when it runs ahead.
//!
//! For each arrival after the first:
//!
//! ```text
//! delta = (now - start) - recorded - paused - discarded
//! while delta >= 1 / fps { emit slot; delta -= 1 / fps }
//! ```
//!
//! The loop is evaluated in closed form: the ledger advances to
//! `floor(active * fps)` slots. All instants are passed in, so the ledger is
//! deterministic under test.

use std::time::{Duration, Instant};

/// Rounding slack when `active * fps` lands on an exact slot boundary.
const SLOT_EPSILON: f64 = 1e-9;

/// Video timing ledger.
#[derive(Debug, Clone)]
pub struct PacingController {
    fps: f64,
    record_start: Option<Instant>,
    pause_start: Option<Instant>,
    total_paused: Duration,
    /// Catch-up debt dropped on resume so pacing restarts from "now".
    discarded: Duration,
    frames_accounted: u64,
}

impl PacingController {
    pub fn new(fps: f64) -> Self {
        Self {
            fps,
            record_start: None,
            pause_start: None,
            total_paused: Duration::ZERO,
            discarded: Duration::ZERO,
            frames_accounted: 0,
        }
    }

    /// Clear the ledger for a new session.
    pub fn reset(&mut self, fps: f64) {
        *self = Self::new(fps);
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }

    pub fn frames_accounted(&self) -> u64 {
        self.frames_accounted
    }

    pub fn record_start(&self) -> Option<Instant> {
        self.record_start
    }

    pub fn total_paused(&self) -> Duration {
        self.total_paused
    }

    pub fn is_paused(&self) -> bool {
        self.pause_start.is_some()
    }

    /// Encoder-visible duration in seconds.
    pub fn recorded_duration(&self) -> f64 {
        self.frames_accounted as f64 / self.fps
    }

    /// Number of slots the sample arriving at `now` must fill.
    ///
    /// The first arrival anchors the ledger and fills exactly one slot.
    /// Returns 0 while paused.
    pub fn on_arrival(&mut self, now: Instant) -> u64 {
        if self.pause_start.is_some() {
            return 0;
        }

        let Some(start) = self.record_start else {
            self.record_start = Some(now);
            self.frames_accounted = 1;
            return 1;
        };

        let target = (self.active_secs(start, now) * self.fps + SLOT_EPSILON).floor();
        if target <= self.frames_accounted as f64 {
            return 0;
        }

        let slots = target as u64 - self.frames_accounted;
        self.frames_accounted += slots;
        slots
    }

    /// Seconds of wall time not yet covered by emitted slots.
    pub fn pending_delta(&self, now: Instant) -> f64 {
        match self.record_start {
            Some(start) => self.active_secs(start, now) - self.recorded_duration(),
            None => 0.0,
        }
    }

    /// Start a pause at `now`. No-op if already paused.
    pub fn pause(&mut self, now: Instant) {
        if self.pause_start.is_none() {
            self.pause_start = Some(now);
        }
    }

    /// End the pause started by [`pause`](Self::pause).
    ///
    /// The pause interval is added to `total_paused`. Any wall time that was
    /// still unaccounted when the pause began is written off, so the next
    /// arrival does not duplicate the pre-pause frame to catch up.
    ///
    /// Returns the length of the pause.
    pub fn resume(&mut self, now: Instant) -> Duration {
        let Some(pause_start) = self.pause_start.take() else {
            return Duration::ZERO;
        };

        let paused = now.saturating_duration_since(pause_start);

        // Before the first arrival there is no anchor to subtract the pause
        // from; the first frame after resume anchors the ledger instead.
        let Some(start) = self.record_start else {
            return paused;
        };

        self.total_paused += paused;
        let owed = self.active_secs(start, now) - self.recorded_duration();
        if owed > 0.0 {
            self.discarded += Duration::from_secs_f64(owed);
        }

        paused
    }

    fn active_secs(&self, start: Instant, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(start);
        elapsed.as_secs_f64() - self.total_paused.as_secs_f64() - self.discarded.as_secs_f64()
    }
}

/// Audio ledger, counted independently of video pacing.
///
/// Audio is never duplicated; each buffer is written once and its PCM
/// frames are added to the recorded duration.
#[derive(Debug, Clone, Default)]
pub struct AudioLedger {
    sample_rate: u32,
    buffers: u64,
    pcm_frames: u64,
    first_arrival: Option<Instant>,
}

impl AudioLedger {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Default::default()
        }
    }

    pub fn reset(&mut self, sample_rate: u32) {
        *self = Self::new(sample_rate);
    }

    pub fn on_buffer(&mut self, now: Instant, pcm_frames: usize) {
        self.first_arrival.get_or_insert(now);
        self.buffers += 1;
        self.pcm_frames += pcm_frames as u64;
    }

    pub fn buffers(&self) -> u64 {
        self.buffers
    }

    /// Recorded audio in seconds, from the PCM frames delivered so far.
    pub fn recorded_duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.pcm_frames as f64 / self.sample_rate as f64
    }

    /// Observed buffer arrival rate since the first buffer.
    pub fn arrival_rate(&self, now: Instant) -> f64 {
        let Some(first) = self.first_arrival else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(first).as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.buffers as f64 / elapsed
    }
}

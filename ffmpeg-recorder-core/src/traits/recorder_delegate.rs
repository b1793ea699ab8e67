use crate::models::error::RecorderError;
use crate::models::recording_result::RecordingResult;
use crate::models::state::SessionState;

/// Event delegate for recording session notifications.
///
/// `on_state_changed` and `on_recording_finished` run on the thread that
/// drives the session. `on_write_error` runs on the consumer thread.
/// Implementations should marshal to the UI thread if needed.
pub trait RecorderDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &SessionState);

    /// Called when a write to the encoder pipe fails. Recording continues.
    fn on_write_error(&self, error: &RecorderError);

    /// Called after a graceful stop once the encoder has exited.
    fn on_recording_finished(&self, result: &RecordingResult);
}

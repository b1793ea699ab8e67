use crate::models::device::{AudioDevice, VideoDevice};

/// Lists capture devices for default-device recording.
///
/// Only consulted when no device has been chosen explicitly; the first
/// available camera and the first default-input microphone are picked.
pub trait DeviceEnumerator: Send + Sync {
    fn video_devices(&self) -> Vec<VideoDevice>;

    fn audio_devices(&self) -> Vec<AudioDevice>;
}

pub mod device_enumerator;
pub mod encoder_launcher;
pub mod recorder_delegate;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while driving a recording session.
///
/// Configuration errors (`AlreadyRecording`, `EmptyOutputPath`, `OutputExists`,
/// `InvalidConfig`) are returned synchronously from the start calls and never
/// retried. `WriteFailed` is reported by the consumer thread and is not fatal
/// to the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("a recording is already in progress")]
    AlreadyRecording,

    #[error("output path is empty")]
    EmptyOutputPath,

    #[error("output file {0} already exists and overwriting is disabled")]
    OutputExists(PathBuf),

    #[error("failed to spawn encoder: {0}")]
    SpawnFailed(String),

    #[error("encoder pipe write failed: {0}")]
    WriteFailed(String),

    #[error("encoder process failed: {0}")]
    ProcessFailed(String),

    #[error("no recording is in progress")]
    NotRecording,

    #[error("pausing is not supported for this recording mode")]
    PauseUnsupported,

    #[error("{0} is the target of the recording in progress")]
    ConflictingUse(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid sample: {0}")]
    InvalidSample(String),

    #[error("device not available: {0}")]
    DeviceNotAvailable(String),

    #[error("source file {0} does not exist")]
    SourceMissing(PathBuf),

    #[error("thumbnail extraction failed: {0}")]
    ThumbnailFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::error::RecorderError;
use crate::models::recording_result::RecordingMetadata;

/// Sidecar path for a recording: `clip.mp4` → `clip.mp4.metadata.json`.
pub fn metadata_path(recording_path: &Path) -> PathBuf {
    let mut name = recording_path.as_os_str().to_os_string();
    name.push(".metadata.json");
    PathBuf::from(name)
}

/// Write recording metadata as a JSON sidecar file.
pub fn write_metadata(metadata: &RecordingMetadata, recording_path: &Path) -> Result<PathBuf, RecorderError> {
    let path = metadata_path(recording_path);
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| RecorderError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&path, json).map_err(|e| RecorderError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(path)
}

/// Read recording metadata from a JSON sidecar file.
pub fn read_metadata(recording_path: &Path) -> Result<RecordingMetadata, RecorderError> {
    let json = fs::read_to_string(metadata_path(recording_path))
        .map_err(|e| RecorderError::StorageError(format!("failed to read metadata: {}", e)))?;
    serde_json::from_str(&json).map_err(|e| RecorderError::StorageError(format!("failed to parse metadata: {}", e)))
}

/// SHA-256 hex digest of a file, streamed so large videos are not loaded whole.
pub fn sha256_file(path: &Path) -> Result<String, RecorderError> {
    let mut file = File::open(path)
        .map_err(|e| RecorderError::StorageError(format!("failed to open {} for checksum: {}", path.display(), e)))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| RecorderError::StorageError(format!("failed to read {} for checksum: {}", path.display(), e)))?;
    Ok(hex_encode(&hasher.finalize()))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recording_result::RecordingResult;
    use crate::models::state::RecordingMode;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ffmpeg_recorder_meta_{}_{}", std::process::id(), name))
    }

    #[test]
    fn sidecar_keeps_extension() {
        assert_eq!(
            metadata_path(Path::new("/tmp/clip.mp4")),
            PathBuf::from("/tmp/clip.mp4.metadata.json")
        );
    }

    #[test]
    fn sha256_of_known_content() {
        let path = temp_file_path("abc.bin");
        fs::write(&path, b"abc").unwrap();

        assert_eq!(
            sha256_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        fs::remove_file(&path).ok();
    }

    #[test]
    fn checksum_of_missing_file_fails() {
        let result = sha256_file(&temp_file_path("nope.bin"));
        assert!(matches!(result, Err(RecorderError::StorageError(_))));
    }

    #[test]
    fn metadata_survives_a_write_read_cycle() {
        let path = temp_file_path("clip.raw");
        let result = RecordingResult {
            file_path: path.clone(),
            mode: RecordingMode::CustomVideo,
            recorded_duration_secs: 0.1,
            recorded_audio_duration_secs: 0.0,
            frames_accounted: 3,
            checksum: Some("deadbeef".into()),
        };
        let metadata = RecordingMetadata::new(&result, 30.0, 640, 480, "mpeg4");

        let sidecar = write_metadata(&metadata, &path).unwrap();
        let loaded = read_metadata(&path).unwrap();

        assert_eq!(loaded, metadata);
        assert_eq!(loaded.frames, 3);
        assert_eq!(loaded.checksum, "deadbeef");
        fs::remove_file(&sidecar).ok();
    }
}

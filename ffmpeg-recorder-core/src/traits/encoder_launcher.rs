use std::io::{self, Write};
use std::path::Path;

use crate::models::error::RecorderError;

/// Writable input stream of an encoder process.
pub type EncoderInput = Box<dyn Write + Send>;

/// A running encoder process.
///
/// The input stream is taken out once and handed to the consumer thread, so
/// the control half (`kill`, `wait`) stays usable while a write is blocked on
/// pipe back-pressure.
pub trait EncoderProcess: Send {
    /// Take the process's stdin. Returns `None` after the first call.
    fn take_input(&mut self) -> Option<EncoderInput>;

    /// Whether the process has not exited yet.
    fn is_running(&mut self) -> bool;

    /// Force-terminate the process.
    fn kill(&mut self) -> io::Result<()>;

    /// Block until the process exits. Returns its exit code, if it had one.
    fn wait(&mut self) -> io::Result<Option<i32>>;

    /// OS process id, when there is one.
    fn id(&self) -> Option<u32> {
        None
    }
}

/// Starts encoder processes.
///
/// Implemented by [`ProcessLauncher`](crate::encoder::process::ProcessLauncher)
/// for real child processes; tests substitute an in-memory launcher.
pub trait EncoderLauncher: Send + Sync {
    fn launch(&self, program: &Path, args: &[String]) -> Result<Box<dyn EncoderProcess>, RecorderError>;
}

//! Child-process encoder backend.

use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process::{Child, ChildStderr, Command, Stdio};
use std::thread;

use crate::models::error::RecorderError;
use crate::traits::encoder_launcher::{EncoderInput, EncoderLauncher, EncoderProcess};

/// Launches encoders as OS child processes.
///
/// stdin is piped for raw samples, stdout is discarded and stderr is
/// forwarded line by line to `log::debug!` from a named reader thread so the
/// encoder never stalls on a full stderr pipe.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl EncoderLauncher for ProcessLauncher {
    fn launch(&self, program: &Path, args: &[String]) -> Result<Box<dyn EncoderProcess>, RecorderError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RecorderError::SpawnFailed(format!("{}: {}", program.display(), e)))?;

        log::info!("Spawned encoder pid {}: {} {}", child.id(), program.display(), args.join(" "));

        if let Some(stderr) = child.stderr.take() {
            forward_stderr(stderr, child.id());
        }

        Ok(Box::new(ChildProcess::new(child)))
    }
}

fn forward_stderr(stderr: ChildStderr, pid: u32) {
    let spawned = thread::Builder::new()
        .name(format!("encoder-stderr-{}", pid))
        .spawn(move || {
            for line in BufReader::new(stderr).lines() {
                match line {
                    Ok(line) => log::debug!("[encoder {}] {}", pid, line),
                    Err(_) => break,
                }
            }
        });
    if let Err(e) = spawned {
        log::warn!("Failed to spawn stderr reader for encoder {}: {}", pid, e);
    }
}

/// An encoder running as a child process.
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    exit_code: Option<Option<i32>>,
}

impl ChildProcess {
    pub fn new(child: Child) -> Self {
        Self { child, exit_code: None }
    }
}

impl EncoderProcess for ChildProcess {
    fn take_input(&mut self) -> Option<EncoderInput> {
        self.child
            .stdin
            .take()
            .map(|stdin| Box::new(stdin) as EncoderInput)
    }

    fn is_running(&mut self) -> bool {
        if self.exit_code.is_some() {
            return false;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                self.exit_code = Some(status.code());
                false
            }
            Ok(None) => true,
            Err(e) => {
                log::warn!("Failed to poll encoder {}: {}", self.child.id(), e);
                false
            }
        }
    }

    fn kill(&mut self) -> io::Result<()> {
        if !self.is_running() {
            return Ok(());
        }
        self.child.kill()
    }

    fn wait(&mut self) -> io::Result<Option<i32>> {
        if let Some(code) = self.exit_code {
            return Ok(code);
        }
        // Closing stdin first; an encoder reading from it would never exit otherwise.
        drop(self.child.stdin.take());
        let status = self.child.wait()?;
        self.exit_code = Some(status.code());
        Ok(status.code())
    }

    fn id(&self) -> Option<u32> {
        Some(self.child.id())
    }
}

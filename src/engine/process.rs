//! Engine process handle
//!
//! [`EngineProcess`] owns the child process. Its stdin and stdout are handed
//! out once at spawn time and wrapped by the session; the handle itself only
//! tracks lifecycle and reaps the child.
//!
//! Teardown runs exactly once: either through [`EngineProcess::shutdown`] or,
//! if that never happened, from `Drop`, which kills and waits.

use crate::engine::error::{EngineError, EngineResult};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Running engine child process
#[derive(Debug)]
pub struct EngineProcess {
    child: Child,
    path: PathBuf,
    exit_status: Option<ExitStatus>,
}

/// Pipes connected to a freshly spawned engine
#[derive(Debug)]
pub struct EnginePipes {
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}

impl EngineProcess {
    /// Start `path` with stdin and stdout piped to the host
    ///
    /// stderr is inherited so engine diagnostics reach the terminal.
    pub fn spawn(path: &Path, args: &[String]) -> EngineResult<(Self, EnginePipes)> {
        let spawn_error = |source| EngineError::SpawnError {
            path: path.to_path_buf(),
            source,
        };

        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_error)?;

        let missing = |name: &str| {
            spawn_error(std::io::Error::other(format!("child has no {name} pipe")))
        };
        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            (stdin, _) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(missing(if stdin.is_none() { "stdin" } else { "stdout" }));
            }
        };

        info!("[ENGINE] Started {:?} (pid {})", path, child.id());
        Ok((
            Self {
                child,
                path: path.to_path_buf(),
                exit_status: None,
            },
            EnginePipes { stdin, stdout },
        ))
    }

    /// Whether the child is still running
    pub fn is_running(&mut self) -> bool {
        if self.exit_status.is_some() {
            return false;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!("[ENGINE] {:?} exited with {}", self.path, status);
                self.exit_status = Some(status);
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!("[ENGINE] try_wait on {:?} failed: {}", self.path, e);
                false
            }
        }
    }

    /// Wait up to `grace` for the child to exit on its own, then kill it
    ///
    /// The caller is expected to have sent the quit command and closed stdin.
    /// Calling this again after the child was reaped returns the stored
    /// status.
    pub fn shutdown(&mut self, grace: Duration) -> EngineResult<ExitStatus> {
        if let Some(status) = self.exit_status {
            return Ok(status);
        }

        let deadline = Instant::now() + grace;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait()? {
                info!("[ENGINE] {:?} exited with {}", self.path, status);
                self.exit_status = Some(status);
                return Ok(status);
            }
            thread::sleep(EXIT_POLL_INTERVAL);
        }

        warn!(
            "[ENGINE] {:?} still running after {:?}; killing it",
            self.path, grace
        );
        self.reap_forcefully()
    }

    fn reap_forcefully(&mut self) -> EngineResult<ExitStatus> {
        // kill fails with InvalidInput if the child already exited; wait still reaps it
        if let Err(e) = self.child.kill() {
            debug!("[ENGINE] kill {:?}: {}", self.path, e);
        }
        let status = self.child.wait()?;
        self.exit_status = Some(status);
        Ok(status)
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        if self.exit_status.is_none() {
            if let Err(e) = self.reap_forcefully() {
                warn!("[ENGINE] Failed to reap {:?}: {}", self.path, e);
            }
        }
    }
}

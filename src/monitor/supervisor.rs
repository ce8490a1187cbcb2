//! supervisor.rs
//! Lifecycle of the external sampling tool and its reader thread.
//!
//! - Launch: spawn the tool with stdout piped; a missing executable fails
//!   fast with a "monitoring unavailable" error before any sampling begins.
//! - Read: one background thread blocks on stdout lines, applies the parser,
//!   and appends matches to the shared buffer with an append-time timestamp.
//! - Stop: signal the reader, SIGTERM the child, wait up to a bounded
//!   timeout, escalate to kill, then join the reader with its own bounded
//!   wait. Idempotent; also runs from `Drop` so the subprocess never leaks.

use std::io::{BufRead, BufReader, ErrorKind};
use std::process::{Child, Command, Stdio};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, warn};

use crate::error::MonitorError;
use crate::monitor::buffer::{Sample, SampleBuffer};
use crate::monitor::parser::parse_power_mw;

/// Grace period for the subprocess to exit after SIGTERM.
const STOP_GRACE: Duration = Duration::from_secs(2);
/// Bound on waiting for the reader thread to finish after the child is dead.
const JOIN_GRACE: Duration = Duration::from_secs(2);
/// Poll step while waiting for child exit / reader completion.
const STOP_POLL: Duration = Duration::from_millis(50);

/// The command line used to launch the sampling tool.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    /// The platform default: `tegrastats --interval <ms>`.
    pub fn tegrastats(interval_ms: u64) -> Self {
        Self {
            program: "tegrastats".into(),
            args: vec!["--interval".into(), interval_ms.to_string()],
        }
    }

    /// An arbitrary line-emitting tool, used by tests and the mock emitter.
    pub fn custom(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Owns one telemetry subprocess and its reader thread.
pub struct Supervisor {
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    tool: String,
}

impl Supervisor {
    /// Spawns the tool and the reader thread. Samples flow into `buffer`
    /// until `stop()` or the tool's stdout closes.
    pub fn start(tool: &ToolCommand, buffer: Arc<SampleBuffer>) -> Result<Self, MonitorError> {
        let mut child = Command::new(&tool.program)
            .args(&tool.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => MonitorError::ToolUnavailable {
                    tool: tool.program.clone(),
                },
                _ => MonitorError::Spawn {
                    tool: tool.program.clone(),
                    source: e,
                },
            })?;

        // Piped stdout is always present after a successful spawn.
        let stdout = child.stdout.take().ok_or_else(|| MonitorError::Spawn {
            tool: tool.program.clone(),
            source: std::io::Error::other("child stdout unavailable"),
        })?;

        let running = Arc::new(AtomicBool::new(true));
        let reader_running = running.clone();
        let tool_name = tool.program.clone();

        let reader = thread::spawn(move || {
            let mut lines = BufReader::new(stdout).lines();
            while reader_running.load(Ordering::Acquire) {
                match lines.next() {
                    Some(Ok(line)) => {
                        if let Some(power_mw) = parse_power_mw(&line) {
                            buffer.append(Sample::new(Instant::now(), power_mw));
                        }
                        // Lines without a power field are normal; skip quietly.
                    }
                    Some(Err(e)) => {
                        // Silent if a stop was requested: the broken pipe is
                        // expected fallout of termination.
                        if reader_running.load(Ordering::Acquire) {
                            error!("[{}] read error, sampling stops: {}", tool_name, e);
                        }
                        break;
                    }
                    None => {
                        debug!("[{}] stdout closed", tool_name);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            child: Some(child),
            reader: Some(reader),
            running,
            tool: tool.program.clone(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops sampling: flag the reader, terminate the child (graceful then
    /// forced), join the reader. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);

        if let Some(mut child) = self.child.take() {
            terminate_child(&mut child, &self.tool);
        }

        if let Some(handle) = self.reader.take() {
            // The child is dead, so the reader unblocks on EOF; bound the
            // join anyway in case the pipe drains slowly.
            let deadline = Instant::now() + JOIN_GRACE;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(STOP_POLL);
            }
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                warn!("[{}] reader thread did not exit in time; detaching", self.tool);
            }
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Graceful-then-forced child termination: SIGTERM, bounded wait, kill, reap.
fn terminate_child(child: &mut Child, tool: &str) {
    #[cfg(unix)]
    unsafe {
        libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
    }
    #[cfg(not(unix))]
    let _ = child.kill();

    let deadline = Instant::now() + STOP_GRACE;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("[{}] exited: {}", tool, status);
                return;
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    break;
                }
                thread::sleep(STOP_POLL);
            }
            Err(e) => {
                warn!("[{}] wait failed: {}", tool, e);
                break;
            }
        }
    }

    warn!("[{}] did not exit after SIGTERM; killing", tool);
    let _ = child.kill();
    let _ = child.wait();
}

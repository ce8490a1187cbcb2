//! session.rs
//! Session facade: composes supervisor, buffer, idle calibrator, and energy
//! integrator behind the lifecycle the benchmark driver uses:
//!
//! `start → measure_idle → (clear_samples → workload → integrate_energy)* → stop`
//!
//! Calling a measurement operation outside that order is a usage error and is
//! reported, not silently tolerated. `Drop` guarantees `stop()` on every exit
//! path so the subprocess and reader thread never leak, even if the workload
//! under measurement panics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use average::Mean;
use log::info;
use spin_sleep::{SpinSleeper, SpinStrategy};

use crate::energy::integrate::{EnergyOutcome, integrate_power};
use crate::error::MonitorError;
use crate::monitor::buffer::{DEFAULT_CAPACITY, Sample, SampleBuffer};
use crate::monitor::supervisor::{Supervisor, ToolCommand};

/// Pause after spawning the tool so the first samples arrive before the
/// caller proceeds to calibration.
const WARMUP: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub tool: ToolCommand,
    pub buffer_capacity: usize,
}

impl SessionConfig {
    pub fn tegrastats(interval_ms: u64) -> Self {
        Self {
            tool: ToolCommand::tegrastats(interval_ms),
            buffer_capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn with_tool(tool: ToolCommand) -> Self {
        Self {
            tool,
            buffer_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::tegrastats(100)
    }
}

/// One start-to-stop lifecycle of the telemetry sampler, bound to at most
/// one subprocess instance at a time.
pub struct PowerSession {
    config: SessionConfig,
    buffer: Arc<SampleBuffer>,
    supervisor: Option<Supervisor>,
}

impl PowerSession {
    pub fn new(config: SessionConfig) -> Self {
        let buffer = Arc::new(SampleBuffer::new(config.buffer_capacity));
        Self {
            config,
            buffer,
            supervisor: None,
        }
    }

    /// Runs `f` against a started session and stops it regardless of the
    /// closure's outcome (scoped acquisition).
    pub fn scoped<T>(
        config: SessionConfig,
        f: impl FnOnce(&mut PowerSession) -> Result<T, MonitorError>,
    ) -> Result<T, MonitorError> {
        let mut session = PowerSession::new(config);
        session.start()?;
        let result = f(&mut session);
        session.stop();
        result
    }

    pub fn is_running(&self) -> bool {
        self.supervisor.as_ref().is_some_and(|s| s.is_running())
    }

    /// Launches the sampling tool and its reader thread, then waits a short
    /// warm-up so the buffer is already filling when this returns.
    pub fn start(&mut self) -> Result<(), MonitorError> {
        if self.supervisor.is_some() {
            return Err(MonitorError::AlreadyRunning);
        }
        let supervisor = Supervisor::start(&self.config.tool, self.buffer.clone())?;
        self.supervisor = Some(supervisor);
        std::thread::sleep(WARMUP);
        info!("power monitor started ({})", self.config.tool.program);
        Ok(())
    }

    /// Stops the sampler. No-op when not running.
    pub fn stop(&mut self) {
        if let Some(mut supervisor) = self.supervisor.take() {
            supervisor.stop();
            info!("power monitor stopped");
        }
    }

    pub fn clear_samples(&self) {
        self.buffer.clear();
    }

    /// Snapshot of buffered samples in `[t_start, t_end]` (inclusive,
    /// open-ended for `None`).
    pub fn samples(&self, t_start: Option<Instant>, t_end: Option<Instant>) -> Vec<Sample> {
        self.buffer.query(t_start, t_end)
    }

    /// Measures the idle power baseline: clears the buffer, lets the reader
    /// accumulate samples undisturbed for `duration`, and returns their mean
    /// in mW. The sleep *is* the calibration window, so the sampler must
    /// already be running.
    ///
    /// Zero samples in the window is an explicit error: "tool produced
    /// nothing" must not masquerade as "zero idle power" and corrupt every
    /// downstream energy number.
    pub fn measure_idle(&self, duration: Duration) -> Result<f64, MonitorError> {
        if !self.is_running() {
            return Err(MonitorError::NotRunning);
        }

        info!("measuring idle power for {:.1}s...", duration.as_secs_f64());
        self.clear_samples();

        let t_start = Instant::now();
        let sleeper = SpinSleeper::new(100_000).with_spin_strategy(SpinStrategy::YieldThread);
        sleeper.sleep(duration);
        let t_end = Instant::now();

        let samples = self.buffer.query(Some(t_start), Some(t_end));
        if samples.is_empty() {
            return Err(MonitorError::NoIdleSamples {
                window_secs: duration.as_secs_f64(),
            });
        }

        let mean: Mean = samples.iter().map(|s| s.power_mw).collect();
        let idle_mw = mean.mean();
        info!("idle power: {:.1} mW (from {} samples)", idle_mw, samples.len());
        Ok(idle_mw)
    }

    /// Net energy over `[t_start, t_end]` with `idle_mw` subtracted. Pure
    /// read-then-compute over a buffer snapshot; safe to call while
    /// acquisition continues for an interval already in the past.
    pub fn integrate_energy(
        &self,
        t_start: Instant,
        t_end: Instant,
        idle_mw: f64,
    ) -> Result<EnergyOutcome, MonitorError> {
        if !self.is_running() {
            return Err(MonitorError::NotRunning);
        }
        let samples = self.buffer.query(Some(t_start), Some(t_end));
        Ok(integrate_power(&samples, t_start, t_end, idle_mw))
    }
}

impl Drop for PowerSession {
    fn drop(&mut self) {
        self.stop();
    }
}

//! Error taxonomy for the telemetry session.
//!
//! Environment errors (tool missing) are fatal to the session and never
//! retried. Calibration errors are fatal to that call only. Measurement gaps
//! are NOT errors: they surface as `EnergyOutcome::Unmeasured` plus a warning,
//! because silently returning a plausible-looking zero would corrupt
//! benchmark results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The platform power tool is not installed or not on PATH.
    #[error("power monitoring unavailable: `{tool}` not found (are you on a Jetson device?)")]
    ToolUnavailable { tool: String },

    /// The tool exists but could not be launched.
    #[error("failed to launch `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// A lifecycle call that requires a running sampler was made while stopped.
    #[error("monitor not running; call start() first")]
    NotRunning,

    /// `start()` was called on a session that is already sampling.
    #[error("monitor already running")]
    AlreadyRunning,

    /// The calibration window elapsed without a single power sample.
    #[error("no power samples collected in {window_secs:.1}s idle window; check tool output")]
    NoIdleSamples { window_secs: f64 },
}

//! integrate.rs
//! Trapezoidal energy integration with idle-baseline subtraction.
//!
//! Pure functions over a sample snapshot; no buffer mutation, safe to run
//! concurrently with ongoing acquisition. Edge-case policies:
//! - zero samples in the window → `Unmeasured` + warning (callers must not
//!   read it as true zero energy)
//! - one sample → constant-power approximation over the whole window
//! - two or more → trapezoid sum over consecutive pairs, clamping each
//!   endpoint to `max(0, p − idle)` *before* averaging so a brief idle-level
//!   dip is not double-clamped through the average.

use std::time::Instant;

use log::warn;

use crate::monitor::buffer::Sample;

/// Result of one energy integration. `Unmeasured` means no samples fell in
/// the window; it reports 0.0 J but is explicitly distinguishable from a
/// measured zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyOutcome {
    Measured { joules: f64, samples: usize },
    Unmeasured,
}

impl EnergyOutcome {
    pub fn joules(&self) -> f64 {
        match self {
            EnergyOutcome::Measured { joules, .. } => *joules,
            EnergyOutcome::Unmeasured => 0.0,
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, EnergyOutcome::Measured { .. })
    }
}

/// Idle-subtracted power in watts, clamped so instantaneous power is never
/// negative.
#[inline]
fn active_watts(power_mw: f64, idle_mw: f64) -> f64 {
    (power_mw - idle_mw).max(0.0) / 1000.0
}

/// Integrates net energy (joules) over `[t_start, t_end]` from time-ordered
/// `samples`, subtracting `idle_mw` from every reading. Always ≥ 0.
pub fn integrate_power(
    samples: &[Sample],
    t_start: Instant,
    t_end: Instant,
    idle_mw: f64,
) -> EnergyOutcome {
    match samples {
        [] => {
            warn!("no power samples in integration window; energy is unmeasured");
            EnergyOutcome::Unmeasured
        }
        [only] => {
            // Constant-power approximation; a single reading stands in for
            // the whole window.
            warn!("only 1 power sample in window; using constant-power approximation");
            let duration = t_end.saturating_duration_since(t_start).as_secs_f64();
            EnergyOutcome::Measured {
                joules: active_watts(only.power_mw, idle_mw) * duration,
                samples: 1,
            }
        }
        _ => {
            let mut joules = 0.0;
            for pair in samples.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let p1_w = active_watts(a.power_mw, idle_mw);
                let p2_w = active_watts(b.power_mw, idle_mw);
                let dt = b.timestamp.saturating_duration_since(a.timestamp).as_secs_f64();
                joules += (p1_w + p2_w) / 2.0 * dt;
            }
            EnergyOutcome::Measured {
                joules,
                samples: samples.len(),
            }
        }
    }
}

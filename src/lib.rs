//! # Power Telemetry Sampler and Energy Integrator
//!
//! Instruments a running workload with power-consumption telemetry on Jetson
//! devices: launches `tegrastats`, continuously parses and buffers its power
//! readings, and answers "how much energy (joules) was consumed between T1
//! and T2, net of idle baseline power."
//!
//! ## Architecture
//! - **Parser:** Pure line → milliwatt extraction (`VDD_IN`, `POM_5V_IN`).
//! - **Supervisor:** Subprocess lifecycle + background reader thread.
//! - **Sample Buffer:** Bounded, mutex-guarded time series (ring eviction).
//! - **Integrator:** Trapezoidal energy integration with idle clamping.
//! - **Session:** Facade enforcing start → calibrate → measure → stop.
//!
//! ## Concurrency
//! - One reader thread blocks on subprocess stdout; everything else runs on
//!   the foreground driver thread.
//! - Single `parking_lot::Mutex` around the sample buffer; held only for the
//!   duration of an append/clear/snapshot, never across sleeps or I/O.
//! - Atomic flag for graceful shutdown; SIGTERM → bounded wait → kill.

pub mod energy;
pub mod error;
pub mod monitor;
pub mod utils;

pub use energy::integrate::{EnergyOutcome, integrate_power};
pub use error::MonitorError;
pub use monitor::buffer::{Sample, SampleBuffer};
pub use monitor::session::{PowerSession, SessionConfig};
pub use monitor::supervisor::ToolCommand;

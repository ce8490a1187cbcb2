//! # Energy-Aware Benchmark Demo Driver
//!
//! Orchestrates one full measurement cycle against the platform power tool:
//!
//! 1. Start the telemetry session (`tegrastats`, or the bundled mock emitter
//!    with `--mock` for machines without one).
//! 2. Calibrate the idle power baseline over a quiescent window.
//! 3. Run a CPU-bound workload between two timestamps.
//! 4. Integrate net energy over exactly that interval and export the
//!    measurement record plus the raw sample dump to `data/`.
//!
//! ## Usage
//! `energy_sampler [--mock] [--interval-ms N] [--idle-secs N] [--work-secs N]`

use std::env;
use std::fs::create_dir_all;
use std::path::Path;
use std::time::{Duration, Instant};

use log::{error, info, warn};

use energy_sampler::monitor::session::{PowerSession, SessionConfig};
use energy_sampler::monitor::supervisor::ToolCommand;
use energy_sampler::utils::export::{MeasurementRecord, write_measurements_csv, write_samples_csv};

const DEFAULT_INTERVAL_MS: u64 = 100;
const DEFAULT_IDLE_SECS: f64 = 5.0;
const DEFAULT_WORK_SECS: f64 = 3.0;

struct Args {
    mock: bool,
    interval_ms: u64,
    idle_secs: f64,
    work_secs: f64,
}

fn parse_args() -> Args {
    let mut args = Args {
        mock: false,
        interval_ms: DEFAULT_INTERVAL_MS,
        idle_secs: DEFAULT_IDLE_SECS,
        work_secs: DEFAULT_WORK_SECS,
    };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--mock" => args.mock = true,
            "--interval-ms" => {
                args.interval_ms = iter.next().and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_INTERVAL_MS)
            }
            "--idle-secs" => {
                args.idle_secs = iter.next().and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_IDLE_SECS)
            }
            "--work-secs" => {
                args.work_secs = iter.next().and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_WORK_SECS)
            }
            other => warn!("ignoring unknown argument: {}", other),
        }
    }
    args
}

/// Resolves the bundled mock emitter next to the current executable.
fn mock_tool(interval_ms: u64) -> ToolCommand {
    let program = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join("mock_telemetry")))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mock_telemetry".into());
    ToolCommand::custom(program, &["--interval", &interval_ms.to_string()])
}

/// CPU-bound stand-in for a real workload; spins until the deadline.
fn busy_work(duration: Duration) -> u64 {
    let deadline = Instant::now() + duration;
    let mut acc: u64 = 0;
    while Instant::now() < deadline {
        for i in 0..10_000u64 {
            acc = acc.wrapping_mul(6364136223846793005).wrapping_add(i);
        }
    }
    acc
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let config = if args.mock {
        SessionConfig {
            tool: mock_tool(args.interval_ms),
            ..SessionConfig::default()
        }
    } else {
        SessionConfig::tegrastats(args.interval_ms)
    };

    info!("=== ENERGY MEASUREMENT START ===");
    let result = PowerSession::scoped(config, |session| {
        let idle_mw = session.measure_idle(Duration::from_secs_f64(args.idle_secs))?;

        info!("running workload for {:.1}s...", args.work_secs);
        let t_start = Instant::now();
        let acc = busy_work(Duration::from_secs_f64(args.work_secs));
        let t_end = Instant::now();
        info!("workload done (checksum {:x})", acc);

        let outcome = session.integrate_energy(t_start, t_end, idle_mw)?;
        let samples = session.samples(Some(t_start), Some(t_end));
        Ok((idle_mw, t_start, t_end, outcome, samples))
    });

    let (idle_mw, t_start, t_end, outcome, samples) = match result {
        Ok(r) => r,
        Err(e) => {
            error!("measurement failed: {}", e);
            std::process::exit(1);
        }
    };

    let duration_s = t_end.duration_since(t_start).as_secs_f64();
    let record = MeasurementRecord::new(
        "busy_work",
        duration_s,
        outcome.joules(),
        samples.len(),
        outcome.is_measured(),
    );

    info!("=== RESULTS ===");
    info!("idle baseline : {:.1} mW", idle_mw);
    info!("duration      : {:.2} s", record.duration_s);
    if record.measured {
        info!("net energy    : {:.3} J", record.energy_j);
        info!("avg net power : {:.2} W", record.avg_power_w);
    } else {
        warn!("net energy    : unmeasured (no samples in window)");
    }

    let out_dir = Path::new("data");
    if let Err(e) = create_dir_all(out_dir) {
        error!("failed to create output directory: {}", e);
        return;
    }
    if let Err(e) = write_measurements_csv(&out_dir.join("measurements.csv"), &[record]) {
        error!("failed to export measurements: {}", e);
    }
    if let Err(e) = write_samples_csv(&out_dir.join("samples.csv"), &samples, t_start) {
        error!("failed to export samples: {}", e);
    }
    info!("=== ENERGY MEASUREMENT FINISHED ===");
}

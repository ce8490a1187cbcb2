//! mock_telemetry.rs
//! Fake tegrastats for development machines without Jetson hardware.
//!
//! Emits one tegrastats-shaped line per `--interval <ms>` on stdout, with the
//! `VDD_IN cur/avg` field carrying a noisy reading around a base power.
//! Environment overrides:
//! - `MOCK_BASE_MW`  — base power in mW (default 3000)
//! - `MOCK_NOISE_MW` — half-width of the uniform noise band (default 200)

use std::env;
use std::io::{Write, stdout};

use rand::random_range;
use spin_sleep::{SpinSleeper, SpinStrategy};
use std::time::Duration;

const DEFAULT_INTERVAL_MS: u64 = 100;
const DEFAULT_BASE_MW: f64 = 3000.0;
const DEFAULT_NOISE_MW: f64 = 200.0;

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn main() {
    let mut interval_ms = DEFAULT_INTERVAL_MS;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--interval" {
            interval_ms = args
                .next()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_INTERVAL_MS);
        }
    }

    let base_mw = env_f64("MOCK_BASE_MW", DEFAULT_BASE_MW);
    let noise_mw = env_f64("MOCK_NOISE_MW", DEFAULT_NOISE_MW);

    let period = Duration::from_millis(interval_ms);
    let sleeper = SpinSleeper::new(100_000).with_spin_strategy(SpinStrategy::YieldThread);
    let mut out = stdout();
    let mut avg_mw = base_mw;

    loop {
        let noise = if noise_mw > 0.0 {
            random_range(-noise_mw..noise_mw)
        } else {
            0.0
        };
        let cur_mw = (base_mw + noise).max(0.0);
        // Running average, like the second member of the vendor pair.
        avg_mw = avg_mw * 0.9 + cur_mw * 0.1;

        let line = format!(
            "RAM 2156/7471MB (lfb 1419x4MB) CPU [3%@729,2%@729,2%@729,2%@729] \
             EMC_FREQ 0%@204 GR3D_FREQ 0%@114 CPU@38.5C GPU@34C \
             VDD_IN {}/{} VDD_CPU_GPU_CV 307/307 VDD_SOC 922/922",
            cur_mw.round() as u64,
            avg_mw.round() as u64,
        );
        if writeln!(out, "{}", line).is_err() {
            break; // consumer went away
        }
        if out.flush().is_err() {
            break;
        }
        sleeper.sleep(period);
    }
}

use std::time::{Duration, Instant};

use energy_sampler::energy::integrate::{EnergyOutcome, integrate_power};
use energy_sampler::monitor::buffer::Sample;

fn sample_at(base: Instant, offset_ms: u64, power_mw: f64) -> Sample {
    Sample::new(base + Duration::from_millis(offset_ms), power_mw)
}

#[test]
fn two_sample_trapezoid_is_exact() {
    // (0s, 1000 mW) and (2s, 2000 mW) at idle 0: ((1.0 + 2.0) / 2) * 2 = 3 J.
    let base = Instant::now();
    let samples = vec![sample_at(base, 0, 1000.0), sample_at(base, 2000, 2000.0)];

    let outcome = integrate_power(&samples, base, base + Duration::from_secs(2), 0.0);
    assert_eq!(
        outcome,
        EnergyOutcome::Measured {
            joules: 3.0,
            samples: 2
        }
    );
}

#[test]
fn idle_clamp_never_goes_negative() {
    // All samples below the baseline contribute zero, not negative.
    let base = Instant::now();
    let samples = vec![sample_at(base, 0, 500.0), sample_at(base, 1000, 500.0)];

    let outcome = integrate_power(&samples, base, base + Duration::from_secs(1), 600.0);
    assert_eq!(outcome.joules(), 0.0);
    assert!(outcome.is_measured());
}

#[test]
fn clamp_happens_per_endpoint_before_averaging() {
    // 500 mW and 1500 mW at idle 1000: clamping before the average gives
    // (0 + 0.5) / 2 * 1 s = 0.25 J. Clamping the averaged value instead
    // would wrongly give 0.
    let base = Instant::now();
    let samples = vec![sample_at(base, 0, 500.0), sample_at(base, 1000, 1500.0)];

    let outcome = integrate_power(&samples, base, base + Duration::from_secs(1), 1000.0);
    assert!((outcome.joules() - 0.25).abs() < 1e-12);
}

#[test]
fn single_sample_uses_constant_power_approximation() {
    // One sample at 3000 mW, idle 1000, window 4 s: (3000-1000)/1000 * 4 = 8 J.
    let base = Instant::now();
    let samples = vec![sample_at(base, 5000, 3000.0)];

    let outcome = integrate_power(&samples, base, base + Duration::from_secs(4), 1000.0);
    assert_eq!(
        outcome,
        EnergyOutcome::Measured {
            joules: 8.0,
            samples: 1
        }
    );
}

#[test]
fn empty_window_is_unmeasured_not_zero() {
    let base = Instant::now();
    let outcome = integrate_power(&[], base, base + Duration::from_secs(1), 0.0);
    assert_eq!(outcome, EnergyOutcome::Unmeasured);
    assert_eq!(outcome.joules(), 0.0);
    assert!(!outcome.is_measured());
}

#[test]
fn energy_is_monotonically_non_increasing_in_idle() {
    let base = Instant::now();
    let samples: Vec<Sample> = (0..20u64)
        .map(|i| sample_at(base, i * 100, 1000.0 + (i as f64 * 37.0) % 800.0))
        .collect();
    let t_end = base + Duration::from_secs(2);

    let mut previous = f64::INFINITY;
    for idle_mw in [0.0, 250.0, 500.0, 1000.0, 2000.0, 5000.0] {
        let joules = integrate_power(&samples, base, t_end, idle_mw).joules();
        assert!(joules >= 0.0);
        assert!(joules <= previous, "energy rose when idle_mw increased");
        previous = joules;
    }
}

#[test]
fn multi_segment_accumulation() {
    // Three samples, two trapezoids: 1s at avg 1.5 W + 1s at avg 2.5 W = 4 J.
    let base = Instant::now();
    let samples = vec![
        sample_at(base, 0, 1000.0),
        sample_at(base, 1000, 2000.0),
        sample_at(base, 2000, 3000.0),
    ];

    let outcome = integrate_power(&samples, base, base + Duration::from_secs(2), 0.0);
    assert!((outcome.joules() - 4.0).abs() < 1e-12);
}

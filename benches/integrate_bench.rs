/*
Benchmarks trapezoidal energy integration over realistic buffer snapshots:
a benchmark driver calls integrate_energy after every workload, so the
integrator must stay cheap even over hours of 100 ms samples.
*/

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use std::hint::black_box;
use std::time::{Duration, Instant};

use energy_sampler::energy::integrate::integrate_power;
use energy_sampler::monitor::buffer::Sample;

const INTERVAL_MS: u64 = 100;
const IDLE_MW: f64 = 2500.0;

/// Synthetic sample train: noisy-ish power around 3 W at the default
/// sampling cadence.
fn synthetic_samples(count: usize, base: Instant) -> Vec<Sample> {
    (0..count)
        .map(|i| {
            let wobble = ((i * 37) % 800) as f64;
            Sample::new(
                base + Duration::from_millis(i as u64 * INTERVAL_MS),
                2600.0 + wobble,
            )
        })
        .collect()
}

fn bench_integrate_power(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate_power");

    for &count in &[100usize, 10_000, 100_000] {
        let base = Instant::now();
        let samples = synthetic_samples(count, base);
        let t_end = base + Duration::from_millis(count as u64 * INTERVAL_MS);

        group.bench_function(BenchmarkId::new("trapezoid", count), |b| {
            b.iter(|| {
                let outcome = integrate_power(
                    black_box(&samples),
                    black_box(base),
                    black_box(t_end),
                    black_box(IDLE_MW),
                );
                black_box(outcome.joules());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_integrate_power);
criterion_main!(benches);

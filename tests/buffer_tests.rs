use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use energy_sampler::monitor::buffer::{Sample, SampleBuffer};

fn sample_at(base: Instant, offset_ms: u64, power_mw: f64) -> Sample {
    Sample::new(base + Duration::from_millis(offset_ms), power_mw)
}

#[test]
fn ring_eviction_keeps_newest_capacity_samples_in_order() {
    let buffer = SampleBuffer::new(10);
    let base = Instant::now();
    for i in 0..25u64 {
        buffer.append(sample_at(base, i, i as f64));
    }

    let kept = buffer.query(None, None);
    assert_eq!(kept.len(), 10);
    // Exactly the most recent `capacity` samples, still time-ordered.
    let powers: Vec<f64> = kept.iter().map(|s| s.power_mw).collect();
    let expected: Vec<f64> = (15..25).map(|i| i as f64).collect();
    assert_eq!(powers, expected);
}

#[test]
fn clear_then_query_is_empty() {
    let buffer = SampleBuffer::new(100);
    let base = Instant::now();
    for i in 0..5u64 {
        buffer.append(sample_at(base, i * 10, 1000.0));
    }
    assert_eq!(buffer.len(), 5);

    buffer.clear();
    assert!(buffer.query(None, None).is_empty());
    assert!(buffer.is_empty());
}

#[test]
fn query_bounds_are_inclusive() {
    let buffer = SampleBuffer::new(100);
    let base = Instant::now();
    for i in 0..10u64 {
        buffer.append(sample_at(base, i * 100, i as f64));
    }

    let t0 = base + Duration::from_millis(200);
    let t1 = base + Duration::from_millis(500);
    let window = buffer.query(Some(t0), Some(t1));
    let powers: Vec<f64> = window.iter().map(|s| s.power_mw).collect();
    assert_eq!(powers, vec![2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn open_ended_bounds() {
    let buffer = SampleBuffer::new(100);
    let base = Instant::now();
    for i in 0..4u64 {
        buffer.append(sample_at(base, i * 100, i as f64));
    }

    let mid = base + Duration::from_millis(150);
    assert_eq!(buffer.query(Some(mid), None).len(), 2);
    assert_eq!(buffer.query(None, Some(mid)).len(), 2);
    assert_eq!(buffer.query(None, None).len(), 4);
}

#[test]
fn inverted_window_yields_empty_not_panic() {
    let buffer = SampleBuffer::new(100);
    let base = Instant::now();
    buffer.append(sample_at(base, 100, 1000.0));

    let t0 = base + Duration::from_millis(500);
    let t1 = base + Duration::from_millis(100);
    assert!(buffer.query(Some(t0), Some(t1)).is_empty());
}

#[test]
fn snapshot_is_consistent_under_concurrent_appends() {
    let buffer = Arc::new(SampleBuffer::new(10_000));
    let writer_buf = buffer.clone();

    let writer = thread::spawn(move || {
        let base = Instant::now();
        for i in 0..5_000u64 {
            writer_buf.append(Sample::new(base + Duration::from_micros(i), i as f64));
        }
    });

    // Concurrent snapshots must always observe a time-ordered prefix; never
    // a torn sample.
    for _ in 0..50 {
        let snap = buffer.query(None, None);
        for pair in snap.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
            assert!(pair[0].power_mw + 1.0 == pair[1].power_mw);
        }
    }

    writer.join().unwrap();
    assert_eq!(buffer.len(), 5_000);
}

//! buffer.rs
//! Bounded, thread-safe time-series store for power samples.
//!
//! Written by the supervisor's reader thread, read by the integrator and
//! calibrator on the foreground thread. One mutex guards every read, write,
//! and clear so queries always observe a consistent snapshot. The lock is
//! held only for the duration of a single buffer operation, never while
//! sleeping, parsing, or doing I/O.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Instant;

/// Default ring capacity. Vastly exceeds any realistic benchmark duration at
/// typical sampling intervals (100k samples @ 100 ms is almost 3 hours).
pub const DEFAULT_CAPACITY: usize = 100_000;

/// One `(timestamp, power_mw)` reading produced by the acquisition loop.
/// Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: Instant,
    pub power_mw: f64,
}

impl Sample {
    pub fn new(timestamp: Instant, power_mw: f64) -> Self {
        Self { timestamp, power_mw }
    }
}

/// Insertion-ordered (== time-ordered, single writer) ring of samples.
/// On overflow the oldest sample is evicted silently; acquisition never
/// blocks on buffer fullness.
pub struct SampleBuffer {
    samples: Mutex<VecDeque<Sample>>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Mutex::new(VecDeque::with_capacity(capacity.min(4096))),
            capacity,
        }
    }

    /// Appends one sample, evicting the oldest when at capacity.
    pub fn append(&self, sample: Sample) {
        let mut buf = self.samples.lock();
        if buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(sample);
    }

    /// Drops all buffered samples.
    pub fn clear(&self) {
        self.samples.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }

    /// Returns a snapshot of samples with timestamp in `[t_start, t_end]`
    /// (inclusive; open-ended for `None` bounds). The copy lets the caller
    /// integrate without holding the lock, so a slow query never blocks the
    /// reader thread.
    pub fn query(&self, t_start: Option<Instant>, t_end: Option<Instant>) -> Vec<Sample> {
        let buf = self.samples.lock();
        buf.iter()
            .filter(|s| t_start.is_none_or(|t0| s.timestamp >= t0))
            .filter(|s| t_end.is_none_or(|t1| s.timestamp <= t1))
            .copied()
            .collect()
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

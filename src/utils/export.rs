//! export.rs
//! CSV export of raw sample dumps and per-workload measurement records.
//!
//! Two outputs:
//! - `samples_*.csv` — one row per buffered sample (`offset_s,power_mw`),
//!   offsets relative to a caller-supplied anchor instant.
//! - `measurements_*.csv` — one row per measured workload: energy, duration,
//!   derived average power, and sample count. This is the record downstream
//!   aggregation consumes together with latency/token counts.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use csv::Writer;
use log::info;
use serde::Serialize;

use crate::monitor::buffer::Sample;

#[derive(Debug, Serialize)]
struct SampleRow {
    offset_s: f64,
    power_mw: f64,
}

/// One measured workload, ready for downstream aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct MeasurementRecord {
    pub label: String,
    pub duration_s: f64,
    pub energy_j: f64,
    pub avg_power_w: f64,
    pub samples: usize,
    /// False when the integration window contained no samples; the energy
    /// column then holds 0.0 and must be read as "unmeasured".
    pub measured: bool,
}

impl MeasurementRecord {
    pub fn new(label: &str, duration_s: f64, energy_j: f64, samples: usize, measured: bool) -> Self {
        let avg_power_w = if duration_s > 0.0 { energy_j / duration_s } else { 0.0 };
        Self {
            label: label.to_string(),
            duration_s,
            energy_j,
            avg_power_w,
            samples,
            measured,
        }
    }
}

/// Writes buffered samples as `offset_s,power_mw` rows, offsets measured from
/// `anchor`. Samples predating the anchor get negative offsets.
pub fn write_samples_csv(
    path: &Path,
    samples: &[Sample],
    anchor: Instant,
) -> Result<(), std::io::Error> {
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(BufWriter::new(file));
    for s in samples {
        let offset_s = if s.timestamp >= anchor {
            s.timestamp.duration_since(anchor).as_secs_f64()
        } else {
            -anchor.duration_since(s.timestamp).as_secs_f64()
        };
        wtr.serialize(SampleRow {
            offset_s,
            power_mw: s.power_mw,
        })?;
    }
    wtr.flush()?;
    info!("exported {} samples to {:?}", samples.len(), path);
    Ok(())
}

/// Writes measurement records, one row per workload.
pub fn write_measurements_csv(
    path: &Path,
    records: &[MeasurementRecord],
) -> Result<(), std::io::Error> {
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(BufWriter::new(file));
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    info!("exported {} measurement records to {:?}", records.len(), path);
    Ok(())
}

//! parser.rs
//! Extracts a power reading (milliwatts) from one line of tegrastats output.
//!
//! A tegrastats line carries many unrelated fields (RAM, CPU load, clocks,
//! temperatures); power shows up as `FIELD current/average`, e.g.
//! `VDD_IN 2594/2594`. We take the *current* member and ignore the average.
//! Absence of a recognized field is not an error: most lines simply don't
//! carry one, so the caller must not log or abort on `None`.

/// Power fields recognized, in priority order. `VDD_IN` is total input power;
/// `POM_5V_IN` is the equivalent on older Jetson models.
const POWER_FIELDS: &[&str] = &["VDD_IN", "POM_5V_IN"];

/// Parses the current power draw in mW from a raw tool output line.
/// Returns `None` for lines without a recognized, well-formed power field.
/// Never panics on malformed numeric text.
pub fn parse_power_mw(line: &str) -> Option<f64> {
    for field in POWER_FIELDS {
        if let Some(mw) = parse_field(line, field) {
            return Some(mw);
        }
    }
    None
}

/// Looks for `field cur/avg` as adjacent whitespace-separated tokens.
/// Both members must parse as numbers (mirrors the strictness of the vendor
/// format); only the current member is returned.
fn parse_field(line: &str, field: &str) -> Option<f64> {
    let mut tokens = line.split_whitespace();
    while let Some(tok) = tokens.next() {
        if tok != field {
            continue;
        }
        let pair = tokens.next()?;
        let (cur, avg) = pair.split_once('/')?;
        let cur_mw: f64 = cur.trim().parse().ok()?;
        let _avg_mw: f64 = avg.trim().parse().ok()?;
        if cur_mw < 0.0 {
            return None;
        }
        return Some(cur_mw);
    }
    None
}

//! Usage-threshold filtering
//!
//! The only place threshold policy is enforced. The threshold itself is
//! caller-supplied; the UI picks its own default.

use crate::record::PitchRecord;

/// Threshold applied when a request does not supply one
pub const DEFAULT_USAGE_THRESHOLD: f64 = 0.02;
/// Threshold for the "exclude low-usage pitches" toggle
pub const STRICT_USAGE_THRESHOLD: f64 = 0.05;

/// Keep records with a known usage at or above `threshold` and with both
/// break coordinates present. Relative order is preserved.
pub fn filter_by_usage(records: Vec<PitchRecord>, threshold: f64) -> Vec<PitchRecord> {
    records
        .into_iter()
        .filter(|r| {
            r.usage.is_some_and(|u| u >= threshold) && r.ivb.is_some() && r.horz_brk.is_some()
        })
        .collect()
}

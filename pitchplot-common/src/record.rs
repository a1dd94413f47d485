//! Pitch record model and per-record validation
//!
//! One record corresponds to one row of the source statistics table. The
//! model reply provides no structural guarantee, so every field is coerced
//! individually: a bad numeric cell degrades to "unknown" while a bad
//! `pitchType` rejects the whole record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One validated pitch row.
///
/// All numeric fields are either a finite number or unknown (`None`).
/// String-typed cells, placeholder dashes, and out-of-range fractions
/// never survive coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchRecord {
    /// Pitch type label as printed in the table (e.g. "Fastball (4S)")
    pub pitch_type: String,
    /// Fraction of all pitches thrown, in [0, 1]
    pub usage: Option<f64>,
    /// Velocity, mph
    pub velocity: Option<f64>,
    /// Spin rate, rpm
    pub spin: Option<f64>,
    /// Induced vertical break, inches
    #[serde(rename = "iVB")]
    pub ivb: Option<f64>,
    /// Horizontal break, inches
    pub horz_brk: Option<f64>,
    /// Release extension, feet
    pub extension: Option<f64>,
    /// Release height, feet
    pub rel_ht: Option<f64>,
    /// Release side, feet
    pub rel_side: Option<f64>,
    /// Vertical approach angle, degrees
    pub vaa: Option<f64>,
    pub strike_percent: Option<f64>,
    pub zone_percent: Option<f64>,
    pub swg_strk_percent: Option<f64>,
    pub whiff_percent: Option<f64>,
    pub chase_percent: Option<f64>,
    pub zone_whiff_percent: Option<f64>,
    pub ground_ball_percent: Option<f64>,
    pub fly_ball_percent: Option<f64>,
}

impl PitchRecord {
    /// Coerce one decoded JSON value into a record.
    ///
    /// Returns `None` when the value is not an object or when `pitchType`
    /// is missing, empty, or not a string. Numeric fields degrade to
    /// `None` individually and never reject the record.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let pitch_type = match obj.get("pitchType").and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => return None,
        };

        let usage = finite_number(obj.get("usage")).filter(|u| (0.0..=1.0).contains(u));

        Some(Self {
            pitch_type,
            usage,
            velocity: finite_number(obj.get("velocity")),
            spin: finite_number(obj.get("spin")),
            ivb: finite_number(obj.get("iVB")),
            horz_brk: finite_number(obj.get("horzBrk")),
            extension: finite_number(obj.get("extension")),
            rel_ht: finite_number(obj.get("relHt")),
            rel_side: finite_number(obj.get("relSide")),
            vaa: finite_number(obj.get("vaa")),
            strike_percent: finite_number(obj.get("strikePercent")),
            zone_percent: finite_number(obj.get("zonePercent")),
            swg_strk_percent: finite_number(obj.get("swgStrkPercent")),
            whiff_percent: finite_number(obj.get("whiffPercent")),
            chase_percent: finite_number(obj.get("chasePercent")),
            zone_whiff_percent: finite_number(obj.get("zoneWhiffPercent")),
            ground_ball_percent: finite_number(obj.get("groundBallPercent")),
            fly_ball_percent: finite_number(obj.get("flyBallPercent")),
        })
    }
}

/// Accept only a finite JSON number. Strings ("52%", "-"), booleans,
/// objects, and non-finite values all map to unknown without coercion.
fn finite_number(value: Option<&Value>) -> Option<f64> {
    value?.as_f64().filter(|n| n.is_finite())
}

/// Validate a decoded array, dropping rejected records silently.
///
/// Order of the surviving records matches the input order.
pub fn validate_records(values: &[Value]) -> Vec<PitchRecord> {
    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        match PitchRecord::from_value(value) {
            Some(record) => records.push(record),
            None => debug!("Dropping unparseable pitch record at index {}", index),
        }
    }
    records
}

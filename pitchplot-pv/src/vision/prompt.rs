//! Extraction instruction sent with every image
//!
//! The column-order callouts exist because the source tables carry several
//! visually similar percentage columns and the model reliably confuses
//! them without explicit positions.

/// Instruction describing the table's column layout and the target JSON
/// shape. One current version; superseded wordings are not kept.
pub const EXTRACTION_PROMPT: &str = r#"Extract pitch data from this baseball statistics table screenshot. Read each column carefully - the columns are in this exact order:

Pitch Type - Ungrouped | P% | ERA | xFIP | SIERA | SO%-BB% | P | Vel | Spin | SpinEff | iVB | HorzBrk | Extension | Rel Ht | RelSide | VertApprAngle | RelTilt | BrkTilt | Strike% | InZone% | CSW% | CallStrk% | SwStrk% | Whiff% | Chase% | InZoneWhiff% | PutAway% | BIP | Ground% | Fly% | xSLG | xwOBAcon

IMPORTANT: Pay close attention to these specific columns:
- "InZone%" is column 20 (comes right after Strike%)
- "SwStrk%" is column 23 (comes after CallStrk%, this is swinging strike percentage)
- "Whiff%" is column 24 (comes right after SwStrk%)
- "Chase%" is column 25 (comes right after Whiff%)
- "InZoneWhiff%" is column 26 (comes right after Chase%)
- "Ground%" is column 29 (comes after BIP)

Return ONLY a JSON array. For each pitch row, extract:
- "pitchType": from first column "Pitch Type - Ungrouped"
- "usage": from "P%" column as decimal (e.g., 52.1% becomes 0.521)
- "velocity": from "Vel" column as number
- "spin": from "Spin" column as number
- "iVB": from "iVB" column as number
- "horzBrk": from "HorzBrk" column as number
- "extension": from "Extension" column as number
- "relHt": from "Rel Ht" column as number (column 14, release height)
- "relSide": from "RelSide" column as number (column 15, release side)
- "vaa": from "VertApprAngle" column as number
- "strikePercent": from "Strike%" column as number (column 19)
- "zonePercent": from "InZone%" column as number (column 20, NOT InZoneWhiff%)
- "swgStrkPercent": from "SwStrk%" column as number (column 23, swinging strike %)
- "whiffPercent": from "Whiff%" column as number (column 24)
- "chasePercent": from "Chase%" column as number (column 25)
- "zoneWhiffPercent": from "InZoneWhiff%" column as number (column 26)
- "groundBallPercent": from "Ground%" column as number (column 29)
- "flyBallPercent": from "Fly%" column as number (column 30)

Only include pitches with numeric iVB and HorzBrk values. Use null for missing/"-" values.
Return ONLY valid JSON array, no markdown or explanation."#;

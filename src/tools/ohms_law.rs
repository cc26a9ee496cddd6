//! Ohm's law solver (V = I * R)

use serde::Serialize;

use super::{divide, finite, Payload};
use crate::error::ToolError;

/// The solved quantity, serialized as `{"<quantity>": value}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OhmsLawResult {
    Resistance(f64),
    Current(f64),
    Voltage(f64),
}

/// Solve for the missing quantity.
///
/// Pairs are tried in order: voltage+current, voltage+resistance,
/// current+resistance. A third field, if present, is ignored and never
/// decoded.
pub fn solve(payload: &Payload<'_>) -> Result<OhmsLawResult, ToolError> {
    let has = |key: &str| payload.get(key).is_some();

    match (has("voltage"), has("current"), has("resistance")) {
        (true, true, _) => divide(
            payload.require_number("voltage")?,
            payload.require_number("current")?,
        )
        .map(OhmsLawResult::Resistance),
        (true, false, true) => divide(
            payload.require_number("voltage")?,
            payload.require_number("resistance")?,
        )
        .map(OhmsLawResult::Current),
        (false, true, true) => {
            let current = payload.require_number("current")?;
            let resistance = payload.require_number("resistance")?;
            finite(current * resistance).map(OhmsLawResult::Voltage)
        }
        _ => Err(ToolError::InsufficientParameters),
    }
}

//! Series resistor sizing for an LED

use serde::Serialize;

use super::{divide, finite, round_to, Payload};
use crate::error::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LedResistorResult {
    /// Ohms, 2 decimal places
    pub resistance: f64,
    /// Watts dissipated in the resistor, 3 decimal places
    pub power: f64,
}

/// `ledCurrent` is given in milliamps.
pub fn size(payload: &Payload<'_>) -> Result<LedResistorResult, ToolError> {
    let source_voltage = payload.require_number("sourceVoltage")?;
    let led_voltage = payload.require_number("ledVoltage")?;
    let led_current = payload.require_number("ledCurrent")?;

    let current = led_current / 1000.0;
    let drop = source_voltage - led_voltage;

    let resistance = divide(drop, current)?;
    let power = finite(drop * current)?;

    Ok(LedResistorResult {
        resistance: round_to(resistance, 2),
        power: round_to(power, 3),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn size_json(body: &Value) -> Result<LedResistorResult, ToolError> {
        size(&Payload::new(body.as_object().unwrap()))
    }

    #[test]
    fn test_red_led_on_nine_volts() {
        let result =
            size_json(&json!({"sourceVoltage": 9, "ledVoltage": 2, "ledCurrent": 20})).unwrap();
        assert!((result.resistance - 350.0).abs() < 1e-9);
        assert!((result.power - 0.14).abs() < 1e-9);
    }

    #[test]
    fn test_rounding() {
        let result =
            size_json(&json!({"sourceVoltage": 5, "ledVoltage": 3.2, "ledCurrent": 15})).unwrap();
        // 1.8 / 0.015 = 120, 1.8 * 0.015 = 0.027
        assert!((result.resistance - 120.0).abs() < 1e-9);
        assert!((result.power - 0.027).abs() < 1e-9);

        let result =
            size_json(&json!({"sourceVoltage": 3.3, "ledVoltage": 2.1, "ledCurrent": 7})).unwrap();
        // 1.2 / 0.007 = 171.428..., 1.2 * 0.007 = 0.0084
        assert!((result.resistance - 171.43).abs() < 1e-9);
        assert!((result.power - 0.008).abs() < 1e-9);
    }

    #[test]
    fn test_zero_current_is_division_by_zero() {
        assert_eq!(
            size_json(&json!({"sourceVoltage": 9, "ledVoltage": 2, "ledCurrent": 0})),
            Err(ToolError::DivisionByZero)
        );
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(
            size_json(&json!({"sourceVoltage": 9, "ledVoltage": 2})),
            Err(ToolError::MissingField("ledCurrent"))
        );
        assert_eq!(
            size_json(&json!({})),
            Err(ToolError::MissingField("sourceVoltage"))
        );
    }

    #[test]
    fn test_non_numeric_field() {
        assert!(matches!(
            size_json(&json!({"sourceVoltage": "9V", "ledVoltage": 2, "ledCurrent": 20})),
            Err(ToolError::InvalidField { field: "sourceVoltage", .. })
        ));
    }

    #[test]
    fn test_source_below_led_voltage_passes_through() {
        let result =
            size_json(&json!({"sourceVoltage": 1, "ledVoltage": 2, "ledCurrent": 10})).unwrap();
        assert!((result.resistance + 100.0).abs() < 1e-9);
        assert!((result.power + 0.01).abs() < 1e-9);
    }
}

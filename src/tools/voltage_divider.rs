//! Two-resistor voltage divider
//!
//! Resistances are in ohms. With `r1` and `r2` the output voltage is
//! computed; with `outputVoltage` and `r2` the required `r1` is.

use serde::Serialize;

use super::{divide, finite, round_to, Payload};
use crate::error::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DividerResult {
    Output {
        #[serde(rename = "outputVoltage")]
        output_voltage: f64,
        /// Milliamps through the divider
        current: f64,
    },
    UpperResistor { r1: f64, current: f64 },
}

pub fn solve(payload: &Payload<'_>) -> Result<DividerResult, ToolError> {
    let input_voltage = payload.require_number("inputVoltage")?;
    let r2 = payload.require_number("r2")?;

    if let Some(r1) = payload.number("r1")? {
        let total = r1 + r2;
        let output_voltage = divide(input_voltage * r2, total)?;
        let current = milliamps(input_voltage, total)?;
        return Ok(DividerResult::Output {
            output_voltage: round_to(output_voltage, 2),
            current: round_to(current, 2),
        });
    }

    let output_voltage = payload.require_number("outputVoltage")?;
    let r1 = finite(r2 * (divide(input_voltage, output_voltage)? - 1.0))?;
    let current = milliamps(input_voltage, r1 + r2)?;

    Ok(DividerResult::UpperResistor {
        r1: round_to(r1, 2),
        current: round_to(current, 2),
    })
}

fn milliamps(voltage: f64, resistance: f64) -> Result<f64, ToolError> {
    divide(voltage, resistance).map(|amps| amps * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn solve_json(body: &Value) -> Result<DividerResult, ToolError> {
        solve(&Payload::new(body.as_object().unwrap()))
    }

    #[test]
    fn test_equal_resistors_halve_the_input() {
        let result =
            solve_json(&json!({"inputVoltage": 12, "r1": 10_000, "r2": 10_000})).unwrap();
        assert_eq!(
            result,
            DividerResult::Output {
                output_voltage: 6.0,
                current: 0.6
            }
        );
    }

    #[test]
    fn test_upper_resistor_for_target_output() {
        // 5 V -> 3.3 V over 10k: R1 = 10k * (5 / 3.3 - 1) = 5151.52
        let result =
            solve_json(&json!({"inputVoltage": 5, "outputVoltage": 3.3, "r2": 10_000})).unwrap();
        match result {
            DividerResult::UpperResistor { r1, current } => {
                assert!((r1 - 5151.52).abs() < 1e-9);
                assert!((current - 0.33).abs() < 1e-9);
            }
            DividerResult::Output { .. } => panic!("expected r1 result"),
        }
    }

    #[test]
    fn test_r1_takes_precedence() {
        let result = solve_json(
            &json!({"inputVoltage": 10, "r1": 1000, "r2": 3000, "outputVoltage": 1}),
        )
        .unwrap();
        assert!(matches!(result, DividerResult::Output { output_voltage, .. } if (output_voltage - 7.5).abs() < 1e-9));
    }

    #[test]
    fn test_zero_resistance_and_zero_output() {
        assert_eq!(
            solve_json(&json!({"inputVoltage": 5, "r1": 0, "r2": 0})),
            Err(ToolError::DivisionByZero)
        );
        assert_eq!(
            solve_json(&json!({"inputVoltage": 5, "outputVoltage": 0, "r2": 1000})),
            Err(ToolError::DivisionByZero)
        );
    }

    #[test]
    fn test_missing_inputs() {
        assert_eq!(
            solve_json(&json!({"r1": 10, "r2": 10})),
            Err(ToolError::MissingField("inputVoltage"))
        );
        assert_eq!(
            solve_json(&json!({"inputVoltage": 5, "r2": 10})),
            Err(ToolError::MissingField("outputVoltage"))
        );
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(DividerResult::Output {
            output_voltage: 6.0,
            current: 0.6,
        })
        .unwrap();
        assert_eq!(value, json!({"outputVoltage": 6.0, "current": 0.6}));
    }
}

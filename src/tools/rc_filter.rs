//! First-order RC filter analysis

use std::f64::consts::PI;

use serde::Serialize;
use serde_json::Value;

use super::{divide, finite, Payload};
use crate::error::ToolError;

const DECADES: u32 = 4;
const POINTS_PER_DECADE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Lowpass,
    Highpass,
}

impl FilterType {
    fn from_payload(value: Option<&Value>) -> Result<Self, ToolError> {
        match value {
            None => Ok(Self::Lowpass),
            Some(Value::String(s)) => match s.as_str() {
                "lowpass" => Ok(Self::Lowpass),
                "highpass" => Ok(Self::Highpass),
                other => Err(ToolError::UnknownFilterType(other.to_string())),
            },
            Some(_) => Err(ToolError::InvalidField {
                field: "filterType",
                expected: "a string",
            }),
        }
    }

    /// Gain in dB at `ratio` = f / fc
    fn magnitude(self, ratio: f64) -> f64 {
        let x = match self {
            Self::Lowpass => ratio,
            Self::Highpass => ratio.recip(),
        };
        -20.0 * (1.0 + x * x).sqrt().log10()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponsePoint {
    /// Hz
    pub frequency: f64,
    /// dB
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RcFilterResult {
    /// Hz
    pub cutoff_frequency: f64,
    /// Seconds
    pub time_constant: f64,
    pub filter_type: FilterType,
    /// Log-spaced from fc/100 up to fc*100
    pub response: Vec<ResponsePoint>,
}

/// `resistance` in ohms, `capacitance` in farads.
pub fn analyze(payload: &Payload<'_>) -> Result<RcFilterResult, ToolError> {
    let resistance = payload.require_number("resistance")?;
    let capacitance = payload.require_number("capacitance")?;
    let filter_type = FilterType::from_payload(payload.get("filterType"))?;

    let time_constant = finite(resistance * capacitance)?;
    let cutoff_frequency = divide(1.0, 2.0 * PI * time_constant)?;

    let start = cutoff_frequency / 100.0;
    let response = (0..=DECADES * POINTS_PER_DECADE)
        .map(|i| {
            let frequency =
                finite(start * 10_f64.powf(f64::from(i) / f64::from(POINTS_PER_DECADE)))?;
            let magnitude = finite(filter_type.magnitude(frequency / cutoff_frequency))?;
            Ok(ResponsePoint {
                frequency,
                magnitude,
            })
        })
        .collect::<Result<Vec<_>, ToolError>>()?;

    Ok(RcFilterResult {
        cutoff_frequency,
        time_constant,
        filter_type,
        response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analyze_json(body: &Value) -> Result<RcFilterResult, ToolError> {
        analyze(&Payload::new(body.as_object().unwrap()))
    }

    #[test]
    fn test_lowpass_one_k_one_micro() {
        let result = analyze_json(&json!({"resistance": 1000, "capacitance": 1e-6})).unwrap();
        assert!((result.cutoff_frequency - 159.154_943).abs() < 1e-5);
        assert!((result.time_constant - 0.001).abs() < 1e-12);
        assert_eq!(result.filter_type, FilterType::Lowpass);
        assert_eq!(result.response.len(), 41);

        // midpoint sits on the cutoff frequency
        let at_cutoff = result.response[20];
        assert!((at_cutoff.frequency - result.cutoff_frequency).abs() < 1e-6);
        assert!((at_cutoff.magnitude + 3.0103).abs() < 1e-3);

        // passband is flat, stopband falls off
        assert!(result.response[0].magnitude > -0.01);
        assert!(result.response[40].magnitude < -39.0);
    }

    #[test]
    fn test_highpass_mirrors_lowpass() {
        let result = analyze_json(
            &json!({"resistance": 1000, "capacitance": 1e-6, "filterType": "highpass"}),
        )
        .unwrap();
        assert_eq!(result.filter_type, FilterType::Highpass);
        assert!(result.response[0].magnitude < -39.0);
        assert!(result.response[40].magnitude > -0.01);
        assert!((result.response[20].magnitude + 3.0103).abs() < 1e-3);
    }

    #[test]
    fn test_zero_time_constant() {
        assert_eq!(
            analyze_json(&json!({"resistance": 0, "capacitance": 1e-6})),
            Err(ToolError::DivisionByZero)
        );
    }

    #[test]
    fn test_response_beyond_f64_range_is_rejected() {
        // fc is about 3.2e306, so the top of the sweep overflows
        assert_eq!(
            analyze_json(
                &json!({"resistance": 5e-154, "capacitance": 1e-154, "filterType": "highpass"})
            ),
            Err(ToolError::NonFinite)
        );
    }

    #[test]
    fn test_bad_filter_type() {
        assert_eq!(
            analyze_json(&json!({"resistance": 1, "capacitance": 1, "filterType": "bandpass"})),
            Err(ToolError::UnknownFilterType("bandpass".to_string()))
        );
        assert!(matches!(
            analyze_json(&json!({"resistance": 1, "capacitance": 1, "filterType": 3})),
            Err(ToolError::InvalidField { field: "filterType", .. })
        ));
    }

    #[test]
    fn test_missing_capacitance() {
        assert_eq!(
            analyze_json(&json!({"resistance": 1000})),
            Err(ToolError::MissingField("capacitance"))
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let result = analyze_json(&json!({"resistance": 1000, "capacitance": 1e-6})).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("cutoffFrequency").is_some());
        assert!(value.get("timeConstant").is_some());
        assert_eq!(value["filterType"], "lowpass");
        assert!(value["response"][0].get("frequency").is_some());
    }
}

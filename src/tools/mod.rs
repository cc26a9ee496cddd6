//! Calculation tools
//!
//! Every tool is a pure function from a decoded JSON object to a typed
//! result. Failures are returned as `ToolError`, never panics.

pub mod base_convert;
pub mod led_resistor;
pub mod ohms_law;
pub mod rc_filter;
pub mod voltage_divider;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, ToolError};

/// Request payload: the fields of a JSON object body
#[derive(Debug, Clone, Copy)]
pub struct Payload<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Payload<'a> {
    pub const fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw value of a field, `None` when the key is absent
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key)
    }

    /// Optional numeric field. A key that is present must hold a number.
    pub fn number(&self, key: &'static str) -> Result<Option<f64>, ToolError> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(value) => value.as_f64().map(Some).ok_or(ToolError::InvalidField {
                field: key,
                expected: "a number",
            }),
        }
    }

    /// Required numeric field
    pub fn require_number(&self, key: &'static str) -> Result<f64, ToolError> {
        self.number(key)?.ok_or(ToolError::MissingField(key))
    }

    /// Required field of any JSON type
    pub fn require(&self, key: &'static str) -> Result<&'a Value, ToolError> {
        self.get(key).ok_or(ToolError::MissingField(key))
    }
}

/// Calculators reachable under `/api/tools/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    OhmsLaw,
    LedResistor,
    BaseConvert,
    VoltageDivider,
    RcFilter,
}

impl Tool {
    pub const ALL: [Self; 5] = [
        Self::OhmsLaw,
        Self::LedResistor,
        Self::BaseConvert,
        Self::VoltageDivider,
        Self::RcFilter,
    ];

    /// Request path the tool is mounted on
    pub const fn path(self) -> &'static str {
        match self {
            Self::OhmsLaw => "/api/tools/ohms-law",
            Self::LedResistor => "/api/tools/led-resistor",
            Self::BaseConvert => "/api/tools/base-convert",
            Self::VoltageDivider => "/api/tools/voltage-divider",
            Self::RcFilter => "/api/tools/rc-filter",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.path() == path)
    }

    /// Run the calculator and encode its result as the response body
    pub fn run(self, payload: &Payload<'_>) -> Result<Value, ApiError> {
        match self {
            Self::OhmsLaw => encode(&ohms_law::solve(payload)?),
            Self::LedResistor => encode(&led_resistor::size(payload)?),
            Self::BaseConvert => encode(&base_convert::convert(payload)?),
            Self::VoltageDivider => encode(&voltage_divider::solve(payload)?),
            Self::RcFilter => encode(&rc_filter::analyze(payload)?),
        }
    }
}

fn encode<T: Serialize>(output: &T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(output)?)
}

/// Reject NaN and infinities, which have no JSON representation
pub(crate) fn finite(value: f64) -> Result<f64, ToolError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ToolError::NonFinite)
    }
}

pub(crate) fn divide(numerator: f64, denominator: f64) -> Result<f64, ToolError> {
    if denominator == 0.0 {
        return Err(ToolError::DivisionByZero);
    }
    finite(numerator / denominator)
}

/// Round half away from zero to `places` decimal digits
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}

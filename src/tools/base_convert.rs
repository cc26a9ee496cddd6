//! Integer radix conversion
//!
//! Input numerals may carry surrounding whitespace, a sign, a radix prefix
//! matching the source base (`0b`, `0o`, `0x`), and single underscores
//! between digits. Output is unprefixed; hexadecimal is uppercase.

use serde::Serialize;
use serde_json::Value;

use super::Payload;
use crate::error::ToolError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub result: String,
}

/// Signed integer as sign plus magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integer {
    pub negative: bool,
    pub magnitude: u128,
}

pub fn convert(payload: &Payload<'_>) -> Result<Conversion, ToolError> {
    let numeral = numeral_text(payload.require("number")?)?;
    let from_base = integer_field(payload, "fromBase")?;
    let to_base = target_radix(payload.require("toBase")?);

    let radix = u32::try_from(from_base)
        .ok()
        .filter(|base| (2..=36).contains(base))
        .ok_or(ToolError::UnsupportedBase(from_base))?;

    let value = parse_integer(&numeral, radix)?;
    Ok(Conversion {
        result: format_integer(value, to_base),
    })
}

/// Numbers are converted through their decimal text, so `25.5` fails to parse.
///
/// Integer literals beyond 64 bits arrive as lossy floats and are refused;
/// such values must be sent as strings.
fn numeral_text(value: &Value) -> Result<String, ToolError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) if n.is_f64() && n.as_f64().is_some_and(beyond_64_bits) => {
            Err(ToolError::InvalidField {
                field: "number",
                expected: "a string for integers beyond 64 bits",
            })
        }
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ToolError::InvalidField {
            field: "number",
            expected: "a string or integer",
        }),
    }
}

/// 2^63, the magnitude at which a negative literal no longer fits `i64`
const INTEGER_LITERAL_LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn beyond_64_bits(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() >= INTEGER_LITERAL_LIMIT
}

/// 2, 8 and 16 select their radix; anything else, of any JSON type, is decimal
#[allow(clippy::float_cmp)]
fn target_radix(value: &Value) -> u32 {
    match value.as_f64() {
        Some(base) if base == 2.0 => 2,
        Some(base) if base == 8.0 => 8,
        Some(base) if base == 16.0 => 16,
        _ => 10,
    }
}

fn integer_field(payload: &Payload<'_>, key: &'static str) -> Result<i64, ToolError> {
    payload
        .require(key)?
        .as_i64()
        .ok_or(ToolError::InvalidField {
            field: key,
            expected: "an integer",
        })
}

/// Parse a numeral in `radix` (2..=36)
pub fn parse_integer(text: &str, radix: u32) -> Result<Integer, ToolError> {
    let invalid = || ToolError::InvalidDigit {
        literal: text.to_string(),
        base: radix,
    };

    let trimmed = text.trim();
    let (negative, unsigned) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    let digits = match strip_radix_prefix(unsigned, radix) {
        // one underscore may separate the prefix from the digits
        Some(rest) => rest.strip_prefix('_').unwrap_or(rest),
        None => unsigned,
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__")
    {
        return Err(invalid());
    }

    let mut magnitude: u128 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(radix).ok_or_else(invalid)?;
        magnitude = magnitude
            .checked_mul(u128::from(radix))
            .and_then(|m| m.checked_add(u128::from(digit)))
            .ok_or_else(|| ToolError::Overflow(trimmed.to_string()))?;
    }

    Ok(Integer {
        negative: negative && magnitude != 0,
        magnitude,
    })
}

fn strip_radix_prefix(text: &str, radix: u32) -> Option<&str> {
    let marker = match radix {
        2 => 'b',
        8 => 'o',
        16 => 'x',
        _ => return None,
    };
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some('0'), Some(c)) if c.eq_ignore_ascii_case(&marker) => Some(chars.as_str()),
        _ => None,
    }
}

/// Format in base 2, 8 or 16; any other base yields decimal
pub fn format_integer(value: Integer, base: u32) -> String {
    let sign = if value.negative { "-" } else { "" };
    let digits = match base {
        2 => format!("{:b}", value.magnitude),
        8 => format!("{:o}", value.magnitude),
        16 => format!("{:X}", value.magnitude),
        _ => value.magnitude.to_string(),
    };
    format!("{sign}{digits}")
}

use serde::Serialize;
use serde::Serializer;
use std::fmt::Display;

/// A single roster field after reading.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Integral numbers that fit an `i64`, used to print `2019` rather than `2019.0`.
    fn as_integer(number: f64) -> Option<i64> {
        if number.fract() == 0.0 && number.abs() < 9.0e15 {
            Some(number as i64)
        } else {
            None
        }
    }
}

impl Display for FieldValue {
    /// String form used for normalization and year extraction.
    /// `Null` prints as an empty string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(true) => write!(f, "True"),
            FieldValue::Bool(false) => write!(f, "False"),
            FieldValue::Number(number) => match Self::as_integer(*number) {
                Some(integer) => write!(f, "{integer}"),
                None => write!(f, "{number}"),
            },
            FieldValue::Text(text) => write!(f, "{text}"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Bool(value) => serializer.serialize_bool(*value),
            FieldValue::Number(number) => match Self::as_integer(*number) {
                Some(integer) => serializer.serialize_i64(integer),
                None if number.is_finite() => serializer.serialize_f64(*number),
                None => serializer.serialize_none(),
            },
            FieldValue::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_owned())
    }
}

impl From<f64> for FieldValue {
    fn from(number: f64) -> Self {
        FieldValue::Number(number)
    }
}

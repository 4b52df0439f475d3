//! Field values of result rows.

use chrono::NaiveDateTime;
use std::fmt;

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null (masked) value.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Integer value (short, int, long, unsignedByte).
    Integer(i64),
    /// Floating-point value (float, double).
    Double(f64),
    /// Complex value (floatComplex, doubleComplex).
    Complex { re: f64, im: f64 },
    /// String value (char, unicodeChar).
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Date/time value.
    DateTime(NaiveDateTime),
}

impl Value {
    /// Check if the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to i64.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Boolean(b) => Some(*b as i64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to f64.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Integer(i) => Some(*i as f64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to get the value as a NaiveDateTime.
    ///
    /// Strings in ISO-8601 form (`2024-01-31T12:00:00`, optionally with
    /// fractional seconds) are parsed.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            Value::String(s) => NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S%.f").ok(),
            _ => None,
        }
    }

    /// Try to get the value as raw bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            Value::String(s) => Some(s.as_bytes()),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", d),
            Value::Complex { re, im } => {
                if *im < 0.0 {
                    write!(f, "{}-{}j", re, -im)
                } else {
                    write!(f, "{}+{}j", re, im)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Bytes(bytes) => write!(f, "<BYTES: {} bytes>", bytes.len()),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

//! Typed option values and their coercion from raw tokens.

use crate::config::{Kind, OptionSpec, Settings};
use crate::parser::ParseError;
use serde::Serialize;
use std::fmt;

/// A decoded option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Str(String),
    Int(i64),
    UInt(u64),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Str(_) => Kind::Str,
            Value::Int(_) => Kind::Int,
            Value::UInt(_) => Kind::UInt,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::UInt(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
        }
    }
}

/// Strip an alternate-base prefix, leaving only digits. Signs after the
/// prefix are not accepted.
fn strip_radix<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    let digits = raw.strip_prefix(prefix)?;
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    Some(digits)
}

/// Parse a signed integer: decimal first, then `0x` hex and `0b` binary
/// when the settings allow them. Overflow is a failure in every base.
pub fn parse_signed(raw: &str, settings: &Settings) -> Option<i64> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    if settings.allow_hex {
        if let Some(n) = strip_radix(raw, "0x").and_then(|d| i64::from_str_radix(d, 16).ok()) {
            return Some(n);
        }
    }
    if settings.allow_binary {
        if let Some(n) = strip_radix(raw, "0b").and_then(|d| i64::from_str_radix(d, 2).ok()) {
            return Some(n);
        }
    }
    None
}

/// Unsigned counterpart of [`parse_signed`].
pub fn parse_unsigned(raw: &str, settings: &Settings) -> Option<u64> {
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }
    if settings.allow_hex {
        if let Some(n) = strip_radix(raw, "0x").and_then(|d| u64::from_str_radix(d, 16).ok()) {
            return Some(n);
        }
    }
    if settings.allow_binary {
        if let Some(n) = strip_radix(raw, "0b").and_then(|d| u64::from_str_radix(d, 2).ok()) {
            return Some(n);
        }
    }
    None
}

/// Converts raw tokens into values for a given option.
#[derive(Debug, Clone, Copy)]
pub struct Coercer<'a> {
    settings: &'a Settings,
}

impl<'a> Coercer<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn coerce(&self, option: &OptionSpec, raw: &str) -> Result<Value, ParseError> {
        match option.kind {
            Kind::Bool => Ok(Value::Bool(true)),
            Kind::Str => {
                if let Some(max) = self.settings.max_string_len {
                    if raw.len() > max {
                        return Err(ParseError::StringTooLong {
                            long: option.long.clone(),
                            max,
                        });
                    }
                }
                Ok(Value::Str(raw.to_string()))
            }
            Kind::Int => parse_signed(raw, self.settings)
                .map(Value::Int)
                .ok_or_else(|| invalid_number(option, raw)),
            Kind::UInt => parse_unsigned(raw, self.settings)
                .map(Value::UInt)
                .ok_or_else(|| invalid_number(option, raw)),
        }
    }
}

fn invalid_number(option: &OptionSpec, raw: &str) -> ParseError {
    ParseError::InvalidNumber {
        long: option.long.clone(),
        value: raw.to_string(),
    }
}

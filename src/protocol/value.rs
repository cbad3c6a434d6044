//! Scalar values and their line protocol text.
//!
//! Which characters get a backslash depends on where the text lands in the
//! line, so every encode call names its [`EscapeContext`]. Only strings are
//! ever escaped; the variant is matched before any escaping happens, which
//! keeps a boolean from being formatted as an integer.
//!
//! See: <https://docs.influxdata.com/influxdb/v1.8/write_protocols/line_protocol_tutorial/#special-characters-and-keywords>

use crate::error::{ForwardError, Result};

/// A scalar that can appear as a tag value or a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean, written as bare `true` / `false`.
    Bool(bool),
    /// 64-bit signed integer, written as plain digits.
    Int(i64),
    /// Integer above `i64::MAX`, also written as plain digits.
    UInt(u64),
    /// 64-bit float, written with six fractional digits.
    Float(f64),
    /// UTF-8 text, escaped per context.
    Text(String),
}

/// The position in a line a piece of text is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeContext {
    /// Measurement name at the start of the line.
    Measurement,
    /// Key of a tag pair.
    TagKey,
    /// Value of a tag pair.
    TagValue,
    /// Key of a field pair.
    FieldKey,
    /// Value of a field pair. Strings are also double-quoted here.
    FieldValue,
}

impl EscapeContext {
    /// Characters that must be preceded by a backslash in this context.
    pub fn special_chars(self) -> &'static [char] {
        match self {
            EscapeContext::Measurement => &[',', ' '],
            EscapeContext::TagKey | EscapeContext::TagValue | EscapeContext::FieldKey => {
                &[',', '=', ' ']
            }
            EscapeContext::FieldValue => &['"', '\\'],
        }
    }
}

impl Value {
    /// Render this value for the given context.
    pub fn encode(&self, context: EscapeContext) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => format!("{:.6}", f),
            Value::Text(s) => {
                let escaped = escape(s, context);
                if context == EscapeContext::FieldValue {
                    format!("\"{}\"", escaped)
                } else {
                    escaped
                }
            }
        }
    }

    /// Name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
        }
    }

    /// Whether this is an integer or a float.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::Float(_))
    }
}

/// Backslash-escape the special characters of `context` in `s`.
///
/// Does not add quotes; see [`Value::encode`] for field strings.
pub fn escape(s: &str, context: EscapeContext) -> String {
    let special = context.special_chars();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::UInt(v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = ForwardError;

    /// Accept JSON scalars only. Integers keep their exact digits.
    fn try_from(json: &serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::UInt(u))
                } else {
                    n.as_f64().map(Value::Float).ok_or_else(|| {
                        ForwardError::invalid_value_type(format!("unrepresentable number {}", n))
                    })
                }
            }
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_json::Value::Null => Err(ForwardError::invalid_value_type("null")),
            serde_json::Value::Array(_) => Err(ForwardError::invalid_value_type("array")),
            serde_json::Value::Object(_) => Err(ForwardError::invalid_value_type("object")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bool_is_bare_in_every_context() {
        for ctx in [
            EscapeContext::Measurement,
            EscapeContext::TagKey,
            EscapeContext::TagValue,
            EscapeContext::FieldKey,
            EscapeContext::FieldValue,
        ] {
            assert_eq!(Value::Bool(true).encode(ctx), "true");
            assert_eq!(Value::Bool(false).encode(ctx), "false");
        }
    }

    #[test]
    fn test_float_has_six_fraction_digits() {
        assert_eq!(Value::Float(1.0e-5).encode(EscapeContext::FieldValue), "0.000010");
        assert_eq!(Value::Float(23.5).encode(EscapeContext::FieldValue), "23.500000");
        assert_eq!(Value::Float(-2.0).encode(EscapeContext::TagValue), "-2.000000");
    }

    #[test]
    fn test_integer_has_no_suffix() {
        assert_eq!(Value::Int(82).encode(EscapeContext::FieldValue), "82");
        assert_eq!(Value::Int(-42).encode(EscapeContext::FieldValue), "-42");
    }

    #[test]
    fn test_field_string_is_quoted_and_escaped() {
        let v = Value::from("too\"hot\"");
        assert_eq!(v.encode(EscapeContext::FieldValue), r#""too\"hot\"""#);

        let v = Value::from(r"too hot\cold");
        assert_eq!(v.encode(EscapeContext::FieldValue), r#""too hot\\cold""#);
    }

    #[test]
    fn test_field_string_keeps_commas_and_spaces() {
        let v = Value::from("a, b=c");
        assert_eq!(v.encode(EscapeContext::FieldValue), "\"a, b=c\"");
    }

    #[test]
    fn test_tag_contexts_escape_comma_equals_space() {
        let v = Value::from("a,b=c d");
        assert_eq!(v.encode(EscapeContext::TagKey), r"a\,b\=c\ d");
        assert_eq!(v.encode(EscapeContext::TagValue), r"a\,b\=c\ d");
        assert_eq!(v.encode(EscapeContext::FieldKey), r"a\,b\=c\ d");
    }

    #[test]
    fn test_tag_value_leaves_quotes_and_backslashes() {
        let v = Value::from(r#"say "hi"\"#);
        assert_eq!(v.encode(EscapeContext::TagValue), r#"say\ "hi"\"#);
    }

    #[test]
    fn test_measurement_leaves_equals_alone() {
        assert_eq!(escape("wea,ther", EscapeContext::Measurement), r"wea\,ther");
        assert_eq!(escape("wea ther", EscapeContext::Measurement), r"wea\ ther");
        assert_eq!(escape("a=b", EscapeContext::Measurement), "a=b");
    }

    #[test]
    fn test_try_from_json_scalars() {
        assert_eq!(Value::try_from(&json!(true)).unwrap(), Value::Bool(true));
        assert_eq!(Value::try_from(&json!(7)).unwrap(), Value::Int(7));
        assert_eq!(Value::try_from(&json!(1.5)).unwrap(), Value::Float(1.5));
        assert_eq!(Value::try_from(&json!("x")).unwrap(), Value::from("x"));
    }

    #[test]
    fn test_large_integer_keeps_exact_digits() {
        let v = Value::try_from(&json!(u64::MAX)).unwrap();
        assert_eq!(v, Value::UInt(u64::MAX));
        assert_eq!(v.encode(EscapeContext::FieldValue), "18446744073709551615");
        assert_eq!(v.encode(EscapeContext::TagValue), "18446744073709551615");
        assert!(v.is_numeric());

        assert_eq!(Value::from(7u64), Value::Int(7));
        assert_eq!(Value::from(u64::MAX), Value::UInt(u64::MAX));
    }

    #[test]
    fn test_try_from_json_rejects_non_scalars() {
        for bad in [json!(null), json!([1, 2]), json!({"a": 1})] {
            match Value::try_from(&bad) {
                Err(ForwardError::InvalidValueType(_)) => {}
                other => panic!("expected InvalidValueType, got {:?}", other),
            }
        }
    }
}

//! Numeric sentinel encode/decode: all floats serialize as bare JSON numbers
//! except NaN and ±∞, which serialize as the strings `"nan"`, `"inf"`, `"-inf"`.

use agg_core::errors::{AggError, AggResult};
use serde_json::{Number, Value};

/// Encode an `f64`, spelling non-finite values as their sentinel strings.
pub fn encode_f64(v: f64) -> Value {
    if v.is_nan() {
        Value::String("nan".to_string())
    } else if v == f64::INFINITY {
        Value::String("inf".to_string())
    } else if v == f64::NEG_INFINITY {
        Value::String("-inf".to_string())
    } else {
        Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Decode an `f64` from either a bare JSON number or a sentinel string.
pub fn decode_f64(v: &Value, pointer: &str) -> AggResult<f64> {
    match v {
        Value::Number(n) => n.as_f64().ok_or_else(|| AggError::WireFormat {
            pointer: pointer.to_string(),
            detail: format!("number {n} is not representable as f64"),
        }),
        Value::String(s) => match s.as_str() {
            "nan" => Ok(f64::NAN),
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            other => Err(AggError::WireFormat {
                pointer: pointer.to_string(),
                detail: format!("unrecognized numeric sentinel {other:?}"),
            }),
        },
        other => Err(AggError::WireFormat {
            pointer: pointer.to_string(),
            detail: format!("expected a number or numeric sentinel string, got {other}"),
        }),
    }
}

/// Look up a required field on a JSON object fragment and decode it as `f64`.
pub fn decode_f64_field(v: &Value, field: &str) -> AggResult<f64> {
    let child = v
        .get(field)
        .ok_or_else(|| AggError::WireFormat {
            pointer: format!("/{field}"),
            detail: "missing required field".to_string(),
        })?;
    decode_f64(child, &format!("/{field}"))
}

/// Look up a required string field.
pub fn decode_str_field<'a>(v: &'a Value, field: &str) -> AggResult<&'a str> {
    v.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| AggError::WireFormat {
            pointer: format!("/{field}"),
            detail: "missing required string field".to_string(),
        })
}

/// Look up an optional string field (`"name"`, `"sub:name"`, ...).
pub fn decode_opt_str_field<'a>(v: &'a Value, field: &str) -> Option<&'a str> {
    v.get(field).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_finite() {
        let v = encode_f64(2.5);
        assert_eq!(decode_f64(&v, "/x").unwrap(), 2.5);
    }

    #[test]
    fn round_trips_sentinels() {
        assert!(decode_f64(&encode_f64(f64::NAN), "/x").unwrap().is_nan());
        assert_eq!(decode_f64(&encode_f64(f64::INFINITY), "/x").unwrap(), f64::INFINITY);
        assert_eq!(
            decode_f64(&encode_f64(f64::NEG_INFINITY), "/x").unwrap(),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn encodes_sentinels_as_strings() {
        assert_eq!(encode_f64(f64::NAN), Value::String("nan".into()));
        assert_eq!(encode_f64(f64::INFINITY), Value::String("inf".into()));
        assert_eq!(encode_f64(f64::NEG_INFINITY), Value::String("-inf".into()));
    }
}

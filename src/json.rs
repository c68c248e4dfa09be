//! Conversion between [`Value`] and `serde_json::Value`.

use packet_literal::Value;
use serde_json::{Map, Number, Value as Json};

use crate::error::{PacketError, Result};

/// Convert a value to JSON. Tuples become arrays. Mapping keys must be
/// strings at every depth; bytes, sets, complex numbers and non-finite
/// floats have no JSON form.
pub fn to_json(value: &Value) -> Result<Json> {
    let json = match value {
        Value::None => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number((*i).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| not_serializable(format!("Out of range float value: {f}")))?,
        Value::Str(s) => Json::String(s.clone()),
        Value::List(items) | Value::Tuple(items) => {
            Json::Array(items.iter().map(to_json).collect::<Result<_>>()?)
        }
        Value::Dict(pairs) => {
            let mut map = Map::with_capacity(pairs.len());
            for (key, val) in pairs {
                let Value::Str(key) = key else {
                    return Err(not_serializable(
                        "Only string keys are allowed in packet dicts",
                    ));
                };
                map.insert(key.clone(), to_json(val)?);
            }
            Json::Object(map)
        }
        other @ (Value::Complex { .. } | Value::Bytes(_) | Value::Set(_)) => {
            return Err(not_serializable(format!(
                "Object of type {} is not JSON serializable",
                other.type_name()
            )))
        }
    };
    Ok(json)
}

/// Convert parsed JSON to a value. Integers outside the `i64` range are
/// rejected.
pub fn from_json(json: Json) -> Result<Value> {
    let value = match json {
        Json::Null => Value::None,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => number(&n)?,
        Json::String(s) => Value::Str(s),
        Json::Array(items) => {
            Value::List(items.into_iter().map(from_json).collect::<Result<_>>()?)
        }
        Json::Object(map) => Value::Dict(
            map.into_iter()
                .map(|(key, val)| Ok((Value::Str(key), from_json(val)?)))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(value)
}

fn number(n: &Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    // Numbers keep their source text, so an integer literal is told apart
    // from a float even when it does not fit any native integer.
    let text = n.to_string();
    if !text.contains(|c| matches!(c, '.' | 'e' | 'E')) {
        return Err(PacketError::UnknownPacket(format!(
            "Integer {text} exceeds the supported range"
        )));
    }
    n.as_f64()
        .filter(|f| f.is_finite())
        .map(Value::Float)
        .ok_or_else(|| PacketError::UnknownPacket(format!("Unsupported number {text}")))
}

fn not_serializable(msg: impl Into<String>) -> PacketError {
    PacketError::NotSerializable(msg.into())
}

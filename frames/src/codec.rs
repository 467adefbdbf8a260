//! JSON and protobuf encodings for board events.
//!
//! Text transport carries the JSON form directly. Binary transport wraps the
//! same `event` name and `data` payload in a protobuf envelope so both
//! encodings decode to identical typed events. Protobuf numbers are doubles,
//! so integers come back as floats; every numeric field in the model is `f64`.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use prost::Message;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Error returned by the encode/decode functions.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload is not valid JSON or does not match the event schema.
    #[error("invalid event json: {0}")]
    Json(#[from] serde_json::Error),
    /// The raw bytes could not be decoded as a protobuf `WireEvent`.
    #[error("failed to decode protobuf event: {0}")]
    Decode(#[from] prost::DecodeError),
    /// The serialized event had no string `event` tag.
    #[error("event tag missing")]
    MissingEventTag,
}

/// Which transport encoding a connection speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Json,
    Protobuf,
}

/// Encode an event as JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn encode_text<T: Serialize>(event: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(event)?)
}

/// Decode an event from JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed JSON, unknown events, or
/// payloads that do not match the schema.
pub fn decode_text<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode an event into protobuf bytes.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if the event cannot be serialized, or
/// [`CodecError::MissingEventTag`] if it does not serialize to a tagged object.
pub fn encode_binary<T: Serialize>(event: &T) -> Result<Vec<u8>, CodecError> {
    let Value::Object(mut fields) = serde_json::to_value(event)? else {
        return Err(CodecError::MissingEventTag);
    };
    let Some(Value::String(name)) = fields.remove("event") else {
        return Err(CodecError::MissingEventTag);
    };
    let wire = WireEvent { event: name, data: fields.get("data").map(json_to_proto_value) };

    let mut out = Vec::with_capacity(wire.encoded_len());
    // Encoding into a growable Vec cannot run out of buffer.
    wire.encode(&mut out).unwrap_or_default();
    Ok(out)
}

/// Decode an event from protobuf bytes.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed bytes and [`CodecError::Json`]
/// if the envelope does not describe a known event.
pub fn decode_binary<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    let wire = WireEvent::decode(bytes)?;
    if wire.event.is_empty() {
        return Err(CodecError::MissingEventTag);
    }
    let mut fields = Map::new();
    fields.insert("event".into(), Value::String(wire.event));
    if let Some(data) = &wire.data {
        fields.insert("data".into(), proto_to_json_value(data));
    }
    Ok(serde_json::from_value(Value::Object(fields))?)
}

fn json_to_proto_value(value: &Value) -> prost_types::Value {
    let kind = match value {
        Value::Null => {
            prost_types::value::Kind::NullValue(prost_types::NullValue::NullValue as i32)
        }
        Value::Bool(v) => prost_types::value::Kind::BoolValue(*v),
        Value::Number(v) => prost_types::value::Kind::NumberValue(v.as_f64().unwrap_or(0.0)),
        Value::String(v) => prost_types::value::Kind::StringValue(v.clone()),
        Value::Array(v) => prost_types::value::Kind::ListValue(prost_types::ListValue {
            values: v.iter().map(json_to_proto_value).collect(),
        }),
        Value::Object(v) => prost_types::value::Kind::StructValue(prost_types::Struct {
            fields: v
                .iter()
                .map(|(k, v)| (k.clone(), json_to_proto_value(v)))
                .collect(),
        }),
    };

    prost_types::Value { kind: Some(kind) }
}

fn proto_to_json_value(value: &prost_types::Value) -> Value {
    let Some(kind) = &value.kind else {
        return Value::Null;
    };

    match kind {
        prost_types::value::Kind::NullValue(_) => Value::Null,
        prost_types::value::Kind::NumberValue(v) => {
            serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number)
        }
        prost_types::value::Kind::StringValue(v) => Value::String(v.clone()),
        prost_types::value::Kind::BoolValue(v) => Value::Bool(*v),
        prost_types::value::Kind::StructValue(v) => Value::Object(
            v.fields
                .iter()
                .map(|(k, v)| (k.clone(), proto_to_json_value(v)))
                .collect(),
        ),
        prost_types::value::Kind::ListValue(v) => {
            Value::Array(v.values.iter().map(proto_to_json_value).collect())
        }
    }
}

#[derive(Clone, PartialEq, Message)]
struct WireEvent {
    #[prost(string, tag = "1")]
    event: String,
    #[prost(message, optional, tag = "2")]
    data: Option<prost_types::Value>,
}

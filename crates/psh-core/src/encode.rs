//! Variable encoding.
//!
//! Structured values travel through a single environment variable as
//! base64 of their JSON text. Strings are encoded as their raw text, not as
//! a quoted JSON string.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Encode a value for transport in an environment variable.
///
/// Fails with [`Error::EncodingFailure`] when the value does not serialize
/// to JSON, or serializes to `null` (which is also what non-finite floats
/// become).
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).map_err(|e| Error::EncodingFailure {
        message: e.to_string(),
    })?;
    let text = match value {
        Value::String(text) => text,
        Value::Null => {
            return Err(Error::EncodingFailure {
                message: "value has no textual form (null or non-finite number)".to_string(),
            });
        }
        other => serde_json::to_string(&other).map_err(|e| Error::EncodingFailure {
            message: e.to_string(),
        })?,
    };
    Ok(STANDARD.encode(text.as_bytes()))
}

/// Decode a payload back to its raw text.
pub fn decode_text(payload: &str) -> Result<String> {
    let bytes = STANDARD.decode(payload).map_err(|e| Error::Decode {
        message: format!("invalid base64: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| Error::Decode {
        message: format!("invalid UTF-8: {e}"),
    })
}

/// Decode a payload carrying JSON text into `T`.
pub fn decode<T: DeserializeOwned>(payload: &str) -> Result<T> {
    let text = decode_text(payload)?;
    serde_json::from_str(&text).map_err(|e| Error::Decode {
        message: format!("invalid JSON: {e}"),
    })
}

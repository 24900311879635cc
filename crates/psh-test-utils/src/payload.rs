//! Decoding helpers for base64-encoded `PLATFORM_*` payloads.
//!
//! Kept independent of `psh-core` so the core crate can use these fixtures
//! in its own tests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

/// Decode a base64 JSON payload.
///
/// # Panics
/// Panics if the payload is not base64-encoded JSON.
pub fn decode_json(payload: &str) -> Value {
    let bytes = STANDARD
        .decode(payload)
        .unwrap_or_else(|e| panic!("decode_json: invalid base64 payload: {e}"));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("decode_json: payload is not JSON: {e}"))
}

/// Decode the `PLATFORM_*` variable `key` of the first application in a
/// serialized run config.
///
/// # Panics
/// Panics if the run config has no applications or the variable is missing.
pub fn decode_app_variable(run_config: &Value, key: &str) -> Value {
    let payload = run_config["applications"][0]["configuration"]["variables"]["env"][key]
        .as_str()
        .unwrap_or_else(|| panic!("decode_app_variable: `{key}` missing from run config"));
    decode_json(payload)
}

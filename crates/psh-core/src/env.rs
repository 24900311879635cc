//! Flattening of declared `variables.env` into environment variable text.

use psh_meta::Variables;
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Turn `variables.env` into name → text pairs.
///
/// Names are kept verbatim. Strings pass through, numbers and booleans use
/// their literal form (integral floats without a fractional part), lists and
/// mappings become JSON text. `null` entries
/// are dropped.
pub fn derive_env(variables: &Variables) -> BTreeMap<String, String> {
    variables
        .env
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => {
                    tracing::trace!(key = %key, "Skipping null env variable");
                    return None;
                }
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => number_text(n),
                structured => structured.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

/// Largest float that converts to an integer without loss
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// `1.0` prints as `1`, matching how the host tool prints numbers.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

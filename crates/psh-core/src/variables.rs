//! `PLATFORM_VARIABLES` payload.
//!
//! Non-`env` variables are flattened one level: a group `d8settings` with
//! key `hash_salt` becomes `d8settings:hash_salt`. Scalars keep their name.
//! A fixed set of local storage overrides is applied last, so they hold no
//! matter what the project declares.

use psh_meta::{VariableValue, Variables};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::encode::encode;
use crate::error::Result;

/// Temporary directory used inside local containers
pub const LOCAL_TEMP_PATH: &str = "/tmp";
/// Private file directory used inside local containers
pub const LOCAL_PRIVATE_PATH: &str = "/tmp";

pub const TEMP_PATH_KEY: &str = "d8config:system.file:path:temporary";
pub const PRIVATE_PATH_KEY: &str = "d8settings:file_private_path";
pub const PHP_STORAGE_DEFAULT_KEY: &str = "d8settings:php_storage:default:directory";
pub const PHP_STORAGE_TWIG_KEY: &str = "d8settings:php_storage:twig:directory";

/// Flatten the non-`env` variables into `group:key` entries.
pub fn flatten_variables(variables: &Variables) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    for (key, value) in &variables.groups {
        match value {
            VariableValue::Group(entries) => {
                for (inner, value) in entries {
                    flat.insert(format!("{key}:{inner}"), value.clone());
                }
            }
            VariableValue::Scalar(value) => {
                flat.insert(key.clone(), value.clone());
            }
        }
    }
    flat
}

/// Force the local temp and private storage paths.
pub fn apply_local_overrides(flat: &mut BTreeMap<String, Value>) {
    flat.insert(TEMP_PATH_KEY.to_string(), Value::from(LOCAL_TEMP_PATH));
    // php_storage directories follow the private path
    let private = Value::from(LOCAL_PRIVATE_PATH);
    flat.insert(PRIVATE_PATH_KEY.to_string(), private.clone());
    flat.insert(PHP_STORAGE_DEFAULT_KEY.to_string(), private.clone());
    flat.insert(PHP_STORAGE_TWIG_KEY.to_string(), private);
}

/// Build the encoded `PLATFORM_VARIABLES` value.
pub fn derive_platform_variables(variables: &Variables) -> Result<String> {
    let mut flat = flatten_variables(variables);
    apply_local_overrides(&mut flat);
    encode(&flat)
}

//! Declared application variables.
//!
//! An application's `variables` block mixes two kinds of entries:
//!
//! ```yaml
//! variables:
//!   env:
//!     APP_DEBUG: 1
//!   d8settings:
//!     hash_salt: abc
//!   feature_flag: on
//! ```
//!
//! `env` holds plain environment variables. Every other top-level key is
//! either a group of namespaced values (`d8settings`) or a lone scalar
//! (`feature_flag`). Groups are modelled as [`VariableValue::Group`] so
//! consumers can match on them instead of probing JSON types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A non-`env` entry of the `variables` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    /// A namespace of values, flattened as `group:key`.
    Group(BTreeMap<String, Value>),
    /// Any value that is not a mapping (string, number, bool, list, null).
    Scalar(Value),
}

impl VariableValue {
    pub fn is_group(&self) -> bool {
        matches!(self, VariableValue::Group(_))
    }
}

/// The `variables` block of an application definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Variables {
    /// Environment variables, keyed by their exact name.
    #[serde(
        default,
        deserialize_with = "crate::nullable::null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub env: BTreeMap<String, Value>,

    /// All remaining entries, keyed by group or variable name.
    #[serde(flatten)]
    pub groups: BTreeMap<String, VariableValue>,
}

impl Variables {
    pub fn is_empty(&self) -> bool {
        self.env.is_empty() && self.groups.is_empty()
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_group<K, I, V>(mut self, group: impl Into<String>, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.groups
            .insert(group.into(), VariableValue::Group(entries));
        self
    }

    pub fn with_scalar(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.groups
            .insert(key.into(), VariableValue::Scalar(value.into()));
        self
    }

    /// Overlay `other` onto a copy of `self`.
    ///
    /// `env` entries are replaced per key. Groups present on both sides are
    /// merged per inner key; anything else is replaced.
    pub fn overlaid(&self, other: &Variables) -> Variables {
        let mut merged = self.clone();
        for (key, value) in &other.env {
            merged.env.insert(key.clone(), value.clone());
        }
        for (key, value) in &other.groups {
            match (merged.groups.get_mut(key), value) {
                (Some(VariableValue::Group(base)), VariableValue::Group(over)) => {
                    for (inner, v) in over {
                        base.insert(inner.clone(), v.clone());
                    }
                }
                _ => {
                    merged.groups.insert(key.clone(), value.clone());
                }
            }
        }
        merged
    }
}

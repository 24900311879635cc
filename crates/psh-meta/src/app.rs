//! Application definitions as declared in the project descriptor.
//!
//! Every field except `name` is optional. Missing fields are filled from
//! [`ApplicationDefaults`](crate::ApplicationDefaults) when the application
//! configuration is built. Keys this model does not know about are kept in
//! `extra` and carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::variables::Variables;

/// Build and deploy hooks. `None` means "no hook".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hooks {
    #[serde(default, rename = "_deploy")]
    pub deploy: Option<String>,
    #[serde(default)]
    pub build: Option<String>,
    #[serde(default)]
    pub post_deploy: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single `web.locations` entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WebLocation {
    /// Document root relative to the application directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fully resolved `web` section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default)]
    pub move_to_root: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locations: BTreeMap<String, WebLocation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `web` section as declared by an application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WebDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_to_root: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locations: BTreeMap<String, WebLocation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fully resolved preflight policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preflight {
    pub enabled: bool,
    #[serde(default)]
    pub ignored_rules: Vec<String>,
}

impl Default for Preflight {
    fn default() -> Self {
        Self {
            enabled: true,
            ignored_rules: Vec::new(),
        }
    }
}

/// Preflight policy as declared by an application.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreflightDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_rules: Option<Vec<String>>,
}

/// One application of the project, as declared.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppDefinition {
    /// Application name, unique within the project
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<Hooks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Disk size in MB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_production: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preflight: Option<PreflightDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::nullable::null_as_default",
        skip_serializing_if = "Variables::is_empty"
    )]
    pub variables: Variables,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mounts: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crons: Option<Map<String, Value>>,
    /// Keys not modelled above (`type`, `relationships`, `build`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Root of the `/` web location, if one is declared.
    pub fn document_root(&self) -> Option<&str> {
        self.web
            .as_ref()?
            .locations
            .get("/")?
            .root
            .as_deref()
    }
}

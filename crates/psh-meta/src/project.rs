//! Project descriptor parsing and identity validation.
//!
//! A descriptor looks like:
//!
//! ```yaml
//! id: proj1
//! name: main
//! configPath: /home/me/.lando/config/main
//! platformsh:
//!   config:
//!     applications:
//!       - name: app1
//!         web:
//!           locations:
//!             "/":
//!               root: web
//!   applications:
//!     - name: app1
//!   services:
//!     - name: db
//!       hostname: db.local
//!   routes:
//!     "https://{default}/":
//!       type: upstream
//!       upstream: "app1:http"
//! ```
//!
//! `platformsh.config.applications` carries the full application definitions;
//! `platformsh.applications` and `platformsh.services` are the service
//! instances a run config is emitted for.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::app::AppDefinition;
use crate::error::{Error, Result};
use crate::nullable::null_as_default;

/// A service instance: either an application container or a backing service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Disk size in MB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    /// Per-service override merged onto the generated service configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn is_application(&self) -> bool {
        self.application.unwrap_or(false)
    }
}

/// `platformsh.config`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatformshConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub applications: Vec<AppDefinition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `platformsh`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatformshProject {
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: PlatformshConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub applications: Vec<ServiceDefinition>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<ServiceDefinition>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub routes: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The multi-application project the run configs are synthesized from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    /// Project id, used for slugs and `PLATFORM_PROJECT`
    pub id: String,
    /// Project name, used for domain names and the environment machine name
    pub name: String,
    /// Directory the run config files are named under
    #[serde(
        default,
        alias = "configPath",
        skip_serializing_if = "path_is_empty"
    )]
    pub config_path: PathBuf,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platformsh: PlatformshProject,
}

fn path_is_empty(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

impl ProjectDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a descriptor from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Parse a descriptor from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content)?;
        Self::from_value(value)
    }

    /// Check identity fields on an untyped descriptor, then deserialize it.
    ///
    /// Shape problems in identity fields are reported as
    /// [`Error::MalformedDescriptor`] naming the offending field, rather than
    /// as a generic deserialization error.
    pub fn from_value(value: Value) -> Result<Self> {
        let Some(root) = value.as_object() else {
            return Err(Error::malformed("<root>", "must be a mapping"));
        };
        require_string(root, "id", "id")?;
        require_string(root, "name", "name")?;

        if let Some(platformsh) = root.get("platformsh").and_then(Value::as_object) {
            if let Some(config) = platformsh.get("config").and_then(Value::as_object) {
                require_names(config, "applications", "platformsh.config.applications")?;
            }
            require_names(platformsh, "applications", "platformsh.applications")?;
            require_names(platformsh, "services", "platformsh.services")?;
        }

        let project: ProjectDescriptor = serde_json::from_value(value)?;
        project.validate()?;
        Ok(project)
    }

    /// Reject empty identity fields.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::malformed("id", "must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::malformed("name", "must not be empty"));
        }
        for (i, app) in self.platformsh.config.applications.iter().enumerate() {
            if app.name.trim().is_empty() {
                return Err(Error::malformed(
                    format!("platformsh.config.applications[{i}].name"),
                    "must not be empty",
                ));
            }
        }
        let sections = [
            ("platformsh.applications", &self.platformsh.applications),
            ("platformsh.services", &self.platformsh.services),
        ];
        for (section, instances) in sections {
            for (i, service) in instances.iter().enumerate() {
                if service.name.trim().is_empty() {
                    return Err(Error::malformed(
                        format!("{section}[{i}].name"),
                        "must not be empty",
                    ));
                }
            }
        }
        Ok(())
    }

    /// All service instances, applications first.
    pub fn service_instances(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.platformsh
            .applications
            .iter()
            .chain(self.platformsh.services.iter())
    }
}

fn require_string(map: &Map<String, Value>, key: &str, field: &str) -> Result<()> {
    match map.get(key) {
        Some(Value::String(_)) => Ok(()),
        Some(other) => Err(Error::malformed(
            field,
            format!("must be a string, got {}", json_kind(other)),
        )),
        None => Err(Error::malformed(field, "is missing")),
    }
}

fn require_names(map: &Map<String, Value>, key: &str, field: &str) -> Result<()> {
    let Some(entries) = map.get(key).and_then(Value::as_array) else {
        return Ok(());
    };
    for (i, entry) in entries.iter().enumerate() {
        let Some(entry) = entry.as_object() else {
            return Err(Error::malformed(format!("{field}[{i}]"), "must be a mapping"));
        };
        require_string(entry, "name", &format!("{field}[{i}].name"))?;
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

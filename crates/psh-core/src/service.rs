//! Project- and environment-wide service configuration.
//!
//! Every local environment is treated as the main, non-production
//! environment of its project.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys of the service configuration the emulator keeps fixed, as paths.
pub const IDENTITY_KEYS: &[&[&str]] = &[
    &["project_info", "name"],
    &["environment_info", "name"],
    &["environment_info", "machine_name"],
    &["environment_info", "is_production"],
    &["environment_info", "is_main"],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    pub variables_prefix: String,
    pub crons_in_git: bool,
    pub product_code: String,
    pub product_name: String,
    pub enforce_mfa: bool,
    pub bot_email: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            variables_prefix: "PLATFORM_".to_string(),
            crons_in_git: false,
            product_code: "platformsh".to_string(),
            product_name: "Platform.sh".to_string(),
            enforce_mfa: false,
            bot_email: "bot@platform.sh".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub settings: ProjectSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub is_production: bool,
    pub machine_name: String,
    pub name: String,
    pub is_main: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub access: Map<String, Value>,
    pub project_info: ProjectInfo,
    pub environment_info: EnvironmentInfo,
}

/// Service configuration for project `id` running as environment `name`.
pub fn build_service_config(id: &str, name: &str) -> ServiceConfig {
    ServiceConfig {
        access: Map::new(),
        project_info: ProjectInfo {
            name: id.to_string(),
            settings: ProjectSettings::default(),
        },
        environment_info: EnvironmentInfo {
            is_production: false,
            machine_name: name.to_string(),
            name: id.to_string(),
            is_main: true,
        },
    }
}

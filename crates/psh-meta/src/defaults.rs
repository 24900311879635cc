//! Baseline application configuration.
//!
//! Values here apply to every application field the project leaves
//! unspecified. The baseline is built once and only ever handed out by
//! shared reference; builders merge onto their own copies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::app::{Hooks, Preflight, WebConfig};
use crate::variables::Variables;

/// Default application directory inside the container
pub const DEFAULT_APP_DIR: &str = "/app";

/// Default disk size in MB
pub const DEFAULT_DISK: u64 = 2048;

static DEFAULTS: LazyLock<ApplicationDefaults> = LazyLock::new(ApplicationDefaults::baseline);

/// The fixed default shape of an application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDefaults {
    pub app_dir: String,
    pub hooks: Hooks,
    pub timezone: Option<String>,
    pub disk: u64,
    pub web: WebConfig,
    pub is_production: bool,
    pub access: Map<String, Value>,
    pub preflight: Preflight,
    pub resources: Option<Value>,
    pub runtime: Map<String, Value>,
    pub size: String,
    pub variables: Variables,
}

impl ApplicationDefaults {
    /// Shared, process-wide baseline.
    pub fn shared() -> &'static ApplicationDefaults {
        &DEFAULTS
    }

    fn baseline() -> Self {
        Self {
            app_dir: DEFAULT_APP_DIR.to_string(),
            hooks: Hooks::default(),
            timezone: None,
            disk: DEFAULT_DISK,
            web: WebConfig::default(),
            is_production: false,
            access: Map::new(),
            preflight: Preflight::default(),
            resources: None,
            runtime: Map::new(),
            size: "AUTO".to_string(),
            variables: Variables::default(),
        }
    }
}

impl Default for ApplicationDefaults {
    fn default() -> Self {
        Self::shared().clone()
    }
}

//! Application configuration builder.
//!
//! Builds the per-application entry of a run config. Precedence, lowest to
//! highest:
//!
//! 1. [`ApplicationDefaults`]
//! 2. the application's own definition
//! 3. computed values (`slug`, `tree_id`, injected `PLATFORM_*` variables)
//!
//! Typed sections merge field by field. Free-form sections deep merge.

use psh_meta::{
    AppDefinition, ApplicationDefaults, Hooks, Preflight, PreflightDefinition, ProjectDescriptor,
    VariableValue, Variables, WebConfig, WebDefinition,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::encode::encode;
use crate::env::derive_env;
use crate::error::Result;
use crate::merge::{merge_maps, merged_map, merged_optional};
use crate::variables::derive_platform_variables;

pub const PLATFORM_DOCUMENT_ROOT: &str = "PLATFORM_DOCUMENT_ROOT";
pub const PLATFORM_APPLICATION: &str = "PLATFORM_APPLICATION";
pub const PLATFORM_ENVIRONMENT: &str = "PLATFORM_ENVIRONMENT";
pub const PLATFORM_APPLICATION_NAME: &str = "PLATFORM_APPLICATION_NAME";
pub const PLATFORM_PROJECT: &str = "PLATFORM_PROJECT";
pub const PLATFORM_DIR: &str = "PLATFORM_DIR";
pub const PLATFORM_PROJECT_ENTROPY: &str = "PLATFORM_PROJECT_ENTROPY";
pub const PLATFORM_BRANCH: &str = "PLATFORM_BRANCH";
pub const PLATFORM_TREE_ID: &str = "PLATFORM_TREE_ID";
pub const PLATFORM_ROUTES: &str = "PLATFORM_ROUTES";
pub const PLATFORM_VARIABLES: &str = "PLATFORM_VARIABLES";

/// Application directory inside the container
pub const APP_ROOT: &str = "/app";

/// Keys computed for every application. Declared values are dropped.
const COMPUTED_KEYS: [&str; 2] = ["slug", "tree_id"];

// Static placeholders; branches and entropy are not tracked locally.
const ENVIRONMENT_NAME: &str = "lando";
const PROJECT_ENTROPY: &str = "heatdeath";
const BRANCH: &str = "master";

/// Resolved variables: `env` is final environment text, groups are kept as declared.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedVariables {
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(flatten)]
    pub groups: BTreeMap<String, VariableValue>,
}

/// An application's configuration after defaults and computed values are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub name: String,
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
    pub variables: ResolvedVariables,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mounts: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crons: Option<Map<String, Value>>,
    pub slug: String,
    pub tree_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApplicationConfig {
    /// `PLATFORM_DOCUMENT_ROOT` for this application.
    pub fn document_root(&self) -> String {
        match self.web.locations.get("/").and_then(|l| l.root.as_deref()) {
            Some(root) => format!("{APP_ROOT}/{root}"),
            None => APP_ROOT.to_string(),
        }
    }
}

/// One element of a run config's `applications` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationEntry {
    pub configuration: ApplicationConfig,
    pub crons: Map<String, Value>,
    pub cron_minimum_interval: String,
    pub enable_smtp: String,
    pub mounts: Map<String, Value>,
    pub slug: String,
}

/// `{id}-{name}`, shared by `slug`, `tree_id` and `PLATFORM_TREE_ID`.
pub fn app_slug(project_id: &str, app_name: &str) -> String {
    format!("{project_id}-{app_name}")
}

/// Build one application entry against the shared defaults.
pub fn build_app_config(app: &AppDefinition, project: &ProjectDescriptor) -> Result<ApplicationEntry> {
    build_app_config_with(ApplicationDefaults::shared(), app, project)
}

/// Build one application entry against explicit defaults.
pub fn build_app_config_with(
    defaults: &ApplicationDefaults,
    app: &AppDefinition,
    project: &ProjectDescriptor,
) -> Result<ApplicationEntry> {
    let slug = app_slug(&project.id, &app.name);
    let declared = defaults.variables.overlaid(&app.variables);
    let mut configuration = merge_definition(defaults, app, &slug);

    let mut env = derive_env(&declared);
    env.extend(platform_variables(&configuration, project, &declared)?);
    configuration.variables = ResolvedVariables {
        env,
        groups: declared.groups,
    };

    tracing::debug!(app = %app.name, slug = %slug, "Built application config");

    Ok(ApplicationEntry {
        crons: app.crons.clone().unwrap_or_default(),
        cron_minimum_interval: "1".to_string(),
        enable_smtp: "false".to_string(),
        mounts: app.mounts.clone().unwrap_or_default(),
        slug,
        configuration,
    })
}

/// Build every application declared in `platformsh.config.applications`.
pub fn build_applications(project: &ProjectDescriptor) -> Result<Vec<ApplicationEntry>> {
    project
        .platformsh
        .config
        .applications
        .iter()
        .map(|app| build_app_config(app, project))
        .collect()
}

fn merge_definition(defaults: &ApplicationDefaults, app: &AppDefinition, slug: &str) -> ApplicationConfig {
    let mut extra = app.extra.clone();
    for key in COMPUTED_KEYS {
        if extra.remove(key).is_some() {
            tracing::debug!(app = %app.name, key, "Ignoring declared computed key");
        }
    }

    ApplicationConfig {
        name: app.name.clone(),
        app_dir: app.app_dir.clone().unwrap_or_else(|| defaults.app_dir.clone()),
        hooks: merge_hooks(&defaults.hooks, app.hooks.as_ref()),
        timezone: app.timezone.clone().or_else(|| defaults.timezone.clone()),
        disk: app.disk.unwrap_or(defaults.disk),
        web: merge_web(&defaults.web, app.web.as_ref()),
        is_production: app.is_production.unwrap_or(defaults.is_production),
        access: merged_map(&defaults.access, app.access.as_ref()),
        preflight: merge_preflight(&defaults.preflight, app.preflight.as_ref()),
        resources: merged_optional(defaults.resources.as_ref(), app.resources.as_ref()),
        runtime: merged_map(&defaults.runtime, app.runtime.as_ref()),
        size: app.size.clone().unwrap_or_else(|| defaults.size.clone()),
        variables: ResolvedVariables::default(),
        mounts: app.mounts.clone(),
        crons: app.crons.clone(),
        slug: slug.to_string(),
        tree_id: slug.to_string(),
        extra,
    }
}

fn merge_hooks(base: &Hooks, over: Option<&Hooks>) -> Hooks {
    let Some(over) = over else {
        return base.clone();
    };
    Hooks {
        deploy: over.deploy.clone().or_else(|| base.deploy.clone()),
        build: over.build.clone().or_else(|| base.build.clone()),
        post_deploy: over.post_deploy.clone().or_else(|| base.post_deploy.clone()),
        extra: merged_map(&base.extra, Some(&over.extra)),
    }
}

fn merge_web(base: &WebConfig, over: Option<&WebDefinition>) -> WebConfig {
    let mut web = base.clone();
    let Some(over) = over else {
        return web;
    };
    if let Some(move_to_root) = over.move_to_root {
        web.move_to_root = move_to_root;
    }
    for (path, location) in &over.locations {
        match web.locations.get_mut(path) {
            Some(existing) => {
                if location.root.is_some() {
                    existing.root = location.root.clone();
                }
                merge_maps(&mut existing.extra, &location.extra);
            }
            None => {
                web.locations.insert(path.clone(), location.clone());
            }
        }
    }
    merge_maps(&mut web.extra, &over.extra);
    web
}

fn merge_preflight(base: &Preflight, over: Option<&PreflightDefinition>) -> Preflight {
    let Some(over) = over else {
        return base.clone();
    };
    Preflight {
        enabled: over.enabled.unwrap_or(base.enabled),
        ignored_rules: over
            .ignored_rules
            .clone()
            .unwrap_or_else(|| base.ignored_rules.clone()),
    }
}

/// The injected `PLATFORM_*` variables. These win over user `env` entries.
fn platform_variables(
    configuration: &ApplicationConfig,
    project: &ProjectDescriptor,
    declared: &Variables,
) -> Result<BTreeMap<String, String>> {
    let vars = [
        (PLATFORM_DOCUMENT_ROOT, configuration.document_root()),
        (PLATFORM_APPLICATION, encode(project)?),
        (PLATFORM_ENVIRONMENT, ENVIRONMENT_NAME.to_string()),
        (PLATFORM_APPLICATION_NAME, configuration.name.clone()),
        (PLATFORM_PROJECT, project.id.clone()),
        (PLATFORM_DIR, APP_ROOT.to_string()),
        (PLATFORM_PROJECT_ENTROPY, PROJECT_ENTROPY.to_string()),
        (PLATFORM_BRANCH, BRANCH.to_string()),
        (PLATFORM_TREE_ID, configuration.tree_id.clone()),
        (PLATFORM_ROUTES, encode(&project.platformsh.routes)?),
        (PLATFORM_VARIABLES, derive_platform_variables(declared)?),
    ];
    Ok(vars
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect())
}

//! Run config emission.
//!
//! Produces one [`RunConfigFile`] per service instance: every entry of
//! `platformsh.applications` first, then every entry of
//! `platformsh.services`, each in declared order. Writing the files is left
//! to the caller.

use psh_meta::{LandoContext, ProjectDescriptor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::application::build_applications;
use crate::error::Result;
use crate::platform::{PlatformConfig, assemble};

/// A run config ready to be written to `file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfigFile {
    pub service: String,
    pub application: bool,
    pub file: PathBuf,
    pub data: PlatformConfig,
}

impl RunConfigFile {
    /// The file contents: `data` as pretty-printed JSON.
    pub fn contents(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }
}

/// `{config_path}/{service}.json`
pub fn run_config_path(config_path: &Path, service_name: &str) -> PathBuf {
    config_path.join(format!("{service_name}.json"))
}

/// Build the run configs of every service instance in the project.
pub fn build_run_configs(project: &ProjectDescriptor, context: &LandoContext) -> Result<Vec<RunConfigFile>> {
    project.validate()?;
    let applications = build_applications(project)?;

    let instances = project
        .platformsh
        .applications
        .iter()
        .map(|app| (app, true))
        .chain(
            project
                .platformsh
                .services
                .iter()
                .map(|service| (service, service.is_application())),
        );

    let mut files = Vec::new();
    for (service, application) in instances {
        let data = assemble(project, service, context, applications.clone())?;
        let file = run_config_path(&project.config_path, &service.name);
        tracing::debug!(service = %service.name, application, file = ?file, "Built run config");
        files.push(RunConfigFile {
            service: service.name.clone(),
            application,
            file,
            data,
        });
    }

    tracing::info!(project = %project.id, count = files.len(), "Synthesized run configs");
    Ok(files)
}

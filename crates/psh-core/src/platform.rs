//! Per-service platform config assembly.

use psh_meta::{LandoContext, OverridePolicy, ProjectDescriptor, ServiceDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::{ApplicationEntry, build_applications};
use crate::error::{Error, Result};
use crate::merge::merge_maps;
use crate::service::{IDENTITY_KEYS, build_service_config};

pub const PRIMARY_IP: &str = "127.0.0.1";
pub const NAMESERVER: &str = "127.0.0.11";
pub const LOG_FILE: &str = "/dev/stderr";
pub const CLUSTER: &str = "bespin";
pub const REGION: &str = "lando";
pub const DOMAIN_SUFFIX: &str = "service._.lndo.site";

/// Disk limit when a service does not declare one, in MB
pub const DEFAULT_DISK_LIMIT: u64 = 2048;
/// Static memory ceiling, in MB
pub const MEMORY_LIMIT: u64 = 2048;
/// Static CPU ceiling, in cores
pub const CPU_LIMIT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub disk: u64,
    pub memory: u64,
    pub cpu: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub mail_relay_host: Option<String>,
    pub mail_relay_host_v2: Option<String>,
    pub limits: ResourceLimits,
    #[serde(rename = "external ip")]
    pub external_ip: Option<String>,
}

/// The run config of one service instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub primary_ip: String,
    pub features: Vec<String>,
    pub domainname: String,
    pub host_ip: Option<String>,
    pub applications: Vec<ApplicationEntry>,
    pub configuration: Map<String, Value>,
    pub info: ServiceInfo,
    pub log_file: String,
    pub log_gid: u32,
    pub log_uid: u32,
    pub name: String,
    pub service: String,
    pub cluster: String,
    pub region: String,
    pub hostname: Option<String>,
    pub instance: String,
    pub nameserver: String,
    pub web_gid: u32,
    pub web_uid: u32,
}

/// `{project}.{service}.service._.lndo.site`
pub fn domain_name(project_name: &str, service_name: &str) -> String {
    format!("{project_name}.{service_name}.{DOMAIN_SUFFIX}")
}

/// Assemble the platform config for one service instance.
pub fn build_platform_config(
    project: &ProjectDescriptor,
    service: &ServiceDefinition,
    context: &LandoContext,
) -> Result<PlatformConfig> {
    let applications = build_applications(project)?;
    assemble(project, service, context, applications)
}

/// Assemble with an already built applications list.
pub(crate) fn assemble(
    project: &ProjectDescriptor,
    service: &ServiceDefinition,
    context: &LandoContext,
    applications: Vec<ApplicationEntry>,
) -> Result<PlatformConfig> {
    let host_ip = context.host_ip().map(str::to_string);
    let configuration = service_configuration(project, service, context.override_policy)?;

    Ok(PlatformConfig {
        primary_ip: PRIMARY_IP.to_string(),
        features: Vec::new(),
        domainname: domain_name(&project.name, &service.name),
        host_ip: host_ip.clone(),
        applications,
        configuration,
        info: ServiceInfo {
            mail_relay_host: None,
            mail_relay_host_v2: None,
            limits: ResourceLimits {
                disk: service.disk.unwrap_or(DEFAULT_DISK_LIMIT),
                memory: MEMORY_LIMIT,
                cpu: CPU_LIMIT,
            },
            external_ip: host_ip,
        },
        log_file: LOG_FILE.to_string(),
        log_gid: context.gid,
        log_uid: context.uid,
        name: project.name.clone(),
        service: service.name.clone(),
        cluster: CLUSTER.to_string(),
        region: REGION.to_string(),
        hostname: service.hostname.clone(),
        instance: context.instance.clone(),
        nameserver: NAMESERVER.to_string(),
        web_gid: context.gid,
        web_uid: context.uid,
    })
}

/// Service configuration with the service's own override merged over it.
fn service_configuration(
    project: &ProjectDescriptor,
    service: &ServiceDefinition,
    policy: OverridePolicy,
) -> Result<Map<String, Value>> {
    let mut merged = serde_json::to_value(build_service_config(&project.id, &project.name))?
        .as_object()
        .cloned()
        .unwrap_or_default();
    let Some(overrides) = &service.configuration else {
        return Ok(merged);
    };

    let base = merged.clone();
    merge_maps(&mut merged, overrides);

    for path in IDENTITY_KEYS {
        let before = lookup(&base, path);
        let after = lookup(&merged, path);
        if before == after {
            continue;
        }
        let key = path.join(".");
        match policy {
            OverridePolicy::Warn => {
                tracing::warn!(
                    service = %service.name,
                    key = %key,
                    "Service override redefines a fixed identity key"
                );
            }
            OverridePolicy::Reject => {
                return Err(Error::ConflictingOverride {
                    service: service.name.clone(),
                    key,
                });
            }
        }
    }
    Ok(merged)
}

fn lookup<'a>(map: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter().try_fold(map.get(*first)?, |node, key| node.get(*key))
}

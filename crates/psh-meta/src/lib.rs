//! Project model and host context for the platform runtime emulator.
//!
//! This crate holds everything the synthesis pipeline reads: the project
//! descriptor with its application and service definitions, the immutable
//! application defaults, and the host context (IP, uid/gid, instance).

pub mod app;
pub mod context;
pub mod defaults;
pub mod error;
mod nullable;
pub mod project;
pub mod variables;

pub use app::{AppDefinition, Hooks, Preflight, PreflightDefinition, WebConfig, WebDefinition, WebLocation};
pub use context::{LandoContext, OverridePolicy};
pub use defaults::ApplicationDefaults;
pub use error::{Error, Result};
pub use project::{PlatformshConfig, PlatformshProject, ProjectDescriptor, ServiceDefinition};
pub use variables::{VariableValue, Variables};

//! Run config synthesis for the platform runtime emulator
//!
//! Given a [`ProjectDescriptor`](psh_meta::ProjectDescriptor) and a
//! [`LandoContext`](psh_meta::LandoContext), this crate produces one JSON
//! run config per service instance, carrying the `PLATFORM_*` variables
//! application code expects at runtime.
//!
//! # Pipeline
//!
//! ```text
//!   build_run_configs            run_config
//!          |
//!   build_platform_config        platform
//!      |            |
//!  build_app_config  build_service_config
//!      |
//!  derive_env, derive_platform_variables, encode
//! ```
//!
//! Every stage is a pure function of its inputs.
//!
//! # Example
//!
//! ```
//! use psh_core::build_run_configs;
//! use psh_meta::{LandoContext, ProjectDescriptor};
//!
//! let project = ProjectDescriptor::from_yaml(r#"
//! id: proj1
//! name: main
//! platformsh:
//!   config:
//!     applications:
//!       - name: app1
//!   applications:
//!     - name: app1
//!   services:
//!     - name: db
//!       hostname: db.local
//! "#).unwrap();
//!
//! let files = build_run_configs(&project, &LandoContext::default()).unwrap();
//! assert_eq!(files.len(), 2);
//! assert_eq!(files[0].data.applications[0].slug, "proj1-app1");
//! ```

pub mod application;
pub mod encode;
pub mod env;
pub mod error;
pub mod logging;
pub mod merge;
pub mod platform;
pub mod run_config;
pub mod service;
pub mod variables;

pub use application::{
    ApplicationConfig, ApplicationEntry, ResolvedVariables, app_slug, build_app_config,
    build_app_config_with, build_applications,
};
pub use encode::{decode, decode_text, encode};
pub use env::derive_env;
pub use error::{Error, Result};
pub use platform::{PlatformConfig, ResourceLimits, ServiceInfo, build_platform_config};
pub use run_config::{RunConfigFile, build_run_configs, run_config_path};
pub use service::{ServiceConfig, build_service_config};
pub use variables::{derive_platform_variables, flatten_variables};

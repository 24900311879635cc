//! [`TestProject`] builder for synthesis test scenarios.

use psh_meta::{AppDefinition, ProjectDescriptor, ServiceDefinition};
use serde_json::Value;
use std::path::PathBuf;

/// Builder for [`ProjectDescriptor`] fixtures.
///
/// # Example
///
/// ```rust
/// use psh_test_utils::project::TestProject;
///
/// let project = TestProject::new("proj1", "main")
///     .with_app_named("app1")
///     .with_service_named("db")
///     .build();
///
/// assert_eq!(project.platformsh.config.applications[0].name, "app1");
/// assert_eq!(project.platformsh.applications[0].name, "app1");
/// assert_eq!(project.platformsh.services[0].name, "db");
/// ```
pub struct TestProject {
    descriptor: ProjectDescriptor,
}

impl TestProject {
    /// Start an empty project.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            descriptor: ProjectDescriptor::new(id, name),
        }
    }

    /// Declare an application and register it as a service instance.
    pub fn with_app(mut self, app: AppDefinition) -> Self {
        let instance = ServiceDefinition::new(app.name.clone());
        self.descriptor.platformsh.config.applications.push(app);
        self.descriptor.platformsh.applications.push(instance);
        self
    }

    /// Declare a bare application with only a name.
    pub fn with_app_named(self, name: &str) -> Self {
        self.with_app(AppDefinition::new(name))
    }

    /// Declare an application from JSON.
    ///
    /// # Panics
    /// Panics if `value` is not a valid application definition.
    pub fn with_app_json(self, value: Value) -> Self {
        let app: AppDefinition = serde_json::from_value(value)
            .unwrap_or_else(|e| panic!("with_app_json: invalid application definition: {e}"));
        self.with_app(app)
    }

    pub fn with_service(mut self, service: ServiceDefinition) -> Self {
        self.descriptor.platformsh.services.push(service);
        self
    }

    pub fn with_service_named(self, name: &str) -> Self {
        self.with_service(ServiceDefinition::new(name))
    }

    pub fn with_route(mut self, url: &str, route: Value) -> Self {
        self.descriptor
            .platformsh
            .routes
            .insert(url.to_string(), route);
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.descriptor.config_path = path.into();
        self
    }

    pub fn build(self) -> ProjectDescriptor {
        self.descriptor
    }
}

/// The reference two-instance project: app `app1` plus service `db`
/// reachable at `db.local`.
pub fn scenario_project() -> ProjectDescriptor {
    TestProject::new("proj1", "main")
        .with_app_named("app1")
        .with_service(ServiceDefinition::new("db").with_hostname("db.local"))
        .build()
}

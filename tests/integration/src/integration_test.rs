//! End-to-end integration test for the synthesis pipeline
//!
//! This test exercises the complete flow: descriptor parsing -> host context
//! -> run config synthesis -> files written by a caller-side writer.

use pretty_assertions::assert_eq;
use psh_core::{build_run_configs, logging};
use psh_meta::{LandoContext, ProjectDescriptor};
use psh_test_utils::payload::{decode_app_variable, decode_json};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

const PROJECT_YAML: &str = r#"
id: x7k2
name: shop
platformsh:
  config:
    applications:
      - name: storefront
        type: "php:8.2"
        web:
          locations:
            "/":
              root: public
              passthru: /index.php
        variables:
          env:
            APP_ENV: dev
            PLATFORM_BRANCH: feature-x
          d8settings:
            hash_salt: not-so-secret
            file_private_path: /app/private
          php:
            memory_limit: 256M
        mounts:
          "/var/cache":
            source: local
            source_path: cache
        crons:
          reindex:
            spec: "*/20 * * * *"
            cmd: bin/console search:reindex
      - name: admin
        disk: 512
  applications:
    - name: storefront
      hostname: storefront.platformsh.internal
    - name: admin
  services:
    - name: database
      type: "mariadb:10.6"
      hostname: database.platformsh.internal
      disk: 1024
    - name: cache
      type: "redis:7.0"
      configuration:
        access:
          admin: viewer
  routes:
    "https://{default}/":
      type: upstream
      upstream: "storefront:http"
    "https://admin.{default}/":
      type: upstream
      upstream: "admin:http"
"#;

fn host_context() -> LandoContext {
    LandoContext::from_env_map([
        ("LANDO_HOST_IP", "192.168.65.2"),
        ("LANDO_HOST_UID", "501"),
        ("LANDO_HOST_GID", "20"),
    ])
}

/// Write every run config under `root`, the way the host tool's file writer does.
fn write_all(root: &TempDir, project: &ProjectDescriptor) -> Vec<std::path::PathBuf> {
    let files = build_run_configs(project, &host_context()).unwrap();
    files
        .iter()
        .map(|file| {
            let path = root.path().join(&file.file);
            fs::write(&path, file.contents().unwrap()).unwrap();
            path
        })
        .collect()
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_full_vertical_slice() {
    let _ = logging::init();
    let temp = TempDir::new().unwrap();
    let project = ProjectDescriptor::from_yaml(PROJECT_YAML).unwrap();

    // 1. Synthesize and write
    let paths = write_all(&temp, &project);
    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["storefront.json", "admin.json", "database.json", "cache.json"]
    );

    // 2. Application container
    let storefront = read_json(&paths[0]);
    assert_eq!(storefront["service"], json!("storefront"));
    assert_eq!(storefront["hostname"], json!("storefront.platformsh.internal"));
    assert_eq!(storefront["domainname"], json!("shop.storefront.service._.lndo.site"));
    assert_eq!(storefront["host_ip"], json!("192.168.65.2"));
    assert_eq!(storefront["web_uid"], json!(501));
    assert_eq!(storefront["log_gid"], json!(20));

    let apps = storefront["applications"].as_array().unwrap();
    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0]["slug"], json!("x7k2-storefront"));
    assert_eq!(apps[1]["slug"], json!("x7k2-admin"));
    assert_eq!(apps[1]["configuration"]["disk"], json!(512));
    assert_eq!(apps[0]["configuration"]["disk"], json!(2048));
    assert_eq!(apps[0]["mounts"]["/var/cache"]["source_path"], json!("cache"));
    assert_eq!(apps[0]["crons"]["reindex"]["spec"], json!("*/20 * * * *"));
    assert_eq!(apps[0]["cron_minimum_interval"], json!("1"));
    assert_eq!(apps[0]["enable_smtp"], json!("false"));

    // 3. Environment of the first application
    let env = &apps[0]["configuration"]["variables"]["env"];
    assert_eq!(env["APP_ENV"], json!("dev"));
    assert_eq!(env["PLATFORM_BRANCH"], json!("master"));
    assert_eq!(env["PLATFORM_DOCUMENT_ROOT"], json!("/app/public"));
    assert_eq!(env["PLATFORM_APPLICATION_NAME"], json!("storefront"));
    assert_eq!(env["PLATFORM_PROJECT"], json!("x7k2"));
    assert_eq!(env["PLATFORM_TREE_ID"], json!("x7k2-storefront"));

    let routes = decode_app_variable(&storefront, "PLATFORM_ROUTES");
    assert_eq!(routes["https://admin.{default}/"]["upstream"], json!("admin:http"));

    let variables = decode_app_variable(&storefront, "PLATFORM_VARIABLES");
    assert_eq!(variables["d8settings:hash_salt"], json!("not-so-secret"));
    assert_eq!(variables["php:memory_limit"], json!("256M"));
    assert_eq!(variables["d8settings:file_private_path"], json!("/tmp"));
    assert_eq!(variables["d8settings:php_storage:twig:directory"], json!("/tmp"));

    let snapshot = decode_app_variable(&storefront, "PLATFORM_APPLICATION");
    assert_eq!(snapshot["id"], json!("x7k2"));
    assert_eq!(snapshot["platformsh"]["services"][0]["name"], json!("database"));

    // 4. Backing services
    let database = read_json(&paths[2]);
    assert_eq!(database["hostname"], json!("database.platformsh.internal"));
    assert_eq!(database["info"]["limits"]["disk"], json!(1024));
    assert_eq!(database["info"]["external ip"], json!("192.168.65.2"));

    let cache = read_json(&paths[3]);
    assert_eq!(cache["hostname"], json!(null));
    assert_eq!(cache["configuration"]["access"], json!({"admin": "viewer"}));
    assert_eq!(cache["configuration"]["project_info"]["name"], json!("x7k2"));
}

#[test]
fn test_every_file_carries_the_same_applications() {
    let temp = TempDir::new().unwrap();
    let project = ProjectDescriptor::from_yaml(PROJECT_YAML).unwrap();
    let paths = write_all(&temp, &project);

    let first = read_json(&paths[0])["applications"].clone();
    for path in &paths[1..] {
        assert_eq!(read_json(path)["applications"], first);
    }
}

#[test]
fn test_json_and_yaml_descriptors_agree() {
    let from_yaml = ProjectDescriptor::from_yaml(PROJECT_YAML).unwrap();
    let as_json = serde_json::to_string(&from_yaml).unwrap();
    let from_json = ProjectDescriptor::from_json(&as_json).unwrap();

    let a = build_run_configs(&from_yaml, &host_context()).unwrap();
    let b = build_run_configs(&from_json, &host_context()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_decode_json_helper_matches_core_decoder() {
    let payload = psh_core::encode(&json!({"a": [1, 2]})).unwrap();
    assert_eq!(decode_json(&payload), psh_core::decode::<Value>(&payload).unwrap());
}

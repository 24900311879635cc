//! Integration tests for host context loading

use psh_meta::context::{DEFAULT_GID, DEFAULT_UID, HOST_IP_KEY};
use psh_meta::{LandoContext, OverridePolicy};
use rstest::rstest;

#[test]
fn test_from_env_map_reads_lando_keys() {
    let context = LandoContext::from_env_map([
        ("LANDO_HOST_IP", "192.168.1.10"),
        ("LANDO_HOST_UID", "501"),
        ("LANDO_HOST_GID", "20"),
        ("LANDO_INSTANCE", "dev"),
        ("HOME", "/home/dev"),
    ]);

    assert_eq!(context.host_ip(), Some("192.168.1.10"));
    assert_eq!(context.uid, 501);
    assert_eq!(context.gid, 20);
    assert_eq!(context.instance, "dev");
    assert!(!context.app_env.contains_key("HOME"));
    assert_eq!(context.app_env[HOST_IP_KEY], "192.168.1.10");
}

#[rstest]
#[case("", DEFAULT_UID)]
#[case("nobody", DEFAULT_UID)]
#[case("-1", DEFAULT_UID)]
#[case(" 33 ", 33)]
fn test_from_env_map_uid_fallback(#[case] raw: &str, #[case] expected: u32) {
    let context = LandoContext::from_env_map([("LANDO_HOST_UID", raw)]);
    assert_eq!(context.uid, expected);
    assert_eq!(context.gid, DEFAULT_GID);
}

#[test]
fn test_empty_instance_keeps_default() {
    let context = LandoContext::from_env_map([("LANDO_INSTANCE", "")]);
    assert_eq!(context.instance, "lando");
}

#[test]
fn test_builder_methods() {
    let context = LandoContext::default()
        .with_host_ip("127.0.0.2")
        .with_ids(0, 0)
        .with_instance("ci")
        .with_override_policy(OverridePolicy::Reject);

    assert_eq!(context.host_ip(), Some("127.0.0.2"));
    assert_eq!((context.uid, context.gid), (0, 0));
    assert_eq!(context.instance, "ci");
    assert_eq!(context.override_policy, OverridePolicy::Reject);
}

#[test]
fn test_override_policy_deserializes_lowercase() {
    let context: LandoContext =
        serde_json::from_str(r#"{"override_policy": "reject"}"#).unwrap();
    assert_eq!(context.override_policy, OverridePolicy::Reject);
    assert_eq!(context.uid, DEFAULT_UID);
}

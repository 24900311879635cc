//! Host context for run config synthesis.
//!
//! The context carries what the host tool knows about the machine the
//! project runs on: the host IP, the user/group ids containers should run
//! as, and the instance name. It deserializes from the host tool's own
//! config shape:
//!
//! ```json
//! { "appEnv": { "LANDO_HOST_IP": "192.168.1.10" }, "uid": "501", "gid": 20 }
//! ```
//!
//! `uid` and `gid` are accepted as numbers or numeric strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Environment key holding the host IP
pub const HOST_IP_KEY: &str = "LANDO_HOST_IP";
/// Environment key holding the host user id
pub const HOST_UID_KEY: &str = "LANDO_HOST_UID";
/// Environment key holding the host group id
pub const HOST_GID_KEY: &str = "LANDO_HOST_GID";
/// Environment key holding the instance name
pub const INSTANCE_KEY: &str = "LANDO_INSTANCE";

pub const DEFAULT_UID: u32 = 1000;
pub const DEFAULT_GID: u32 = 1000;
pub const DEFAULT_INSTANCE: &str = "lando";

/// What to do when a per-service override redefines an identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverridePolicy {
    /// Log a warning and let the override win
    #[default]
    Warn,
    /// Fail the synthesis
    Reject,
}

impl FromStr for OverridePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warn" => Ok(OverridePolicy::Warn),
            "reject" | "strict" => Ok(OverridePolicy::Reject),
            _ => Err(format!("unknown override policy: {s}")),
        }
    }
}

impl fmt::Display for OverridePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverridePolicy::Warn => write!(f, "warn"),
            OverridePolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Derived host context consumed by the platform config assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandoContext {
    /// Environment the host tool exposes to apps. Only string entries are read.
    #[serde(default, rename = "appEnv")]
    pub app_env: Map<String, Value>,
    #[serde(default = "default_uid", deserialize_with = "lenient_id")]
    pub uid: u32,
    #[serde(default = "default_gid", deserialize_with = "lenient_id")]
    pub gid: u32,
    #[serde(default = "default_instance")]
    pub instance: String,
    #[serde(default)]
    pub override_policy: OverridePolicy,
}

fn default_uid() -> u32 {
    DEFAULT_UID
}

fn default_gid() -> u32 {
    DEFAULT_GID
}

fn default_instance() -> String {
    DEFAULT_INSTANCE.to_string()
}

impl Default for LandoContext {
    fn default() -> Self {
        Self {
            app_env: Map::new(),
            uid: DEFAULT_UID,
            gid: DEFAULT_GID,
            instance: default_instance(),
            override_policy: OverridePolicy::default(),
        }
    }
}

impl LandoContext {
    /// Build a context from `LANDO_*` environment entries.
    ///
    /// Unknown keys are ignored. Ids that do not parse fall back to their
    /// defaults.
    pub fn from_env_map<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut context = Self::default();
        for (key, value) in vars {
            let key = key.into();
            if !key.starts_with("LANDO_") {
                continue;
            }
            let value = value.into();
            match key.as_str() {
                HOST_UID_KEY => context.uid = parse_id(&key, &value).unwrap_or(DEFAULT_UID),
                HOST_GID_KEY => context.gid = parse_id(&key, &value).unwrap_or(DEFAULT_GID),
                INSTANCE_KEY if !value.is_empty() => context.instance = value.clone(),
                _ => {}
            }
            context.app_env.insert(key, Value::String(value));
        }
        context
    }

    /// Build a context from the current process environment.
    pub fn from_env() -> Self {
        Self::from_env_map(std::env::vars())
    }

    pub fn with_host_ip(mut self, ip: impl Into<String>) -> Self {
        self.app_env
            .insert(HOST_IP_KEY.to_string(), Value::String(ip.into()));
        self
    }

    pub fn with_ids(mut self, uid: u32, gid: u32) -> Self {
        self.uid = uid;
        self.gid = gid;
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    pub fn with_override_policy(mut self, policy: OverridePolicy) -> Self {
        self.override_policy = policy;
        self
    }

    /// The host IP, if the host tool exposed one.
    pub fn host_ip(&self) -> Option<&str> {
        self.app_env.get(HOST_IP_KEY).and_then(Value::as_str)
    }
}

fn parse_id(key: &str, value: &str) -> Option<u32> {
    match value.trim().parse::<u32>() {
        Ok(id) => Some(id),
        Err(_) => {
            tracing::warn!(key, value, "Ignoring non-numeric id, using default");
            None
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Float(f64),
    Text(String),
}

fn lenient_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let raw = RawId::deserialize(deserializer)?;
    let id = match raw {
        RawId::Number(n) => n,
        RawId::Float(f) if f.is_finite() && f >= 0.0 => f.trunc() as u64,
        RawId::Float(f) => return Err(D::Error::custom(format!("invalid id: {f}"))),
        RawId::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| D::Error::custom(format!("invalid id: {s:?}")))?,
    };
    u32::try_from(id).map_err(|_| D::Error::custom(format!("id out of range: {id}")))
}

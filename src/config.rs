use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

// ------------------------------------------------------------
// Root configuration
// ------------------------------------------------------------
//
// The `kafka` input section of the host configuration.
//
// Each entry of `instances` becomes one independently scheduled
// collection target. Order is preserved and used for reporting.
//
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GroupConfig {
    /// Configured Kafka clusters, in configuration order
    #[serde(default)]
    pub instances: Vec<InstanceConfig>,
}

impl GroupConfig {
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }
}

// ------------------------------------------------------------
// Configuration loader
// ------------------------------------------------------------
//
// Reads a JSON document from disk and deserializes it into the
// strongly typed `GroupConfig`. Semantic validation happens later,
// per instance, during `Group::init`.
//
pub fn load_config(path: impl AsRef<Path>) -> Result<GroupConfig, ConfigError> {
    let data = fs::read_to_string(path)?;
    GroupConfig::from_json_str(&data)
}

// ------------------------------------------------------------
// SASL mechanism
// ------------------------------------------------------------
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaslMechanism {
    #[default]
    #[serde(rename = "plain")]
    Plain,

    #[serde(rename = "scram-sha256")]
    ScramSha256,

    #[serde(rename = "scram-sha512")]
    ScramSha512,
}

// ------------------------------------------------------------
// Instance configuration (raw)
// ------------------------------------------------------------
//
// Settings exactly as the operator wrote them. Nothing here is
// defaulted or checked yet; see `options::normalize`.
//
// NOTE:
// - Optional booleans distinguish "unset" from "explicitly false".
// - Zero / negative numbers mean "unset".
//
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct InstanceConfig {
    /// Labels attached to every metric reported by this instance
    pub labels: HashMap<String, String>,

    /// Run only every N-th tick (0 or negative: every tick)
    pub interval_times: i64,

    /// One of debug / info / warn / error; anything else allows all
    pub log_level: String,

    /// Broker addresses (host:port)
    pub kafka_uris: Vec<String>,

    /// Connect using SASL
    pub use_sasl: bool,

    /// Only set this to false when talking through a non-Kafka SASL proxy
    pub use_sasl_handshake: Option<bool>,

    pub sasl_username: String,
    pub sasl_password: String,
    pub sasl_mechanism: Option<SaslMechanism>,

    /// Connect using TLS
    pub use_tls: bool,

    /// Optional CA bundle for verifying the brokers
    pub ca_file: String,

    /// Client certificate, required when `use_tls` is set
    pub cert_file: String,

    /// Client key, required when `use_tls` is set
    pub key_file: String,

    /// Skip broker certificate verification
    pub insecure_skip_verify: bool,

    /// Kafka protocol version the client negotiates with
    pub kafka_version: String,

    /// Read consumer group offsets from ZooKeeper as well
    pub use_zookeeper_lag: bool,

    /// ZooKeeper addresses, required when `use_zookeeper_lag` is set
    pub zookeeper_uris: Vec<String>,

    /// Humantime duration, e.g. "1s" or "30s"
    pub metadata_refresh_interval: String,

    /// If false, concurrent scrapes share a single Kafka round trip.
    /// Disable on large clusters.
    pub allow_concurrency: Option<bool>,

    /// Offsets kept per partition in the interpolation table
    pub max_offsets: i64,

    /// How often the interpolation table is pruned
    pub prune_interval_seconds: i64,

    #[serde(rename = "topics_filter_regex")]
    pub topics_filter: String,

    #[serde(rename = "groups_filter_regex")]
    pub groups_filter: String,
}

//! Instance configuration validation and defaulting.
//!
//! [`normalize`] turns a raw [`InstanceConfig`] into the immutable
//! [`Normalized`] value handed to the collection engine. The raw
//! configuration is only read, never rewritten.

use std::time::Duration;

use log::LevelFilter;
use regex::Regex;

use crate::config::{InstanceConfig, SaslMechanism};
use crate::error::ConfigError;
use crate::util;

pub const DEFAULT_KAFKA_VERSION: &str = "2.0.0";
pub const DEFAULT_METADATA_REFRESH_INTERVAL: &str = "1s";
pub const DEFAULT_MAX_OFFSETS: usize = 1000;
pub const DEFAULT_PRUNE_INTERVAL_SECONDS: u64 = 30;
pub const MATCH_ALL: &str = ".*";

/// Everything the lag exporter needs to open a session.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub uris: Vec<String>,

    pub use_sasl: bool,
    pub use_sasl_handshake: bool,
    pub sasl_username: String,
    pub sasl_password: String,
    pub sasl_mechanism: SaslMechanism,

    pub use_tls: bool,
    pub tls_ca_file: String,
    pub tls_cert_file: String,
    pub tls_key_file: String,
    pub tls_insecure_skip_verify: bool,

    pub kafka_version: String,

    pub use_zookeeper_lag: bool,
    pub zookeeper_uris: Vec<String>,

    pub metadata_refresh_interval: Duration,
    pub allow_concurrent: bool,
    pub max_offsets: usize,
    pub prune_interval_seconds: u64,

    /// Instance labels, encoded as `k=v,k=v`
    pub labels: String,
}

/// Compiled topic and consumer-group filters.
#[derive(Debug, Clone)]
pub struct Filters {
    pub topics: Regex,
    pub groups: Regex,
}

/// Result of validating one instance.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub options: EngineOptions,
    pub filters: Filters,
    pub log_level: LevelFilter,

    /// Never negative; 0 means every tick
    pub interval_times: u64,
}

/// Validates and defaults an instance configuration.
///
/// Rules are checked in a fixed order and the first violation wins:
/// endpoints, TLS key pair, SASL credentials, ZooKeeper addresses,
/// then the parseable fields (refresh interval, filters).
pub fn normalize(cfg: &InstanceConfig) -> Result<Normalized, ConfigError> {
    if cfg.kafka_uris.first().is_none_or(|uri| uri.is_empty()) {
        return Err(ConfigError::MissingEndpoints);
    }
    if cfg.use_tls && (cfg.cert_file.is_empty() || cfg.key_file.is_empty()) {
        return Err(ConfigError::IncompleteTlsConfig);
    }
    if cfg.use_sasl && (cfg.sasl_username.is_empty() || cfg.sasl_password.is_empty()) {
        return Err(ConfigError::IncompleteSaslConfig);
    }
    if cfg.use_zookeeper_lag && cfg.zookeeper_uris.first().is_none_or(|uri| uri.is_empty()) {
        return Err(ConfigError::MissingZookeeperAddress);
    }

    let refresh = non_empty_or(&cfg.metadata_refresh_interval, DEFAULT_METADATA_REFRESH_INTERVAL);
    let metadata_refresh_interval =
        humantime::parse_duration(refresh).map_err(|source| ConfigError::InvalidRefreshInterval {
            value: refresh.to_string(),
            source,
        })?;

    let filters = Filters {
        topics: compile_filter("topics_filter_regex", &cfg.topics_filter)?,
        groups: compile_filter("groups_filter_regex", &cfg.groups_filter)?,
    };

    let options = EngineOptions {
        uris: cfg.kafka_uris.clone(),
        use_sasl: cfg.use_sasl,
        use_sasl_handshake: cfg.use_sasl_handshake.unwrap_or(true),
        sasl_username: cfg.sasl_username.clone(),
        sasl_password: cfg.sasl_password.clone(),
        sasl_mechanism: cfg.sasl_mechanism.unwrap_or_default(),
        use_tls: cfg.use_tls,
        tls_ca_file: cfg.ca_file.clone(),
        tls_cert_file: cfg.cert_file.clone(),
        tls_key_file: cfg.key_file.clone(),
        tls_insecure_skip_verify: cfg.insecure_skip_verify,
        kafka_version: non_empty_or(&cfg.kafka_version, DEFAULT_KAFKA_VERSION).to_string(),
        use_zookeeper_lag: cfg.use_zookeeper_lag,
        zookeeper_uris: cfg.zookeeper_uris.clone(),
        metadata_refresh_interval,
        allow_concurrent: cfg.allow_concurrency.unwrap_or(true),
        max_offsets: positive_or(cfg.max_offsets, DEFAULT_MAX_OFFSETS as u64) as usize,
        prune_interval_seconds: positive_or(
            cfg.prune_interval_seconds,
            DEFAULT_PRUNE_INTERVAL_SECONDS,
        ),
        labels: util::encode_labels(&cfg.labels),
    };

    Ok(Normalized {
        options,
        filters,
        log_level: util::level_filter(&cfg.log_level),
        interval_times: u64::try_from(cfg.interval_times).unwrap_or(0),
    })
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

fn positive_or(value: i64, default: u64) -> u64 {
    u64::try_from(value).ok().filter(|v| *v > 0).unwrap_or(default)
}

fn compile_filter(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    let pattern = non_empty_or(pattern, MATCH_ALL);
    Regex::new(pattern).map_err(|source| ConfigError::InvalidFilter {
        field,
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> InstanceConfig {
        InstanceConfig {
            kafka_uris: vec!["127.0.0.1:9092".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn rejects_missing_endpoints() {
        let cfg = InstanceConfig::default();
        assert!(matches!(normalize(&cfg), Err(ConfigError::MissingEndpoints)));

        let cfg = InstanceConfig {
            kafka_uris: vec![String::new(), "k2:9092".to_string()],
            ..Default::default()
        };
        assert!(matches!(normalize(&cfg), Err(ConfigError::MissingEndpoints)));
    }

    #[test]
    fn tls_requires_both_cert_and_key() {
        let mut cfg = base();
        cfg.use_tls = true;
        cfg.cert_file = String::new();
        cfg.key_file = "x".to_string();
        assert!(matches!(normalize(&cfg), Err(ConfigError::IncompleteTlsConfig)));

        cfg.cert_file = "client.pem".to_string();
        cfg.key_file = String::new();
        assert!(matches!(normalize(&cfg), Err(ConfigError::IncompleteTlsConfig)));

        cfg.key_file = "x".to_string();
        let normalized = normalize(&cfg).unwrap();
        assert!(normalized.options.use_tls);
        assert_eq!(normalized.options.tls_key_file, "x");
    }

    #[test]
    fn sasl_requires_credentials() {
        let mut cfg = base();
        cfg.use_sasl = true;
        cfg.sasl_username = "monitor".to_string();
        assert!(matches!(normalize(&cfg), Err(ConfigError::IncompleteSaslConfig)));

        cfg.sasl_username = String::new();
        cfg.sasl_password = "secret".to_string();
        assert!(matches!(normalize(&cfg), Err(ConfigError::IncompleteSaslConfig)));

        cfg.sasl_username = "monitor".to_string();
        assert!(normalize(&cfg).is_ok());
    }

    #[test]
    fn zookeeper_lag_requires_an_address() {
        let mut cfg = base();
        cfg.use_zookeeper_lag = true;
        assert!(matches!(normalize(&cfg), Err(ConfigError::MissingZookeeperAddress)));

        cfg.zookeeper_uris = vec![String::new()];
        assert!(matches!(normalize(&cfg), Err(ConfigError::MissingZookeeperAddress)));

        cfg.zookeeper_uris = vec!["zk1:2181".to_string()];
        assert!(normalize(&cfg).is_ok());
    }

    #[test]
    fn endpoints_are_checked_before_tls() {
        let cfg = InstanceConfig {
            use_tls: true,
            ..Default::default()
        };
        assert!(matches!(normalize(&cfg), Err(ConfigError::MissingEndpoints)));
    }

    #[test]
    fn applies_defaults_to_unset_fields() {
        let n = normalize(&base()).unwrap();
        let o = &n.options;

        assert!(o.use_sasl_handshake);
        assert!(o.allow_concurrent);
        assert_eq!(o.kafka_version, DEFAULT_KAFKA_VERSION);
        assert_eq!(o.metadata_refresh_interval, Duration::from_secs(1));
        assert_eq!(o.max_offsets, 1000);
        assert_eq!(o.prune_interval_seconds, 30);
        assert_eq!(o.sasl_mechanism, SaslMechanism::Plain);
        assert_eq!(n.filters.topics.as_str(), MATCH_ALL);
        assert_eq!(n.filters.groups.as_str(), MATCH_ALL);
        assert!(n.filters.topics.is_match("__consumer_offsets"));
        assert_eq!(n.log_level, LevelFilter::Trace);
        assert_eq!(n.interval_times, 0);
    }

    #[test]
    fn keeps_explicit_values() {
        let mut cfg = base();
        cfg.max_offsets = 500;
        cfg.prune_interval_seconds = 10;
        cfg.use_sasl_handshake = Some(false);
        cfg.allow_concurrency = Some(false);
        cfg.kafka_version = "3.6.0".to_string();
        cfg.metadata_refresh_interval = "2m".to_string();
        cfg.log_level = "error".to_string();
        cfg.interval_times = 4;

        let n = normalize(&cfg).unwrap();
        assert_eq!(n.options.max_offsets, 500);
        assert_eq!(n.options.prune_interval_seconds, 10);
        assert!(!n.options.use_sasl_handshake);
        assert!(!n.options.allow_concurrent);
        assert_eq!(n.options.kafka_version, "3.6.0");
        assert_eq!(n.options.metadata_refresh_interval, Duration::from_secs(120));
        assert_eq!(n.log_level, LevelFilter::Error);
        assert_eq!(n.interval_times, 4);
    }

    #[test]
    fn non_positive_numbers_fall_back_to_defaults() {
        let mut cfg = base();
        cfg.max_offsets = -3;
        cfg.prune_interval_seconds = 0;
        cfg.interval_times = -5;

        let n = normalize(&cfg).unwrap();
        assert_eq!(n.options.max_offsets, DEFAULT_MAX_OFFSETS);
        assert_eq!(n.options.prune_interval_seconds, DEFAULT_PRUNE_INTERVAL_SECONDS);
        assert_eq!(n.interval_times, 0);
    }

    #[test]
    fn does_not_touch_the_raw_config() {
        let cfg = base();
        let _ = normalize(&cfg).unwrap();
        assert_eq!(cfg.max_offsets, 0);
        assert!(cfg.use_sasl_handshake.is_none());
        assert!(cfg.topics_filter.is_empty());
    }

    #[test]
    fn encodes_labels_into_options() {
        let mut cfg = base();
        cfg.labels = HashMap::from([("cluster".to_string(), "prod".to_string())]);
        assert_eq!(normalize(&cfg).unwrap().options.labels, "cluster=prod");
    }

    #[test]
    fn rejects_invalid_filters() {
        let mut cfg = base();
        cfg.groups_filter = "([unclosed".to_string();

        match normalize(&cfg) {
            Err(ConfigError::InvalidFilter { field, pattern, .. }) => {
                assert_eq!(field, "groups_filter_regex");
                assert_eq!(pattern, "([unclosed");
            }
            other => panic!("expected InvalidFilter, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_refresh_interval() {
        let mut cfg = base();
        cfg.metadata_refresh_interval = "soon".to_string();
        assert!(matches!(
            normalize(&cfg),
            Err(ConfigError::InvalidRefreshInterval { .. })
        ));
    }
}

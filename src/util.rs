/// Small helpers shared by the validator, the instances and the sink.
///
/// IMPORTANT:
/// - No scheduling or Kafka logic lives here.
/// - Everything in this module is pure and deterministic
///   (except for the clock).
///
use std::collections::HashMap;

use log::LevelFilter;

/// Returns the current Unix timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Encodes a label map as a comma-joined list of `key=value` pairs.
///
/// Examples:
/// - {"cluster": "prod"}               -> "cluster=prod"
/// - {"cluster": "prod", "dc": "fra"}  -> "cluster=prod,dc=fra" (any order)
/// - {}                                -> ""
///
/// NOTE:
/// - Pair order follows map iteration and is not stable.
///   Consumers must compare label sets, not strings.
///
pub fn encode_labels(labels: &HashMap<String, String>) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits a string produced by [`encode_labels`] back into pairs.
///
/// Malformed segments (no `=`) are skipped.
pub fn decode_labels(encoded: &str) -> impl Iterator<Item = (&str, &str)> {
    encoded
        .split(',')
        .filter(|seg| !seg.is_empty())
        .filter_map(|seg| seg.split_once('='))
}

/// Maps a configured `log_level` to a verbosity filter.
///
/// Unknown or empty values allow everything.
pub fn level_filter(level: &str) -> LevelFilter {
    match level {
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Trace,
    }
}

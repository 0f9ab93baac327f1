use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::util;

/// A single metric sample as written into the shared sink.
///
/// DESIGN NOTES:
/// - Labels are kept sorted so two samples with the same label set
///   compare and serialize identically.
/// - The collection engine decides names and values; the core only
///   transports samples.
///
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Sample {
    /// Metric name, e.g. "kafka_consumergroup_lag"
    pub name: String,

    pub value: f64,

    pub labels: BTreeMap<String, String>,

    /// Milliseconds since Unix epoch
    pub timestamp_ms: i64,
}

impl Sample {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            labels: BTreeMap::new(),
            timestamp_ms: util::now_ms(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Merges an encoded `k=v,k=v` label string into this sample.
    ///
    /// Existing keys are overwritten by the encoded ones, so instance
    /// labels win over labels the engine computed.
    pub fn with_encoded_labels(mut self, encoded: &str) -> Self {
        for (k, v) in util::decode_labels(encoded) {
            self.labels.insert(k.to_string(), v.to_string());
        }
        self
    }
}

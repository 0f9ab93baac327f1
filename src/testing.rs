//! In-crate test doubles for the collection engine.
//!
//! Engine behavior is picked from the first broker address:
//! - `broken...` : the factory refuses to create the engine
//! - `fail...`   : `collect` returns an error
//! - `panic...`  : `collect` panics
//! - `slow...`   : `collect` sleeps before writing its sample
//! - anything else writes one `kafka_brokers` sample

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::InstanceConfig;
use crate::engine::{EngineFactory, LagEngine};
use crate::logger::InstanceLogger;
use crate::options::{EngineOptions, Filters};
use crate::schema::Sample;
use crate::sink::MetricSink;

#[derive(Debug, Default)]
pub struct Probe {
    pub creates: AtomicUsize,
    pub collects: AtomicUsize,
    pub closes: AtomicUsize,
}

impl Probe {
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn collects(&self) -> usize {
        self.collects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct MockFactory {
    probes: Mutex<HashMap<String, Arc<Probe>>>,
}

impl MockFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn probe(&self, uri: &str) -> Arc<Probe> {
        self.probes
            .lock()
            .unwrap()
            .entry(uri.to_string())
            .or_default()
            .clone()
    }
}

impl EngineFactory for MockFactory {
    fn create(
        &self,
        options: &EngineOptions,
        _filters: &Filters,
        _logger: InstanceLogger,
    ) -> anyhow::Result<Box<dyn LagEngine>> {
        let uri = options.uris[0].clone();
        let probe = self.probe(&uri);
        probe.creates.fetch_add(1, Ordering::SeqCst);

        if uri.starts_with("broken") {
            anyhow::bail!("cannot reach {uri}");
        }

        Ok(Box::new(MockEngine {
            uri,
            labels: options.labels.clone(),
            probe,
        }))
    }
}

struct MockEngine {
    uri: String,
    labels: String,
    probe: Arc<Probe>,
}

#[async_trait::async_trait]
impl LagEngine for MockEngine {
    async fn collect(&self, sink: &MetricSink) -> anyhow::Result<()> {
        self.probe.collects.fetch_add(1, Ordering::SeqCst);

        if self.uri.starts_with("panic") {
            panic!("engine for {} blew up", self.uri);
        }
        if self.uri.starts_with("fail") {
            anyhow::bail!("metadata request to {} timed out", self.uri);
        }
        if self.uri.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        sink.push(
            Sample::new("kafka_brokers", 1.0)
                .with_label("uri", self.uri.as_str())
                .with_encoded_labels(&self.labels),
        );
        Ok(())
    }

    fn close(&self) {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn instance(uri: &str, interval_times: i64) -> InstanceConfig {
    InstanceConfig {
        kafka_uris: vec![uri.to_string()],
        interval_times,
        ..Default::default()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

use std::fmt;
use std::sync::Arc;

use crate::{
    collector::{
        instance::Instance,
        runner::{self, TickCounter},
    },
    config::GroupConfig,
    engine::EngineFactory,
    error::ConfigError,
    logger::LOG_TARGET,
    metrics::{MetricsSnapshot, RuntimeMetrics},
    sink::MetricSink,
};

/// All Kafka instances of one host configuration.
///
/// Host contract:
/// - `init` once at startup; do not tick if it fails
/// - `tick` on the host's own cadence, never concurrently with itself
/// - `shutdown` once at teardown
///
/// The instance sequence is fixed at construction.
pub struct Group {
    instances: Vec<Arc<Instance>>,
    counter: TickCounter,
    factory: Arc<dyn EngineFactory>,
    metrics: RuntimeMetrics,
}

impl Group {
    pub fn new(config: GroupConfig, factory: Arc<dyn EngineFactory>) -> Self {
        let instances = config
            .instances
            .into_iter()
            .enumerate()
            .map(|(index, cfg)| Arc::new(Instance::new(index, cfg)))
            .collect();

        Self {
            instances,
            counter: TickCounter::new(),
            factory,
            metrics: RuntimeMetrics::default(),
        }
    }

    /// Metric name prefix for this input. Kafka metrics carry none.
    pub fn prefix(&self) -> &'static str {
        ""
    }

    pub fn instances(&self) -> &[Arc<Instance>] {
        &self.instances
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.counter.current()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Initializes every instance in configuration order.
    ///
    /// Stops at the first failure. Instances initialized before it
    /// keep their engine handles; they are released by `shutdown`
    /// or when the group is dropped.
    pub fn init(&self) -> Result<(), ConfigError> {
        if self.instances.is_empty() {
            return Err(ConfigError::EmptyInstanceSet);
        }

        for (index, ins) in self.instances.iter().enumerate() {
            if let Err(e) = ins.init(self.factory.as_ref()) {
                log::error!(
                    target: LOG_TARGET,
                    "instance {} ({}) failed to initialize: {}",
                    index,
                    ins.id(),
                    e
                );
                return Err(e);
            }
        }

        log::info!(
            target: LOG_TARGET,
            "{} kafka instance(s) initialized",
            self.instances.len()
        );
        Ok(())
    }

    /// Runs one collection cycle and waits for it to finish.
    ///
    /// Per-instance failures are logged and never returned.
    pub async fn tick(&self, sink: &MetricSink) {
        let tick = self.counter.advance();
        self.metrics.record_tick();

        runner::run_tick(&self.instances, tick, sink, &self.metrics).await;
    }

    /// Releases every initialized instance's engine handle.
    pub fn shutdown(&self) {
        for ins in &self.instances {
            ins.close();
        }
        log::debug!(target: LOG_TARGET, "kafka instances released");
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("instances", &self.instances)
            .field("ticks", &self.ticks())
            .finish_non_exhaustive()
    }
}

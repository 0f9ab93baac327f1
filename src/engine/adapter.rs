use crate::logger::InstanceLogger;
use crate::options::{EngineOptions, Filters};
use crate::sink::MetricSink;

/// LagEngine is the session a single instance holds against its
/// Kafka cluster.
///
/// The engine is responsible for:
/// - Talking to the brokers (and ZooKeeper, if enabled)
/// - Computing offsets and consumer-group lag
/// - Writing samples into the shared sink
///
/// THREAD SAFETY:
/// - Must be Send + Sync
/// - The scheduler never runs two `collect` calls on the same
///   engine at once, as long as the host serializes its ticks
///
#[async_trait::async_trait]
pub trait LagEngine: Send + Sync {
    /// Performs one scrape and appends the resulting samples.
    ///
    /// CONTRACT:
    /// - Errors are reported through the return value; the calling
    ///   instance logs them and moves on
    /// - May block on network I/O for as long as it needs to;
    ///   timeouts are the engine's business
    ///
    async fn collect(&self, sink: &MetricSink) -> anyhow::Result<()>;

    /// Releases the session.
    ///
    /// Called exactly once per engine.
    fn close(&self);
}

/// Builds one [`LagEngine`] per instance during initialization.
///
/// PARAMETERS:
/// - `options`: validated, defaulted connection settings
/// - `filters`: compiled topic / group filters
/// - `logger`: instance-scoped logger honoring `log_level`
///
/// RETURNS:
/// - The engine handle, or the reason it could not be created.
///   The caller wraps failures into `ConfigError::EngineInitFailed`.
///
pub trait EngineFactory: Send + Sync {
    fn create(
        &self,
        options: &EngineOptions,
        filters: &Filters,
        logger: InstanceLogger,
    ) -> anyhow::Result<Box<dyn LagEngine>>;
}

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::OnceCell;

use crate::{
    config::InstanceConfig,
    engine::{EngineFactory, LagEngine},
    error::{CollectError, ConfigError},
    logger::InstanceLogger,
    options::{self, EngineOptions, Filters},
    sink::MetricSink,
    INPUT_NAME,
};

/// State that only exists after a successful `init`.
struct Active {
    options: EngineOptions,
    filters: Filters,
    logger: InstanceLogger,
    engine: Box<dyn LagEngine>,
}

/// One configured Kafka cluster.
///
/// Lifecycle:
/// - `init` validates the raw config and opens the engine (once)
/// - `collect_once` runs on every tick the scheduler finds it due
/// - `close` releases the engine (once; also done on drop)
///
/// The raw configuration is kept untouched for reporting; the
/// normalized options live next to the engine handle.
pub struct Instance {
    id: String,
    config: InstanceConfig,
    interval_times: u64,
    active: OnceCell<Active>,
    closed: AtomicBool,
}

impl Instance {
    pub fn new(index: usize, config: InstanceConfig) -> Self {
        let id = match config.kafka_uris.first().filter(|uri| !uri.is_empty()) {
            Some(uri) => format!("{INPUT_NAME}#{index}({uri})"),
            None => format!("{INPUT_NAME}#{index}"),
        };

        Self {
            id,
            interval_times: u64::try_from(config.interval_times).unwrap_or(0),
            config,
            active: OnceCell::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Identity used in every log line about this instance.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    /// Tick multiplier; 0 means every tick.
    pub fn interval_times(&self) -> u64 {
        self.interval_times
    }

    pub fn is_initialized(&self) -> bool {
        self.active.get().is_some()
    }

    /// Normalized options, available once `init` succeeded.
    pub fn options(&self) -> Option<&EngineOptions> {
        self.active.get().map(|a| &a.options)
    }

    pub fn filters(&self) -> Option<&Filters> {
        self.active.get().map(|a| &a.filters)
    }

    /// Validates the configuration and creates the engine handle.
    ///
    /// A second call on an initialized instance is a no-op.
    pub fn init(&self, factory: &dyn EngineFactory) -> Result<(), ConfigError> {
        self.active
            .get_or_try_init(|| -> Result<Active, ConfigError> {
                let normalized = options::normalize(&self.config)?;
                let logger = InstanceLogger::new(self.id.as_str(), normalized.log_level);

                let engine = factory
                    .create(&normalized.options, &normalized.filters, logger.clone())
                    .map_err(|e| ConfigError::EngineInitFailed(e.into()))?;

                logger.debug(format_args!(
                    "lag exporter ready (version {}, {} broker(s))",
                    normalized.options.kafka_version,
                    normalized.options.uris.len()
                ));

                Ok(Active {
                    options: normalized.options,
                    filters: normalized.filters,
                    logger,
                    engine,
                })
            })
            .map(|_| ())
    }

    /// Runs one scrape against the shared sink.
    ///
    /// Failures are logged through the instance logger and
    /// returned for the caller's bookkeeping; they are never fatal.
    pub async fn collect_once(&self, sink: &MetricSink) -> Result<(), CollectError> {
        let Some(active) = self.active.get() else {
            log::warn!(target: crate::logger::LOG_TARGET, "[{}] {}", self.id, CollectError::NotInitialized);
            return Err(CollectError::NotInitialized);
        };

        if let Err(e) = active.engine.collect(sink).await {
            let err = CollectError::from(e);
            active.logger.error(format_args!("{err}"));
            return Err(err);
        }

        Ok(())
    }

    /// Releases the engine handle.
    ///
    /// Only the first call reaches the engine. Instances that never
    /// initialized have nothing to release.
    pub fn close(&self) {
        let Some(active) = self.active.get() else {
            return;
        };

        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        active.engine.close();
        active.logger.debug(format_args!("lag exporter closed"));
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("interval_times", &self.interval_times)
            .field("initialized", &self.is_initialized())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

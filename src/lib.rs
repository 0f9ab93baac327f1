// ------------------------------------------------------------
// Module declarations
// ------------------------------------------------------------
//
// Scheduling and lifecycle core of the `kafka` metrics input.
//
// - config:    Raw per-instance settings loaded from JSON
// - options:   Validation and defaulting into engine options
// - engine:    Traits the external lag exporter implements
// - collector: Instances, the tick scheduler and the group
// - sink:      Shared, concurrent output list
// - schema:    Metric sample definition
// - logger:    Instance-scoped logger with verbosity filter
// - metrics:   Scheduler runtime counters
// - util:      Label encoding, level parsing, time helpers
//
// Typical host usage:
//
//     let group = Group::new(load_config("kafka.json")?, factory);
//     group.init()?;
//     loop { group.tick(&sink).await; /* host timer */ }
//     group.shutdown();
//
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod options;
pub mod schema;
pub mod sink;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

/// Name the input is registered under by the host.
pub const INPUT_NAME: &str = "kafka";

pub use collector::group::Group;
pub use collector::instance::Instance;
pub use config::{load_config, GroupConfig, InstanceConfig, SaslMechanism};
pub use engine::{EngineFactory, LagEngine};
pub use error::{CollectError, ConfigError};
pub use logger::InstanceLogger;
pub use options::{EngineOptions, Filters};
pub use schema::Sample;
pub use sink::MetricSink;

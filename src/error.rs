use thiserror::Error;

/// Boxed cause carried by errors raised inside collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ------------------------------------------------------------
// Configuration errors
// ------------------------------------------------------------
//
// Fatal. Any of these stops Group initialization and must be
// surfaced to the host, which must not start ticking.
//
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no kafka instances configured")]
    EmptyInstanceSet,

    #[error("kafka_uris must be specified")]
    MissingEndpoints,

    #[error("tls is enabled but key pair was not provided")]
    IncompleteTlsConfig,

    #[error("SASL is enabled but username or password was not provided")]
    IncompleteSaslConfig,

    #[error("zookeeper lag is enabled but no zookeeper uri was provided")]
    MissingZookeeperAddress,

    #[error("invalid {field} '{pattern}': {source}")]
    InvalidFilter {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid metadata_refresh_interval '{value}': {source}")]
    InvalidRefreshInterval {
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("could not instantiate kafka lag exporter: {0}")]
    EngineInitFailed(#[source] BoxError),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

// ------------------------------------------------------------
// Collection errors
// ------------------------------------------------------------
//
// Recoverable, scoped to one instance and one tick. These are
// logged where they happen and never escalate to the caller.
//
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to collect metrics: {0}")]
    Engine(#[source] BoxError),

    #[error("instance was never initialized")]
    NotInitialized,

    #[error("collection task panicked: {0}")]
    Panicked(String),

    #[error("collection task was cancelled")]
    Cancelled,
}

impl From<anyhow::Error> for CollectError {
    fn from(err: anyhow::Error) -> Self {
        CollectError::Engine(err.into())
    }
}

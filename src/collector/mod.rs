/// Collector module
///
/// This module groups all logic responsible for:
/// - Owning the configured Kafka instances
/// - Deciding which instances are due on a tick
/// - Running due instances in parallel and joining them
///
/// The collector layer sits between:
/// - The host, which drives ticks on its own timer
/// - The lag engines, which do the actual Kafka work
///
/// Design notes:
/// - Kafka-protocol logic MUST NOT live here
/// - `group` is the host-facing surface; `runner` holds the
///   per-tick fan-out; `instance` the per-cluster lifecycle
pub mod group;
pub mod instance;
pub mod runner;

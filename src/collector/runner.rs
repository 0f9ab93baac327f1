use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::{Id, JoinError, JoinSet};

use crate::{
    collector::instance::Instance,
    error::CollectError,
    logger::LOG_TARGET,
    metrics::RuntimeMetrics,
    sink::MetricSink,
};

/// Monotonic tick counter shared by every instance of a group.
///
/// Wraps at `u64::MAX` instead of failing.
#[derive(Debug, Default)]
pub struct TickCounter(AtomicU64);

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn starting_at(value: u64) -> Self {
        Self(AtomicU64::new(value))
    }

    /// Increments the counter and returns the new value.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }
}

/// Whether an instance with the given multiplier runs on `tick`.
///
/// A multiplier of 0 means every tick; it is never used as a divisor.
pub fn is_due(interval_times: u64, tick: u64) -> bool {
    interval_times == 0 || tick % interval_times == 0
}

/// Runs one tick over a fixed instance sequence.
///
/// This function:
/// - Spawns one task per due instance, in sequence order
/// - Skips instances that are not due, silently
/// - Waits for every spawned task before returning
///
/// GUARANTEES:
/// - No task outlives the call
/// - A panicking instance is logged and counted; its siblings
///   still run to completion
///
/// NOT RESPONSIBLE FOR:
/// - Logging engine errors (the instance does that)
/// - Timeouts (the engine or the host owns those)
///
pub async fn run_tick(
    instances: &[Arc<Instance>],
    tick: u64,
    sink: &MetricSink,
    metrics: &RuntimeMetrics,
) {
    let mut tasks = JoinSet::new();
    let mut owners: HashMap<Id, String> = HashMap::with_capacity(instances.len());

    for ins in instances {
        if !is_due(ins.interval_times(), tick) {
            log::debug!(target: LOG_TARGET, "[{}] not due on tick {}", ins.id(), tick);
            metrics.record_skip();
            continue;
        }

        let id = ins.id().to_string();
        let ins = Arc::clone(ins);
        let sink = sink.clone();

        let handle = tasks.spawn(async move { ins.collect_once(&sink).await });
        owners.insert(handle.id(), id);
        metrics.record_dispatch();
    }

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((_, Ok(()))) => {}

            // Already logged by the instance
            Ok((_, Err(_))) => metrics.record_failure(),

            Err(join_err) => {
                let owner = owners
                    .get(&join_err.id())
                    .map(String::as_str)
                    .unwrap_or("unknown instance");
                let err = task_fault(join_err);
                log::error!(target: LOG_TARGET, "[{owner}] {err}");
                metrics.record_failure();
                if matches!(err, CollectError::Panicked(_)) {
                    metrics.record_panic();
                }
            }
        }
    }
}

fn task_fault(err: JoinError) -> CollectError {
    if err.is_panic() {
        CollectError::Panicked(panic_message(err.into_panic()))
    } else {
        CollectError::Cancelled
    }
}

fn panic_message(payload: Box<dyn Any + Send + 'static>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

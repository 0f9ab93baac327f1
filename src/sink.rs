use std::sync::{Arc, Mutex, MutexGuard};

use crate::schema::Sample;

/// ============================================================
/// MetricSink
/// ============================================================
///
/// Append-only list shared by every instance task of a tick.
///
/// Design constraints:
/// - Cheap to clone (all clones append to the same list)
/// - Safe for concurrent writers
/// - A writer that panicked mid-push must not poison the sink
///   for its siblings
#[derive(Debug, Clone, Default)]
pub struct MetricSink {
    samples: Arc<Mutex<Vec<Sample>>>,
}

impl MetricSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Sample>> {
        self.samples.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, sample: Sample) {
        self.lock().push(sample);
    }

    pub fn push_batch(&self, samples: impl IntoIterator<Item = Sample>) {
        self.lock().extend(samples);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Takes every collected sample, leaving the sink empty.
    pub fn drain(&self) -> Vec<Sample> {
        std::mem::take(&mut *self.lock())
    }
}

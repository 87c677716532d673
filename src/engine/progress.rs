use tracing::{Level, event};

/// Observer for committed-chunk progress.
///
/// Called once per committed chunk with the running committed count and the
/// total chunk count of the run. Implementations must not block; the engine
/// ignores anything they do.
pub trait ProgressSink: Send + Sync {
    fn report(&self, committed: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn report(&self, committed: usize, total: usize) {
        self(committed, total)
    }
}

/// Emits one structured `tracing` event per committed chunk.
#[derive(Debug, Clone)]
pub struct TracingProgress {
    label: String,
}

impl TracingProgress {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for TracingProgress {
    fn default() -> Self {
        Self::new("batch")
    }
}

impl ProgressSink for TracingProgress {
    fn report(&self, committed: usize, total: usize) {
        event!(
            Level::INFO,
            label = %self.label,
            committed,
            total,
            "chunk committed"
        );
    }
}

/// Discards every observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _committed: usize, _total: usize) {}
}

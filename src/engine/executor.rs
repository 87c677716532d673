//! Sequential batch executor.
//!
//! Each chunk is handed to a [`ChunkApplier`] exactly once, strictly in input
//! order. The first failing chunk halts the run; nothing after it is
//! attempted and nothing before it is rolled back.

use super::partition::Chunk;
use super::progress::{NoProgress, ProgressSink};
use crate::core::StoreError;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Instrument, Level, event, info_span};

/// Commits one chunk as a single atomic request.
///
/// Implementations must either apply every intent in the chunk or none of
/// them, and must return (not hang) when the underlying call times out.
#[async_trait]
pub trait ChunkApplier: Send + Sync {
    async fn apply(&self, chunk: Chunk<'_>) -> std::result::Result<(), StoreError>;
}

/// Accounting for one engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub total_chunks: usize,
    pub attempted_chunks: usize,
    pub committed_chunks: usize,
    pub mutated_count: usize,
    /// Index of the chunk whose commit failed and halted the run.
    pub failed_chunk: Option<usize>,
    pub failure: Option<StoreError>,
    /// Set when the caller aborted before all chunks were submitted.
    pub aborted: bool,
}

impl RunResult {
    pub fn new(total_chunks: usize) -> Self {
        Self {
            total_chunks,
            ..Self::default()
        }
    }

    /// Every chunk was committed.
    pub fn is_complete(&self) -> bool {
        self.failed_chunk.is_none() && !self.aborted && self.committed_chunks == self.total_chunks
    }

    /// Position in the original intent sequence from which a manual resume
    /// should re-slice, or `None` if the run completed.
    pub fn resume_offset(&self, max_batch_size: usize) -> Option<usize> {
        if let Some(index) = self.failed_chunk {
            return Some(index * max_batch_size);
        }
        if self.aborted {
            return Some(self.committed_chunks * max_batch_size);
        }
        None
    }
}

/// Cooperative cancellation flag checked before each chunk is submitted.
///
/// The flag is sticky: once set, every later run sharing the handle stops
/// before its first chunk until [`AbortHandle::reset`] is called.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag so the next run can proceed.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct BatchExecutor {
    progress: Arc<dyn ProgressSink>,
    abort: AbortHandle,
}

impl BatchExecutor {
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoProgress),
            abort: AbortHandle::new(),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = abort;
        self
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Apply every chunk in order and return the accumulated result.
    ///
    /// Store failures are recorded in the returned [`RunResult`] rather than
    /// propagated, so callers always get the partial-progress counts.
    pub async fn execute<'a, I, A>(&self, chunks: I, applier: &A) -> RunResult
    where
        I: IntoIterator<Item = Chunk<'a>>,
        I::IntoIter: ExactSizeIterator,
        A: ChunkApplier + ?Sized,
    {
        let chunks = chunks.into_iter();
        let total = chunks.len();
        let span = info_span!("engine.execute", total_chunks = total);

        async move {
            let mut result = RunResult::new(total);

            for chunk in chunks {
                if self.abort.is_aborted() {
                    event!(
                        Level::WARN,
                        next_chunk = chunk.index(),
                        "run aborted before submitting chunk"
                    );
                    result.aborted = true;
                    break;
                }

                result.attempted_chunks += 1;
                match applier.apply(chunk).await {
                    Ok(()) => {
                        result.committed_chunks += 1;
                        result.mutated_count += chunk.len();
                        event!(
                            Level::DEBUG,
                            chunk = chunk.index(),
                            size = chunk.len(),
                            "chunk applied"
                        );
                        self.progress.report(result.committed_chunks, total);
                    }
                    Err(err) => {
                        event!(
                            Level::ERROR,
                            chunk = chunk.index(),
                            offset = chunk.offset(),
                            error = %err,
                            "chunk commit failed, halting run"
                        );
                        result.failed_chunk = Some(chunk.index());
                        result.failure = Some(err);
                        break;
                    }
                }
            }

            result
        }
        .instrument(span)
        .await
    }
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new()
    }
}

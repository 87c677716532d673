//! Batched bulk-mutation engine
//!
//! Data flows leaves-first:
//!
//! - `reconcile.rs` - keep/delete split of the live id set (cleanup only)
//! - `partition.rs` - positional chunking under the per-request cap
//! - `executor.rs` - sequential atomic commit of each chunk
//! - `progress.rs` - committed-chunk observers
//! - `verify.rs` - post-run count check and collection census

pub mod executor;
pub mod partition;
pub mod progress;
pub mod reconcile;
pub mod verify;

pub use executor::{AbortHandle, BatchExecutor, ChunkApplier, RunResult};
pub use partition::{Chunk, Chunks, DEFAULT_MAX_BATCH_SIZE, chunk_count, partition};
pub use progress::{NoProgress, ProgressSink, TracingProgress};
pub use reconcile::{Reconciliation, absent_keep_ids, reconcile};
pub use verify::{CollectionCensus, Outcome, PreservedListing, census, verify};

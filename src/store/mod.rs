//! Document store collaborators
//!
//! - `memory.rs` - in-process store with fault injection
//! - `file.rs` - JSON-file-backed store with atomic rewrites
//! - `timeout.rs` - wrapper bounding every call with a deadline
//! - `collection.rs` - ordered id-keyed document map shared by both stores

mod collection;
pub mod file;
pub mod memory;
pub mod timeout;

pub use file::JsonFileStore;
pub use memory::InMemoryDocumentStore;
pub use timeout::TimeoutStore;

use crate::core::{Document, Operation, StoreError};
use crate::engine::{Chunk, ChunkApplier};
use async_trait::async_trait;
use std::sync::Arc;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A remote collection of id-keyed documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Cheap connectivity check made before any real work.
    async fn probe(&self) -> StoreResult<()>;

    /// Every document id, in the store's iteration order.
    async fn get_all_ids(&self) -> StoreResult<Vec<String>>;

    async fn get_all(&self) -> StoreResult<Vec<(String, Document)>>;

    /// Apply `ops` as one atomic request: all take effect or none do.
    async fn commit_batch(&self, ops: &[Operation]) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<usize>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn probe(&self) -> StoreResult<()> {
        (**self).probe().await
    }

    async fn get_all_ids(&self) -> StoreResult<Vec<String>> {
        (**self).get_all_ids().await
    }

    async fn get_all(&self) -> StoreResult<Vec<(String, Document)>> {
        (**self).get_all().await
    }

    async fn commit_batch(&self, ops: &[Operation]) -> StoreResult<()> {
        (**self).commit_batch(ops).await
    }

    async fn count(&self) -> StoreResult<usize> {
        (**self).count().await
    }
}

/// Commits each chunk through [`DocumentStore::commit_batch`].
pub struct StoreCommitter<'s, S: ?Sized> {
    store: &'s S,
}

impl<'s, S: ?Sized> StoreCommitter<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> ChunkApplier for StoreCommitter<'_, S> {
    async fn apply(&self, chunk: Chunk<'_>) -> StoreResult<()> {
        let ops = chunk.to_operations();
        self.store.commit_batch(&ops).await
    }
}

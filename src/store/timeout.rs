use super::{DocumentStore, StoreResult};
use crate::core::{Document, Operation, StoreError};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Bounds every call on the inner store with a deadline.
///
/// An elapsed deadline surfaces as [`StoreError::Timeout`]. With no deadline
/// the wrapper is a pass-through.
pub struct TimeoutStore<S> {
    inner: S,
    limit: Option<Duration>,
}

impl<S: DocumentStore> TimeoutStore<S> {
    pub fn new(inner: S, limit: Option<Duration>) -> Self {
        Self { inner, limit }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    async fn bounded<T, F>(&self, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>> + Send,
    {
        match self.limit {
            Some(limit) => timeout(limit, call)
                .await
                .map_err(|_| StoreError::Timeout(limit))?,
            None => call.await,
        }
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for TimeoutStore<S> {
    async fn probe(&self) -> StoreResult<()> {
        self.bounded(self.inner.probe()).await
    }

    async fn get_all_ids(&self) -> StoreResult<Vec<String>> {
        self.bounded(self.inner.get_all_ids()).await
    }

    async fn get_all(&self) -> StoreResult<Vec<(String, Document)>> {
        self.bounded(self.inner.get_all()).await
    }

    async fn commit_batch(&self, ops: &[Operation]) -> StoreResult<()> {
        self.bounded(self.inner.commit_batch(ops)).await
    }

    async fn count(&self) -> StoreResult<usize> {
        self.bounded(self.inner.count()).await
    }
}

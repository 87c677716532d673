use super::collection::Collection;
use super::{DocumentStore, StoreResult};
use crate::core::{Document, Operation, StoreError};
use crate::engine::DEFAULT_MAX_BATCH_SIZE;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;

#[derive(Debug, Default)]
struct FaultPlan {
    /// 0-based commit attempts that fail with `Unavailable`.
    failing_commits: HashSet<usize>,
    fail_reads: bool,
    unreachable: bool,
}

/// In-process document store.
///
/// Enforces the same per-request operation cap as the remote store and can be
/// told to fail specific commits, which is how partial-failure runs are
/// exercised in tests.
pub struct InMemoryDocumentStore {
    collection: RwLock<Collection>,
    max_ops_per_commit: usize,
    commit_delay: Option<Duration>,
    faults: Mutex<FaultPlan>,
    commit_attempts: AtomicUsize,
    /// Sizes of accepted commits, in order.
    commit_log: Mutex<Vec<usize>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collection: RwLock::new(Collection::new()),
            max_ops_per_commit: DEFAULT_MAX_BATCH_SIZE,
            commit_delay: None,
            faults: Mutex::new(FaultPlan::default()),
            commit_attempts: AtomicUsize::new(0),
            commit_log: Mutex::new(Vec::new()),
        }
    }

    /// Pre-populate the store without going through `commit_batch`.
    pub fn with_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = (String, Document)>,
    {
        let mut collection = Collection::new();
        for (id, document) in documents {
            collection.set(id, document);
        }
        Self {
            collection: RwLock::new(collection),
            ..Self::new()
        }
    }

    /// Pre-populate with empty documents under the given ids.
    pub fn with_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_documents(ids.into_iter().map(|id| (id.into(), Document::new())))
    }

    pub fn max_ops_per_commit(mut self, limit: usize) -> Self {
        self.max_ops_per_commit = limit;
        self
    }

    /// Delay every commit, for exercising call deadlines.
    pub fn commit_delay(mut self, delay: Duration) -> Self {
        self.commit_delay = Some(delay);
        self
    }

    /// Make the `attempt`-th commit call (0-based) fail.
    pub fn fail_commit_at(&self, attempt: usize) -> StoreResult<()> {
        self.faults.lock()?.failing_commits.insert(attempt);
        Ok(())
    }

    pub fn fail_reads(&self, fail: bool) -> StoreResult<()> {
        self.faults.lock()?.fail_reads = fail;
        Ok(())
    }

    pub fn set_unreachable(&self, unreachable: bool) -> StoreResult<()> {
        self.faults.lock()?.unreachable = unreachable;
        Ok(())
    }

    pub fn commit_attempts(&self) -> usize {
        self.commit_attempts.load(Ordering::SeqCst)
    }

    pub fn commit_sizes(&self) -> StoreResult<Vec<usize>> {
        Ok(self.commit_log.lock()?.clone())
    }

    pub async fn get(&self, id: &str) -> Option<Document> {
        self.collection.read().await.get(id).cloned()
    }

    fn check_reachable(&self) -> StoreResult<()> {
        if self.faults.lock()?.unreachable {
            return Err(StoreError::Unavailable("store unreachable".to_string()));
        }
        Ok(())
    }

    fn check_read(&self) -> StoreResult<()> {
        self.check_reachable()?;
        if self.faults.lock()?.fail_reads {
            return Err(StoreError::Unavailable("read failed".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn probe(&self) -> StoreResult<()> {
        self.check_reachable()
    }

    async fn get_all_ids(&self) -> StoreResult<Vec<String>> {
        self.check_read()?;
        Ok(self.collection.read().await.ids())
    }

    async fn get_all(&self) -> StoreResult<Vec<(String, Document)>> {
        self.check_read()?;
        let collection = self.collection.read().await;
        Ok(collection
            .iter()
            .map(|(id, doc)| (id.to_string(), doc.clone()))
            .collect())
    }

    async fn commit_batch(&self, ops: &[Operation]) -> StoreResult<()> {
        let attempt = self.commit_attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.commit_delay {
            sleep(delay).await;
        }

        self.check_reachable()?;
        if self.faults.lock()?.failing_commits.contains(&attempt) {
            return Err(StoreError::Unavailable(format!(
                "commit attempt {} failed",
                attempt
            )));
        }
        if ops.len() > self.max_ops_per_commit {
            return Err(StoreError::BatchTooLarge {
                ops: ops.len(),
                limit: self.max_ops_per_commit,
            });
        }

        self.collection.write().await.apply(ops);
        self.commit_log.lock()?.push(ops.len());
        Ok(())
    }

    async fn count(&self) -> StoreResult<usize> {
        self.check_read()?;
        Ok(self.collection.read().await.len())
    }
}

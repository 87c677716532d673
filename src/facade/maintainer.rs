use crate::config::MaintenanceConfig;
use crate::core::{KeepSet, MutationIntent, Result};
use crate::engine::{
    AbortHandle, BatchExecutor, CollectionCensus, Outcome, ProgressSink, TracingProgress,
    Reconciliation, RunResult, absent_keep_ids, census, partition, reconcile, verify,
};
use crate::generator::{Category, ListingGenerator};
use crate::store::{DocumentStore, StoreCommitter, TimeoutStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{Instrument, Level, event, info_span};

/// Cleanup decision computed from the live collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
    pub total: usize,
    pub reconciliation: Reconciliation,
    /// Keep-list entries that are not in the store.
    pub absent_keep_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub expected: usize,
    pub observed: usize,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub plan: CleanupPlan,
    /// `None` when nothing needed deleting or the run was a dry run.
    pub run: Option<RunResult>,
    pub verification: Option<Verification>,
}

impl CleanupReport {
    pub fn halted(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.failed_chunk.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Documents present before seeding, all scheduled for deletion.
    pub cleared: usize,
    pub generated: BTreeMap<Category, usize>,
    pub run: Option<RunResult>,
    pub verification: Option<Verification>,
}

impl SeedReport {
    pub fn generated_total(&self) -> usize {
        self.generated.values().sum()
    }

    pub fn halted(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.failed_chunk.is_some())
    }
}

/// Runs cleanup, seeding and census against one injected store.
///
/// # Examples
///
/// ```
/// use listing_maint::{InMemoryDocumentStore, Maintainer, MaintenanceConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryDocumentStore::with_ids(["a", "b", "c", "d", "e"]);
/// let config = MaintenanceConfig::default().max_batch_size(2).keep_list(["b", "d"]);
///
/// let maintainer = Maintainer::new(store, config)?;
/// let report = maintainer.cleanup().await?;
/// assert_eq!(report.run.unwrap().mutated_count, 3);
/// # Ok(())
/// # }
/// ```
pub struct Maintainer<S: DocumentStore> {
    store: TimeoutStore<S>,
    config: MaintenanceConfig,
    progress: Arc<dyn ProgressSink>,
    abort: AbortHandle,
}

impl<S: DocumentStore> Maintainer<S> {
    pub fn new(store: S, config: MaintenanceConfig) -> Result<Self> {
        config.validate()?;
        let limit = config.commit_timeout_duration();
        Ok(Self {
            store: TimeoutStore::new(store, limit),
            config,
            progress: Arc::new(TracingProgress::default()),
            abort: AbortHandle::new(),
        })
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = abort;
        self
    }

    /// Handle that stops the current run before its next chunk.
    ///
    /// An abort stays in effect for later `cleanup` and `seed` calls until
    /// the handle is reset.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn config(&self) -> &MaintenanceConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        self.store.inner()
    }

    // ==================== Cleanup ====================

    /// Read the live ids and split them against the keep-list.
    pub async fn plan_cleanup(&self) -> Result<CleanupPlan> {
        self.config.validate_cleanup()?;
        let keep = self.config.keep_set();

        self.store.probe().await?;
        let all_ids = self.store.get_all_ids().await?;

        Ok(CleanupPlan {
            total: all_ids.len(),
            reconciliation: reconcile(&all_ids, &keep),
            absent_keep_ids: absent_keep_ids(&all_ids, &keep),
        })
    }

    /// Delete every document that is not on the keep-list.
    pub async fn cleanup(&self) -> Result<CleanupReport> {
        let span = info_span!("maintainer.cleanup", collection = %self.config.collection);
        self.run_cleanup().instrument(span).await
    }

    async fn run_cleanup(&self) -> Result<CleanupReport> {
        let plan = self.plan_cleanup().await?;
        event!(
            Level::INFO,
            total = plan.total,
            keep = plan.reconciliation.keep_ids.len(),
            delete = plan.reconciliation.delete_ids.len(),
            "cleanup planned"
        );
        if !plan.absent_keep_ids.is_empty() {
            event!(
                Level::WARN,
                absent = ?plan.absent_keep_ids,
                "keep-list ids not present in store"
            );
        }

        if !plan.reconciliation.has_deletions() {
            event!(Level::INFO, "nothing to delete");
            return Ok(CleanupReport { plan, run: None, verification: None });
        }
        if self.config.dry_run {
            event!(Level::INFO, "dry run, no deletions submitted");
            return Ok(CleanupReport { plan, run: None, verification: None });
        }

        let intents = plan.reconciliation.delete_intents();
        let run = self.run_intents(&intents).await?;
        let verification = self.verify_after(plan.total, &intents, &run).await;

        Ok(CleanupReport {
            plan,
            run: Some(run),
            verification,
        })
    }

    // ==================== Seeding ====================

    /// Replace the whole collection with freshly generated listings.
    pub async fn seed(&self) -> Result<SeedReport> {
        let span = info_span!("maintainer.seed", collection = %self.config.collection);
        self.run_seed().instrument(span).await
    }

    async fn run_seed(&self) -> Result<SeedReport> {
        self.config.validate_seed()?;

        let mut generator = match self.config.rng_seed {
            Some(seed) => ListingGenerator::seeded(seed),
            None => ListingGenerator::new(),
        };
        let mut generated = BTreeMap::new();
        let mut upserts = Vec::new();
        for &category in &self.config.categories {
            for _ in 0..self.config.count_per_category {
                let (id, document) = generator.listing_document(category);
                upserts.push(MutationIntent::upsert(id, document));
            }
            *generated.entry(category).or_insert(0) += self.config.count_per_category;
        }

        self.store.probe().await?;
        let existing = self.store.get_all_ids().await?;
        let clear = reconcile(&existing, &KeepSet::default());
        let cleared = clear.delete_ids.len();

        let mut intents = clear.delete_intents();
        intents.extend(upserts);
        event!(
            Level::INFO,
            cleared,
            generated = intents.len() - cleared,
            "seed planned"
        );

        if self.config.dry_run {
            event!(Level::INFO, "dry run, no mutations submitted");
            return Ok(SeedReport { cleared, generated, run: None, verification: None });
        }

        let run = self.run_intents(&intents).await?;
        let verification = self.verify_after(cleared, &intents, &run).await;

        Ok(SeedReport {
            cleared,
            generated,
            run: Some(run),
            verification,
        })
    }

    // ==================== Census ====================

    /// Per-category counts, plus which keep-list documents are present.
    pub async fn census(&self) -> Result<CollectionCensus> {
        let keep = self.config.keep_set();
        let documents = self.store.get_all().await?;
        Ok(census(
            documents.iter().map(|(id, doc)| (id.as_str(), doc)),
            &keep,
        ))
    }

    // ==================== Internals ====================

    async fn run_intents(&self, intents: &[MutationIntent]) -> Result<RunResult> {
        let chunks = partition(intents, self.config.max_batch_size)?;
        let executor = BatchExecutor::new()
            .with_progress(self.progress.clone())
            .with_abort(self.abort.clone());
        let committer = StoreCommitter::new(&self.store);

        let run = executor.execute(chunks, &committer).await;
        event!(
            Level::INFO,
            committed = run.committed_chunks,
            total = run.total_chunks,
            mutated = run.mutated_count,
            failed_chunk = ?run.failed_chunk,
            "run finished"
        );
        Ok(run)
    }

    /// Re-read the collection size and compare it with what the committed
    /// prefix of `intents` should have left behind.
    ///
    /// Verification is advisory: a failed re-read yields `None` and never
    /// replaces the run result.
    async fn verify_after(
        &self,
        baseline: usize,
        intents: &[MutationIntent],
        run: &RunResult,
    ) -> Option<Verification> {
        let expected = expected_remaining(baseline, &intents[..run.mutated_count]);

        let observed = match self.store.count().await {
            Ok(observed) => observed,
            Err(err) => {
                event!(
                    Level::WARN,
                    error = %err,
                    complete = run.is_complete(),
                    "count unavailable after run, skipping verification"
                );
                return None;
            }
        };

        let outcome = verify(expected, observed);
        match outcome {
            Outcome::Match => event!(Level::INFO, observed, "final count verified"),
            Outcome::Mismatch { delta } => {
                event!(Level::WARN, expected, observed, delta, "final count mismatch")
            }
        }

        Some(Verification {
            expected,
            observed,
            outcome,
        })
    }
}

/// Collection size after `applied` on a collection of `baseline` documents,
/// assuming deletes hit live ids and upserts create new ones.
fn expected_remaining(baseline: usize, applied: &[MutationIntent]) -> usize {
    applied.iter().fold(baseline, |count, intent| {
        if intent.is_delete() {
            count.saturating_sub(1)
        } else {
            count + 1
        }
    })
}

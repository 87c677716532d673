// ============================================================================
// listing-maint Library
// ============================================================================

//! Batched bulk maintenance for a document collection.
//!
//! The engine splits an ordered sequence of mutation intents into chunks no
//! larger than the store's per-request cap, commits them one after another,
//! and stops at the first failed chunk so an operator can resume from it.
//! [`Maintainer`] drives the two maintenance modes on top of it: keep-list
//! cleanup and full-collection reseeding.

pub mod config;
pub mod core;
pub mod engine;
pub mod facade;
pub mod generator;
pub mod store;

// Re-export main types for convenience
pub use config::MaintenanceConfig;
pub use core::{Document, KeepSet, MaintError, MutationIntent, Operation, Result, StoreError};
pub use engine::{
    AbortHandle, BatchExecutor, ChunkApplier, CollectionCensus, Outcome, ProgressSink,
    Reconciliation, RunResult, TracingProgress, partition, reconcile, verify,
};
pub use facade::{CleanupPlan, CleanupReport, Maintainer, SeedReport, Verification};
pub use generator::{Category, GeneratedListing, ListingGenerator};
pub use store::{DocumentStore, InMemoryDocumentStore, JsonFileStore, TimeoutStore};

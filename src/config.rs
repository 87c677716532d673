use crate::core::{KeepSet, MaintError, Result};
use crate::engine::DEFAULT_MAX_BATCH_SIZE;
use crate::generator::Category;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Maintenance run configuration
///
/// Every check here runs before the store is touched, so a bad value never
/// leaves partial side effects behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Target collection name
    pub collection: String,

    /// Operations per atomic request; must match the store's hard cap
    pub max_batch_size: usize,

    /// Ids exempt from deletion (cleanup mode)
    pub keep_list: Vec<String>,

    /// Categories to generate (seed mode)
    pub categories: Vec<Category>,

    /// Listings generated per category (seed mode)
    pub count_per_category: usize,

    /// Deadline for each store call, in milliseconds
    pub commit_timeout_ms: Option<u64>,

    /// Seed for reproducible generation
    pub rng_seed: Option<u64>,

    /// Plan only; never commit
    pub dry_run: bool,
}

impl MaintenanceConfig {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            keep_list: Vec::new(),
            categories: Category::ALL.to_vec(),
            count_per_category: 10,
            commit_timeout_ms: Some(30_000),
            rng_seed: None,
            dry_run: false,
        }
    }

    /// Set the per-request operation cap
    pub fn max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Set the keep-list
    pub fn keep_list<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_list = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the categories to seed
    pub fn categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// Set listings per category
    pub fn count_per_category(mut self, count: usize) -> Self {
        self.count_per_category = count;
        self
    }

    /// Set the store call deadline, rounded up to whole milliseconds
    pub fn commit_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_micros().div_ceil(1_000);
        self.commit_timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    /// Disable the store call deadline
    pub fn no_commit_timeout(mut self) -> Self {
        self.commit_timeout_ms = None;
        self
    }

    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn commit_timeout_duration(&self) -> Option<Duration> {
        self.commit_timeout_ms.map(Duration::from_millis)
    }

    pub fn keep_set(&self) -> KeepSet {
        KeepSet::new(self.keep_list.iter().cloned())
    }

    /// Load from a JSON file. Missing fields take their defaults; unknown
    /// category tags are configuration errors.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| {
            MaintError::config(format!("cannot read config '{}': {}", path.display(), err))
        })?;
        let config: Self = serde_json::from_slice(&bytes).map_err(|err| {
            MaintError::config(format!("invalid config '{}': {}", path.display(), err))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate settings shared by every mode
    pub fn validate(&self) -> Result<()> {
        if self.collection.is_empty() {
            return Err(MaintError::config("collection cannot be empty"));
        }

        if self.max_batch_size == 0 {
            return Err(MaintError::config("max_batch_size must be > 0"));
        }

        if self.commit_timeout_ms == Some(0) {
            return Err(MaintError::config("commit_timeout_ms must be > 0"));
        }

        Ok(())
    }

    /// Validate for a cleanup run
    pub fn validate_cleanup(&self) -> Result<()> {
        self.validate()?;

        if self.keep_list.is_empty() {
            return Err(MaintError::config("keep_list is required for cleanup"));
        }

        Ok(())
    }

    /// Validate for a seed run
    pub fn validate_seed(&self) -> Result<()> {
        self.validate()?;

        if self.categories.is_empty() {
            return Err(MaintError::config("categories are required for seeding"));
        }

        if self.count_per_category == 0 {
            return Err(MaintError::config("count_per_category must be > 0"));
        }

        Ok(())
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self::new("listings")
    }
}

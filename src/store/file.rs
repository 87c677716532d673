//! JSON-file-backed document store.
//!
//! The whole collection lives in one JSON file. Every commit builds the next
//! state in memory, writes it to a sibling temp file and renames it over the
//! original, so a batch is either fully on disk or not at all.
//!
//! A commit runs in its own task holding the state lock. A caller that stops
//! waiting (a deadline, a dropped future) cannot split the file from the
//! in-memory state; the next call waits until the commit has landed.

use super::collection::{Collection, StoredDocument};
use super::{DocumentStore, StoreResult};
use crate::core::{Document, Operation, StoreError};
use crate::engine::DEFAULT_MAX_BATCH_SIZE;
use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::sync::Mutex;
use tokio::time::sleep;

const FILE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CollectionFile {
    version: u32,
    collection: String,
    documents: Vec<StoredDocument>,
}

pub struct JsonFileStore {
    path: PathBuf,
    collection_name: String,
    max_ops_per_commit: usize,
    write_delay: Option<Duration>,
    state: Arc<Mutex<Collection>>,
}

impl JsonFileStore {
    /// Open the collection stored at `path`. A missing file is an empty
    /// collection; it is created on the first commit.
    pub async fn open(path: impl AsRef<Path>, collection_name: &str) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let collection = match fs::read(&path).await {
            Ok(bytes) => {
                let file: CollectionFile = serde_json::from_slice(&bytes)?;
                if file.version != FILE_FORMAT_VERSION {
                    return Err(StoreError::Rejected(format!(
                        "unsupported store file version {} in '{}'",
                        file.version,
                        path.display()
                    )));
                }
                if file.collection != collection_name {
                    return Err(StoreError::Rejected(format!(
                        "'{}' holds collection '{}', not '{}'",
                        path.display(),
                        file.collection,
                        collection_name
                    )));
                }
                Collection::from_records(file.documents)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Store file '{}' not found, starting with an empty '{}' collection",
                    path.display(),
                    collection_name
                );
                Collection::new()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            collection_name: collection_name.to_string(),
            max_ops_per_commit: DEFAULT_MAX_BATCH_SIZE,
            write_delay: None,
            state: Arc::new(Mutex::new(collection)),
        })
    }

    pub fn max_ops_per_commit(mut self, limit: usize) -> Self {
        self.max_ops_per_commit = limit;
        self
    }

    /// Delay every commit before its file write, for exercising call deadlines.
    pub fn write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn write_collection(path: &Path, name: &str, collection: &Collection) -> StoreResult<()> {
    let file = CollectionFile {
        version: FILE_FORMAT_VERSION,
        collection: name.to_string(),
        documents: collection.to_records(),
    };
    let bytes = serde_json::to_vec_pretty(&file)?;
    atomic_write(path, &bytes).await
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn probe(&self) -> StoreResult<()> {
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                match self.path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => {
                        fs::metadata(parent).await?;
                        Ok(())
                    }
                    _ => Ok(()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_all_ids(&self) -> StoreResult<Vec<String>> {
        Ok(self.state.lock().await.ids())
    }

    async fn get_all(&self) -> StoreResult<Vec<(String, Document)>> {
        let state = self.state.lock().await;
        Ok(state
            .iter()
            .map(|(id, doc)| (id.to_string(), doc.clone()))
            .collect())
    }

    async fn commit_batch(&self, ops: &[Operation]) -> StoreResult<()> {
        if ops.len() > self.max_ops_per_commit {
            return Err(StoreError::BatchTooLarge {
                ops: ops.len(),
                limit: self.max_ops_per_commit,
            });
        }

        let mut state = Arc::clone(&self.state).lock_owned().await;
        let path = self.path.clone();
        let name = self.collection_name.clone();
        let delay = self.write_delay;
        let ops = ops.to_vec();

        let commit = tokio::spawn(async move {
            let mut next = (*state).clone();
            next.apply(&ops);
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            let written = write_collection(&path, &name, &next).await;
            if written.is_ok() {
                *state = next;
            }
            written
        });

        commit
            .await
            .map_err(|err| StoreError::Unavailable(format!("commit task failed: {}", err)))?
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.state.lock().await.len())
    }
}

async fn atomic_write(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.map_err(|err| {
                StoreError::Io(format!(
                    "Failed to create parent directory '{}': {}",
                    parent.display(),
                    err
                ))
            })?;
        }
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).await.map_err(|err| {
        StoreError::Io(format!(
            "Failed to write temp file '{}': {}",
            tmp.display(),
            err
        ))
    })?;

    fs::rename(&tmp, path).await.map_err(|err| {
        StoreError::Io(format!(
            "Failed to rename temp file '{}' -> '{}': {}",
            tmp.display(),
            path.display(),
            err
        ))
    })?;
    Ok(())
}

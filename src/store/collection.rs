use crate::core::{Document, Operation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Id-keyed documents that iterate in first-insertion order.
///
/// Overwriting an existing id keeps its position; deleting a missing id is a
/// no-op, so repeated deletes are idempotent.
#[derive(Debug, Clone, Default)]
pub(crate) struct Collection {
    order: BTreeMap<u64, String>,
    documents: HashMap<String, (u64, Document)>,
    next_seq: u64,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn ids(&self) -> Vec<String> {
        self.order.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id).map(|(_, doc)| doc)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.order.values().filter_map(|id| {
            self.documents
                .get(id)
                .map(|(_, doc)| (id.as_str(), doc))
        })
    }

    pub fn set(&mut self, id: String, document: Document) {
        if let Some(entry) = self.documents.get_mut(&id) {
            entry.1 = document;
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, id.clone());
        self.documents.insert(id, (seq, document));
    }

    pub fn delete(&mut self, id: &str) -> bool {
        match self.documents.remove(id) {
            Some((seq, _)) => {
                self.order.remove(&seq);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, ops: &[Operation]) {
        for op in ops {
            match op {
                Operation::Delete { id } => {
                    self.delete(id);
                }
                Operation::Set { id, document } => self.set(id.clone(), document.clone()),
            }
        }
    }

    pub fn to_records(&self) -> Vec<StoredDocument> {
        self.iter()
            .map(|(id, doc)| StoredDocument {
                id: id.to_string(),
                fields: doc.clone(),
            })
            .collect()
    }

    pub fn from_records(records: Vec<StoredDocument>) -> Self {
        let mut collection = Self::new();
        for record in records {
            collection.set(record.id, record.fields);
        }
        collection
    }
}

/// On-disk form of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoredDocument {
    pub id: String,
    pub fields: Document,
}

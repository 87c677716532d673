use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A semi-structured record. Field order is preserved as inserted.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// One requested change to the target collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MutationIntent {
    Delete { id: String },
    Upsert { id: String, document: Document },
}

impl MutationIntent {
    pub fn delete(id: impl Into<String>) -> Self {
        Self::Delete { id: id.into() }
    }

    pub fn upsert(id: impl Into<String>, document: Document) -> Self {
        Self::Upsert {
            id: id.into(),
            document,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Delete { id } | Self::Upsert { id, .. } => id,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }
}

/// Store-level operation inside a single atomic commit.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Delete { id: String },
    Set { id: String, document: Document },
}

impl Operation {
    pub fn id(&self) -> &str {
        match self {
            Self::Delete { id } | Self::Set { id, .. } => id,
        }
    }
}

impl From<&MutationIntent> for Operation {
    fn from(intent: &MutationIntent) -> Self {
        match intent {
            MutationIntent::Delete { id } => Operation::Delete { id: id.clone() },
            MutationIntent::Upsert { id, document } => Operation::Set {
                id: id.clone(),
                document: document.clone(),
            },
        }
    }
}

/// Identifiers exempt from deletion during a cleanup run.
///
/// Built once before the run starts and never mutated afterwards. Duplicate
/// ids in the input collapse to their first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepSet {
    ordered: Vec<String>,
    members: HashSet<String>,
}

impl KeepSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut members = HashSet::new();
        for id in ids {
            let id = id.into();
            if members.insert(id.clone()) {
                ordered.push(id);
            }
        }
        Self { ordered, members }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Ids in the order the operator supplied them.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for KeepSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keep_set_dedupes_preserving_order() {
        let keep = KeepSet::new(["b", "a", "b", "c"]);
        assert_eq!(keep.len(), 3);
        assert_eq!(keep.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert!(keep.contains("a"));
        assert!(!keep.contains("z"));
    }

    #[test]
    fn test_intent_to_operation() {
        let mut doc = Document::new();
        doc.insert("title".to_string(), json!("Bike"));

        let op = Operation::from(&MutationIntent::upsert("x1", doc.clone()));
        assert_eq!(op, Operation::Set { id: "x1".to_string(), document: doc });

        let op = Operation::from(&MutationIntent::delete("x2"));
        assert_eq!(op.id(), "x2");
    }

    #[test]
    fn test_intent_serde_tagging() {
        let intent = MutationIntent::delete("abc");
        let encoded = serde_json::to_value(&intent).unwrap();
        assert_eq!(encoded, json!({"op": "delete", "id": "abc"}));
    }
}

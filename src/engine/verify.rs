use crate::core::{Document, KeepSet};
use std::collections::BTreeMap;
use std::fmt;

/// Result of comparing the observed collection size with the expected one.
///
/// A mismatch is advisory: concurrent external writers can change the count
/// between the last commit and the re-read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Match,
    /// `delta` is `observed - expected`.
    Mismatch { delta: i64 },
}

impl Outcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::Mismatch { delta } => write!(f, "mismatch (delta {delta:+})"),
        }
    }
}

pub fn verify(expected_remaining: usize, observed_count: usize) -> Outcome {
    if expected_remaining == observed_count {
        return Outcome::Match;
    }
    Outcome::Mismatch {
        delta: observed_count as i64 - expected_remaining as i64,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreservedListing {
    pub id: String,
    pub title: String,
    pub category: String,
}

/// Per-category breakdown of a collection plus the kept documents found in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionCensus {
    pub total: usize,
    pub per_category: BTreeMap<String, usize>,
    pub preserved: Vec<PreservedListing>,
}

const UNKNOWN_CATEGORY: &str = "unknown";
const UNTITLED: &str = "No title";

pub fn census<'a, I>(documents: I, keep: &KeepSet) -> CollectionCensus
where
    I: IntoIterator<Item = (&'a str, &'a Document)>,
{
    let mut out = CollectionCensus::default();

    for (id, document) in documents {
        out.total += 1;
        let category = text_field(document, "category").unwrap_or(UNKNOWN_CATEGORY);
        *out.per_category.entry(category.to_string()).or_insert(0) += 1;

        if keep.contains(id) {
            out.preserved.push(PreservedListing {
                id: id.to_string(),
                title: text_field(document, "title").unwrap_or(UNTITLED).to_string(),
                category: category.to_string(),
            });
        }
    }

    out
}

fn text_field<'d>(document: &'d Document, field: &str) -> Option<&'d str> {
    document.get(field).and_then(|v| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_verify() {
        assert_eq!(verify(2, 2), Outcome::Match);
        assert_eq!(verify(2, 5), Outcome::Mismatch { delta: 3 });
        assert_eq!(verify(4, 1), Outcome::Mismatch { delta: -3 });
        assert_eq!(verify(4, 1).to_string(), "mismatch (delta -3)");
    }

    #[test]
    fn test_census_counts_and_preserved() {
        let docs = vec![
            ("a".to_string(), doc(json!({"category": "vehicles", "title": "Civic"}))),
            ("b".to_string(), doc(json!({"category": "vehicles"}))),
            ("c".to_string(), doc(json!({"title": "Loose"}))),
        ];
        let keep = KeepSet::new(["a", "c", "zz"]);

        let report = census(docs.iter().map(|(id, d)| (id.as_str(), d)), &keep);
        assert_eq!(report.total, 3);
        assert_eq!(report.per_category.get("vehicles"), Some(&2));
        assert_eq!(report.per_category.get("unknown"), Some(&1));
        assert_eq!(report.preserved.len(), 2);
        assert_eq!(report.preserved[0].title, "Civic");
        assert_eq!(report.preserved[1].category, "unknown");
    }
}

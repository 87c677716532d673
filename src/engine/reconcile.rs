use crate::core::{KeepSet, MutationIntent};
use std::collections::HashSet;

/// Split of the live id set against a keep-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Live ids that are on the keep-list, in observed order.
    pub keep_ids: Vec<String>,
    /// Live ids that are not on the keep-list, in observed order.
    pub delete_ids: Vec<String>,
}

impl Reconciliation {
    pub fn has_deletions(&self) -> bool {
        !self.delete_ids.is_empty()
    }

    pub fn delete_intents(&self) -> Vec<MutationIntent> {
        self.delete_ids.iter().cloned().map(MutationIntent::delete).collect()
    }
}

/// Partition `all_ids` into kept and deleted ids.
///
/// The observed order of `all_ids` is preserved in both halves so that an
/// unchanged store always produces the same chunk boundaries. Repeated ids in
/// `all_ids` are counted once. Keep-list entries missing from the store are
/// ignored.
pub fn reconcile<S: AsRef<str>>(all_ids: &[S], keep: &KeepSet) -> Reconciliation {
    let mut seen = HashSet::with_capacity(all_ids.len());
    let mut out = Reconciliation::default();

    for id in all_ids {
        let id = id.as_ref();
        if !seen.insert(id) {
            continue;
        }
        if keep.contains(id) {
            out.keep_ids.push(id.to_string());
        } else {
            out.delete_ids.push(id.to_string());
        }
    }

    out
}

/// Keep-list entries with no matching live document.
pub fn absent_keep_ids<S: AsRef<str>>(all_ids: &[S], keep: &KeepSet) -> Vec<String> {
    let live: HashSet<&str> = all_ids.iter().map(AsRef::as_ref).collect();
    keep.iter()
        .filter(|id| !live.contains(id))
        .map(str::to_string)
        .collect()
}

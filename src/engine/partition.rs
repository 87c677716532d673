//! Positional chunking of a mutation sequence.
//!
//! Chunk `k` covers indices `[k * max, min((k + 1) * max, len))`. Boundaries
//! depend only on the input length and the cap, so re-partitioning the same
//! sequence always yields the same chunks.

use crate::core::{MaintError, MutationIntent, Operation, Result};
use std::iter::{Enumerate, FusedIterator};
use std::slice;

/// Store-imposed cap on operations per atomic request.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;

/// Contiguous, order-preserving slice of the input sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk<'a> {
    index: usize,
    offset: usize,
    intents: &'a [MutationIntent],
}

impl<'a> Chunk<'a> {
    /// Position of this chunk in the run (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the first intent of this chunk in the original sequence.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn intents(&self) -> &'a [MutationIntent] {
        self.intents
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'a, MutationIntent> {
        self.intents.iter()
    }

    pub fn to_operations(&self) -> Vec<Operation> {
        self.intents.iter().map(Operation::from).collect()
    }
}

/// Lazy, single-pass chunk sequence produced by [`partition`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    inner: Enumerate<slice::Chunks<'a, MutationIntent>>,
    max_batch_size: usize,
}

impl<'a> Chunks<'a> {
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, intents) = self.inner.next()?;
        Some(Chunk {
            index,
            offset: index * self.max_batch_size,
            intents,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Chunks<'_> {}

impl FusedIterator for Chunks<'_> {}

/// Split `intents` into chunks of at most `max_batch_size` entries.
///
/// Fails with a configuration error when `max_batch_size` is zero. An empty
/// input yields an empty sequence.
pub fn partition(intents: &[MutationIntent], max_batch_size: usize) -> Result<Chunks<'_>> {
    if max_batch_size == 0 {
        return Err(MaintError::config("max_batch_size must be >= 1"));
    }

    Ok(Chunks {
        inner: intents.chunks(max_batch_size).enumerate(),
        max_batch_size,
    })
}

/// Number of chunks `len` intents split into under `max_batch_size`.
pub fn chunk_count(len: usize, max_batch_size: usize) -> usize {
    if max_batch_size == 0 {
        return 0;
    }
    len.div_ceil(max_batch_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deletes(n: usize) -> Vec<MutationIntent> {
        (0..n).map(|i| MutationIntent::delete(format!("id-{i}"))).collect()
    }

    #[test]
    fn test_zero_batch_size_is_config_error() {
        let intents = deletes(3);
        let err = partition(&intents, 0).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_chunk_sizes_and_offsets() {
        let intents = deletes(1200);
        let chunks: Vec<_> = partition(&intents, 500).unwrap().collect();

        let sizes: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(sizes, vec![500, 500, 200]);

        let offsets: Vec<usize> = chunks.iter().map(Chunk::offset).collect();
        assert_eq!(offsets, vec![0, 500, 1000]);
        assert_eq!(chunks[2].index(), 2);
        assert_eq!(chunks[2].intents()[0].id(), "id-1000");
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        for len in [1usize, 2, 7, 10, 11] {
            for max in 1..=12 {
                let intents = deletes(len);
                let chunks: Vec<_> = partition(&intents, max).unwrap().collect();

                let rebuilt: Vec<MutationIntent> =
                    chunks.iter().flat_map(|c| c.iter().cloned()).collect();
                assert_eq!(rebuilt, intents, "len={len} max={max}");

                assert!(chunks.iter().all(|c| c.len() <= max && !c.is_empty()));
                let short = chunks.iter().filter(|c| c.len() < max).count();
                assert!(short <= 1);
                if short == 1 {
                    assert!(chunks.last().unwrap().len() < max);
                }
            }
        }
    }

    #[test]
    fn test_exact_size_matches_chunk_count() {
        let intents = deletes(11);
        let chunks = partition(&intents, 4).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunk_count(11, 4), 3);
        assert_eq!(chunk_count(0, 4), 0);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunks = partition(&[], 500).unwrap();
        assert_eq!(chunks.count(), 0);
    }

    #[test]
    fn test_chunk_to_operations_preserves_order() {
        let intents = deletes(3);
        let chunk = partition(&intents, 3).unwrap().next().unwrap();
        let ids: Vec<String> = chunk
            .to_operations()
            .iter()
            .map(|op| op.id().to_string())
            .collect();
        assert_eq!(ids, vec!["id-0", "id-1", "id-2"]);
    }
}

//! Sequential chunked submission.
//!
//! [`run_batches`] splits an ordered slice into consecutive chunks and hands
//! them to an async handler one at a time, awaiting each before starting the
//! next. Chunk outcomes are independent: a chunk the handler reports as
//! [`ChunkOutcome::Failed`] does not stop the remaining chunks. Only a
//! handler `Err` (a local failure the caller must see) ends the batch early.
//!
//! The batcher is runtime-agnostic; it never spawns and never sleeps.

use std::future::Future;

/// What happened to a single chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// The remote side accepted the chunk and the result was committed locally.
    Committed,
    /// The remote call failed; nothing was committed for this chunk.
    Failed,
}

/// Tally of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Chunks handed to the handler.
    pub chunks: usize,
    /// Chunks that committed.
    pub committed: usize,
    /// Chunks that failed.
    pub failed: usize,
    /// Items in committed chunks.
    pub items_committed: usize,
    /// Items in failed chunks.
    pub items_failed: usize,
}

impl BatchReport {
    /// True when no chunk failed (including the empty batch).
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Number of chunks `len` items split into at chunk size `max`.
///
/// A `max` of zero is treated as one.
pub fn chunk_count(len: usize, max: usize) -> usize {
    len.div_ceil(max.max(1))
}

/// Drive `handler` over `items` in chunks of at most `max`.
///
/// - empty `items`: the handler is never called
/// - `items.len() <= max`: one call with the whole slice
/// - otherwise `chunk_count(len, max)` calls, in order, the last possibly short
pub async fn run_batches<'a, T, E, F, Fut>(
    items: &'a [T],
    max: usize,
    mut handler: F,
) -> Result<BatchReport, E>
where
    F: FnMut(&'a [T]) -> Fut,
    Fut: Future<Output = Result<ChunkOutcome, E>>,
{
    let mut report = BatchReport::default();

    for chunk in items.chunks(max.max(1)) {
        report.chunks += 1;
        match handler(chunk).await? {
            ChunkOutcome::Committed => {
                report.committed += 1;
                report.items_committed += chunk.len();
            }
            ChunkOutcome::Failed => {
                report.failed += 1;
                report.items_failed += chunk.len();
            }
        }
    }

    Ok(report)
}

//! Memory-target re-chunking of merged rounds.

use crate::merge::MergeIterator;
use std::mem;
use tickstream_core::{Record, Result};

/// Re-batches `MergeIterator` rounds into chunks near a byte-size target.
///
/// Rounds are accumulated whole; once the running size estimate reaches the
/// target the accumulation is yielded and reset. The bound is soft: a single
/// oversized round can push a chunk past the target, and rounds are never
/// split. Any residual accumulation is flushed once at end of stream.
pub struct ChunkAccumulator {
    rounds: MergeIterator,
    target_bytes: usize,
    buffer: Vec<Record>,
    buffer_bytes: usize,
    done: bool,
}

impl ChunkAccumulator {
    /// Wrap a merge with a soft `target_bytes` chunk size.
    pub fn new(rounds: MergeIterator, target_bytes: usize) -> Self {
        Self {
            rounds,
            target_bytes,
            buffer: Vec::new(),
            buffer_bytes: 0,
            done: false,
        }
    }
}

impl Iterator for ChunkAccumulator {
    type Item = Result<Vec<Record>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.rounds.next() {
                Some(Ok(round)) => {
                    self.buffer_bytes += round.iter().map(Record::size_estimate).sum::<usize>();
                    self.buffer.extend(round);
                    if self.buffer_bytes >= self.target_bytes {
                        self.buffer_bytes = 0;
                        return Some(Ok(mem::take(&mut self.buffer)));
                    }
                }
                Some(Err(e)) => {
                    // No partial recovery: drop the accumulation with the run.
                    self.done = true;
                    self.buffer.clear();
                    self.buffer_bytes = 0;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    if self.buffer.is_empty() {
                        return None;
                    }
                    self.buffer_bytes = 0;
                    return Some(Ok(mem::take(&mut self.buffer)));
                }
            }
        }
    }
}

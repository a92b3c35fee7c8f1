//! Watermark-driven k-way merge across buffered sources.

use crate::buffer::StreamingBuffer;
use tickstream_core::{Record, Result, TimestampNs};
use tracing::trace;

/// Merges N `StreamingBuffer`s into globally time-ordered chunks.
///
/// Each `next()` runs one watermark round: top up every active buffer, drop
/// completed ones, compute the watermark (the minimum over each non-empty
/// buffer's maximum buffered timestamp), drain every buffer up to it, and
/// k-way merge the drained chunks. The watermark is safe because every
/// source is internally non-decreasing: no source can later produce a record
/// below a timestamp it has already buffered past.
///
/// A live buffer whose window is transiently empty after `add_data()` is
/// excluded from the watermark for that round; the `BatchSource` contract
/// (each successful pull contributes at least one record while data remains)
/// keeps this from reordering output. When every active window is empty the
/// round re-pulls instead of emitting.
///
/// Records with equal `ts_init` are emitted in buffer construction order,
/// which callers fix ahead of time for deterministic cross-source ties.
pub struct MergeIterator {
    buffers: Vec<StreamingBuffer>,
}

impl MergeIterator {
    /// Create a merge over buffers; their order is the tie-break order.
    pub fn new(buffers: Vec<StreamingBuffer>) -> Self {
        Self { buffers }
    }

    /// Number of sources still active.
    pub fn active_sources(&self) -> usize {
        self.buffers.len()
    }
}

impl Iterator for MergeIterator {
    type Item = Result<Vec<Record>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for buffer in &mut self.buffers {
                if let Err(e) = buffer.add_data() {
                    // A decode failure aborts the whole run.
                    self.buffers.clear();
                    return Some(Err(e));
                }
            }

            self.buffers.retain(|b| !b.is_complete());
            if self.buffers.is_empty() {
                return None;
            }

            let watermark = match self
                .buffers
                .iter()
                .filter_map(StreamingBuffer::max_timestamp)
                .min()
            {
                Some(ts) => ts,
                // Every active window is empty but no source is exhausted;
                // pull again rather than terminating early.
                None => continue,
            };

            let chunks: Vec<Vec<Record>> = self
                .buffers
                .iter_mut()
                .map(|b| b.remove_front(watermark))
                .filter(|chunk| !chunk.is_empty())
                .collect();

            // Should not occur: the watermark equals some buffer's max, so
            // that buffer always drains at least one record.
            if chunks.is_empty() {
                return None;
            }

            trace!(
                watermark,
                sources = self.buffers.len(),
                chunks = chunks.len(),
                "watermark round"
            );

            return Some(Ok(merge_chunks(chunks)));
        }
    }
}

/// Stable k-way merge of individually ascending chunks, keyed by `ts_init`.
/// Ties go to the lowest chunk index (i.e. earliest buffer in the set).
fn merge_chunks(chunks: Vec<Vec<Record>>) -> Vec<Record> {
    if chunks.len() == 1 {
        return chunks.into_iter().next().unwrap_or_default();
    }

    let total: usize = chunks.iter().map(Vec::len).sum();
    let mut iters: Vec<std::vec::IntoIter<Record>> =
        chunks.into_iter().map(Vec::into_iter).collect();
    let mut heads: Vec<Option<Record>> = iters.iter_mut().map(Iterator::next).collect();
    let mut merged = Vec::with_capacity(total);

    loop {
        let mut best: Option<(TimestampNs, usize)> = None;
        for (i, head) in heads.iter().enumerate() {
            if let Some(record) = head {
                let ts = record.ts_init();
                // Strict `<` keeps the earliest buffer on ties.
                if best.map_or(true, |(best_ts, _)| ts < best_ts) {
                    best = Some((ts, i));
                }
            }
        }
        let Some((_, i)) = best else { break };
        if let Some(record) = heads[i].take() {
            merged.push(record);
        }
        heads[i] = iters[i].next();
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_trade_for, FailingSource, VecBatchSource};
    use crate::time_filter::TimeRangeFilter;

    fn buffer_over(timestamps: &[i64], batch_size: usize, capacity: usize) -> StreamingBuffer {
        let source = VecBatchSource::from_timestamps(timestamps, batch_size);
        StreamingBuffer::new(TimeRangeFilter::new(Box::new(source), None, None), capacity)
    }

    fn flatten(merge: MergeIterator) -> Vec<i64> {
        let mut out = Vec::new();
        for round in merge {
            out.extend(round.unwrap().iter().map(Record::ts_init));
        }
        out
    }

    #[test]
    fn test_two_source_merge() {
        let a = buffer_over(&[100, 200, 300, 400], 10, 10);
        let b = buffer_over(&[150, 250, 350], 10, 10);
        let merged = flatten(MergeIterator::new(vec![a, b]));
        assert_eq!(merged, vec![100, 150, 200, 250, 300, 350, 400]);
    }

    #[test]
    fn test_single_source_identity() {
        let ts: Vec<i64> = (0..1000).collect();
        let buffer = buffer_over(&ts, 64, 128);
        assert_eq!(flatten(MergeIterator::new(vec![buffer])), ts);
    }

    #[test]
    fn test_output_non_decreasing_across_many_sources() {
        let a = buffer_over(&(0..300).step_by(3).collect::<Vec<_>>(), 7, 20);
        let b = buffer_over(&(1..300).step_by(5).collect::<Vec<_>>(), 11, 15);
        let c = buffer_over(&(2..300).step_by(2).collect::<Vec<_>>(), 4, 9);
        let merged = flatten(MergeIterator::new(vec![a, b, c]));
        assert!(merged.windows(2).all(|w| w[0] <= w[1]));
        let expected: usize = (0..300).step_by(3).count()
            + (1..300).step_by(5).count()
            + (2..300).step_by(2).count();
        assert_eq!(merged.len(), expected);
    }

    #[test]
    fn test_tie_break_follows_buffer_order() {
        let first = StreamingBuffer::new(
            TimeRangeFilter::new(
                Box::new(VecBatchSource::new(vec![vec![
                    make_trade_for(100, "AAA"),
                    make_trade_for(200, "AAA"),
                ]])),
                None,
                None,
            ),
            10,
        );
        let second = StreamingBuffer::new(
            TimeRangeFilter::new(
                Box::new(VecBatchSource::new(vec![vec![
                    make_trade_for(100, "BBB"),
                    make_trade_for(200, "BBB"),
                ]])),
                None,
                None,
            ),
            10,
        );

        let mut instruments = Vec::new();
        for round in MergeIterator::new(vec![first, second]) {
            for record in round.unwrap() {
                if let Record::Trade(t) = record {
                    instruments.push((t.ts_init, t.instrument_id));
                }
            }
        }
        assert_eq!(
            instruments,
            vec![
                (100, "AAA".to_string()),
                (100, "BBB".to_string()),
                (200, "AAA".to_string()),
                (200, "BBB".to_string()),
            ]
        );
    }

    #[test]
    fn test_throttled_buffer_keeps_merge_correct() {
        // Tiny capacities force batch boundaries to coincide with throttle
        // points; output must still be a correct total merge.
        let a = buffer_over(&(0..100).step_by(2).collect::<Vec<_>>(), 2, 2);
        let b = buffer_over(&(1..100).step_by(2).collect::<Vec<_>>(), 3, 2);
        let merged = flatten(MergeIterator::new(vec![a, b]));
        assert_eq!(merged, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_terminates_when_all_sources_exhausted() {
        let a = buffer_over(&[], 10, 10);
        let b = buffer_over(&[1], 10, 10);
        let mut merge = MergeIterator::new(vec![a, b]);
        assert_eq!(
            merge.next().unwrap().unwrap().first().map(Record::ts_init),
            Some(1)
        );
        assert!(merge.next().is_none());
        assert_eq!(merge.active_sources(), 0);
    }

    #[test]
    fn test_decode_error_aborts_run() {
        let failing = StreamingBuffer::new(
            TimeRangeFilter::new(
                Box::new(FailingSource::new(vec![vec![make_trade_for(1, "AAA")]])),
                None,
                None,
            ),
            // Capacity 1 so the good batch is drained before the bad pull.
            1,
        );
        let healthy = buffer_over(&[2, 3], 10, 10);
        let mut merge = MergeIterator::new(vec![failing, healthy]);

        let first = merge.next().unwrap().unwrap();
        assert_eq!(first.first().map(Record::ts_init), Some(1));

        match merge.next() {
            Some(Err(tickstream_core::Error::Decode(_))) => {}
            other => panic!("expected decode error, got {other:?}"),
        }
        assert!(merge.next().is_none());
    }
}

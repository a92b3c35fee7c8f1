//! Bounded per-source sliding window with exhaustion tracking.

use crate::time_filter::TimeRangeFilter;
use tickstream_core::{Record, Result, TimestampNs};

/// A capacity-throttled window over one filtered source.
///
/// The window is always ascending in `ts_init` because the source guarantees
/// ascending batches and records are only ever appended. The `MergeIterator`
/// is the sole caller of every mutating method.
pub struct StreamingBuffer {
    filter: TimeRangeFilter,
    window: Vec<Record>,
    exhausted: bool,
    capacity: usize,
}

impl StreamingBuffer {
    /// Create a buffer over `filter` holding at most ~`capacity` records
    /// before throttling further pulls.
    pub fn new(filter: TimeRangeFilter, capacity: usize) -> Self {
        Self {
            filter,
            window: Vec::with_capacity(capacity),
            exhausted: false,
            capacity,
        }
    }

    /// Top up the window with one batch, unless already at capacity.
    ///
    /// At or above capacity this is a no-op: the buffer already holds enough
    /// data ahead of any achievable watermark. A drained source flips
    /// `exhausted` instead of appending.
    pub fn add_data(&mut self) -> Result<()> {
        if self.window.len() >= self.capacity {
            return Ok(());
        }
        match self.filter.next_batch() {
            None => self.exhausted = true,
            Some(batch) => self.window.extend(batch?),
        }
        Ok(())
    }

    /// Remove and return, in order, all leading records with `ts_init <= ts`.
    pub fn remove_front(&mut self, ts: TimestampNs) -> Vec<Record> {
        let cut = self.window.partition_point(|r| r.ts_init() <= ts);
        self.window.drain(..cut).collect()
    }

    /// Highest buffered timestamp; `None` iff the window is empty.
    pub fn max_timestamp(&self) -> Option<TimestampNs> {
        self.window.last().map(Record::ts_init)
    }

    /// True once the source is drained and the window fully consumed.
    pub fn is_complete(&self) -> bool {
        self.exhausted && self.window.is_empty()
    }

    /// Number of records currently buffered.
    pub fn pending_records(&self) -> usize {
        self.window.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::VecBatchSource;

    fn make_buffer(timestamps: &[i64], batch_size: usize, capacity: usize) -> StreamingBuffer {
        let source = VecBatchSource::from_timestamps(timestamps, batch_size);
        let filter = TimeRangeFilter::new(Box::new(source), None, None);
        StreamingBuffer::new(filter, capacity)
    }

    #[test]
    fn test_add_data_appends_one_batch() {
        let mut buffer = make_buffer(&(0..10).collect::<Vec<_>>(), 4, 100);
        buffer.add_data().unwrap();
        assert_eq!(buffer.pending_records(), 4);
        buffer.add_data().unwrap();
        assert_eq!(buffer.pending_records(), 8);
    }

    #[test]
    fn test_add_data_throttles_at_capacity() {
        let mut buffer = make_buffer(&(0..100).collect::<Vec<_>>(), 5, 5);
        buffer.add_data().unwrap();
        assert_eq!(buffer.pending_records(), 5);
        // At capacity: the source must not be pulled again.
        buffer.add_data().unwrap();
        assert_eq!(buffer.pending_records(), 5);
        assert!(!buffer.is_complete());
    }

    #[test]
    fn test_window_never_exceeds_capacity_with_unit_batches() {
        let ts: Vec<i64> = (0..50).collect();
        let mut buffer = make_buffer(&ts, 1, 10);
        for _ in 0..50 {
            buffer.add_data().unwrap();
            assert!(buffer.pending_records() <= 10);
        }
    }

    #[test]
    fn test_exhaustion_and_completion() {
        let mut buffer = make_buffer(&[1, 2, 3], 10, 100);
        buffer.add_data().unwrap();
        assert!(!buffer.is_complete());
        buffer.add_data().unwrap();
        assert!(buffer.exhausted);
        assert!(!buffer.is_complete());
        let removed = buffer.remove_front(3);
        assert_eq!(removed.len(), 3);
        assert!(buffer.is_complete());
    }

    #[test]
    fn test_remove_front_inclusive() {
        let mut buffer = make_buffer(&[10, 20, 20, 30, 40], 10, 100);
        buffer.add_data().unwrap();
        let removed = buffer.remove_front(20);
        let removed_ts: Vec<i64> = removed.iter().map(Record::ts_init).collect();
        assert_eq!(removed_ts, vec![10, 20, 20]);
        assert_eq!(buffer.pending_records(), 2);
        assert_eq!(buffer.max_timestamp(), Some(40));
    }

    #[test]
    fn test_remove_front_before_window_is_empty() {
        let mut buffer = make_buffer(&[10, 20, 30], 10, 100);
        buffer.add_data().unwrap();
        assert!(buffer.remove_front(5).is_empty());
        assert_eq!(buffer.pending_records(), 3);
    }

    #[test]
    fn test_max_timestamp_empty_window() {
        let buffer = make_buffer(&[1, 2, 3], 10, 100);
        assert_eq!(buffer.max_timestamp(), None);
    }
}
